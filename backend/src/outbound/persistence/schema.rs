//! Diesel table definitions for the recycling schema.
//!
//! Must match `migrations/` exactly. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Recyclers and their running counters.
    ///
    /// Rows are created lazily by the first disposal a user logs.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Spendable balance: disposal points plus achievement bonuses.
        points_total -> Int8,
        /// Lifetime points earned; never decreases.
        experience -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable disposal log.
    disposals (id) {
        id -> Uuid,
        user_id -> Uuid,
        /// Upper-case material name, e.g. `GLASS`.
        material_type -> Varchar,
        weight_kg -> Float8,
        /// Points fixed at scoring time.
        points_awarded -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unlocked achievements; unique per `(user_id, title)`.
    achievements (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// Bonus points granted on unlock.
        points -> Int4,
        /// Stable icon identifier such as `seedling`.
        icon -> Varchar,
        unlocked_at -> Timestamptz,
    }
}

diesel::table! {
    /// Singleton global impact projection keyed by `global`.
    aggregate_impact (id) {
        id -> Varchar,
        /// Object mapping material names to summed kilograms.
        total_weight_per_material -> Jsonb,
        co2_reduction -> Float8,
        active_users -> Int8,
        total_points -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(disposals -> users (user_id));
diesel::joinable!(achievements -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, disposals, achievements, aggregate_impact);
