//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{achievements, aggregate_impact, disposals, users};

/// Counter columns of the users table.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserStandingRow {
    pub id: Uuid,
    pub points_total: i64,
    pub experience: i64,
}

/// Insertable user created on first disposal.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow {
    pub id: Uuid,
    pub points_total: i64,
    pub experience: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = disposals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DisposalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_type: String,
    pub weight_kg: f64,
    pub points_awarded: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = disposals)]
pub(crate) struct NewDisposalRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_type: &'a str,
    pub weight_kg: f64,
    pub points_awarded: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = achievements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AchievementRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub points: i32,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = achievements)]
pub(crate) struct NewAchievementRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub points: i32,
    pub icon: &'a str,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = aggregate_impact)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AggregateImpactRow {
    pub id: String,
    pub total_weight_per_material: serde_json::Value,
    pub co2_reduction: f64,
    pub active_users: i64,
    pub total_points: i64,
    pub updated_at: DateTime<Utc>,
}
