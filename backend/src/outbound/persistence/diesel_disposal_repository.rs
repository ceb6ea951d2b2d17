//! PostgreSQL-backed `DisposalRepository` implementation using Diesel ORM.
//!
//! `record` runs the whole award in one transaction. The user upsert that
//! credits the disposal points comes first: it creates the row when needed
//! and holds its lock until commit, so concurrent disposals by the same user
//! evaluate achievements one after another. The `(user_id, title)` unique
//! index backs the one-unlock-per-title rule, and only rows actually inserted
//! contribute bonus points.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{DisposalOutcome, DisposalRepository, DisposalRepositoryError};
use crate::domain::{
    AchievementIcon, AchievementPolicy, AchievementSnapshot, Disposal, DisposalId,
    DisposalListLimit, MaterialType, UnlockedAchievement, UserId, UserStanding, Weight,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    AchievementRow, DisposalRow, NewAchievementRow, NewDisposalRow, NewUserRow, UserStandingRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{achievements, disposals, users};

/// Diesel-backed implementation of the disposal repository port.
#[derive(Clone)]
pub struct DieselDisposalRepository {
    pool: DbPool,
}

impl DieselDisposalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DisposalRepositoryError {
    map_basic_pool_error(error, DisposalRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DisposalRepositoryError {
    map_basic_diesel_error(
        error,
        DisposalRepositoryError::query,
        DisposalRepositoryError::connection,
    )
}

fn row_to_standing(row: UserStandingRow) -> Result<UserStanding, DisposalRepositoryError> {
    let experience = u64::try_from(row.experience).map_err(|_| {
        DisposalRepositoryError::query(format!("negative experience for user {}", row.id))
    })?;
    Ok(UserStanding {
        user_id: UserId::from_uuid(row.id),
        points_total: row.points_total,
        experience,
    })
}

fn row_to_disposal(row: DisposalRow) -> Result<Disposal, DisposalRepositoryError> {
    let material = row
        .material_type
        .parse::<MaterialType>()
        .map_err(|err| DisposalRepositoryError::query(err.to_string()))?;
    let weight =
        Weight::new(row.weight_kg).map_err(|err| DisposalRepositoryError::query(err.to_string()))?;
    let points_awarded = u32::try_from(row.points_awarded).map_err(|_| {
        DisposalRepositoryError::query(format!("negative points on disposal {}", row.id))
    })?;
    Ok(Disposal {
        id: DisposalId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        material,
        weight,
        points_awarded,
        created_at: row.created_at,
    })
}

fn row_to_achievement(row: AchievementRow) -> Result<UnlockedAchievement, DisposalRepositoryError> {
    let icon = AchievementIcon::from_identifier(&row.icon).ok_or_else(|| {
        DisposalRepositoryError::query(format!("unknown achievement icon {:?}", row.icon))
    })?;
    let points = u32::try_from(row.points).map_err(|_| {
        DisposalRepositoryError::query(format!("negative bonus on achievement {}", row.id))
    })?;
    Ok(UnlockedAchievement {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        title: row.title,
        description: row.description,
        points,
        icon,
        unlocked_at: row.unlocked_at,
    })
}

fn to_i32(value: u32, what: &str) -> Result<i32, DisposalRepositoryError> {
    i32::try_from(value)
        .map_err(|_| DisposalRepositoryError::query(format!("{what} out of range: {value}")))
}

fn to_u64(value: i64, what: &str) -> Result<u64, DisposalRepositoryError> {
    u64::try_from(value)
        .map_err(|_| DisposalRepositoryError::query(format!("{what} out of range: {value}")))
}

/// Failure inside the award transaction; either aborts it.
enum AwardError {
    Diesel(diesel::result::Error),
    Rejected(DisposalRepositoryError),
}

impl From<diesel::result::Error> for AwardError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<DisposalRepositoryError> for AwardError {
    fn from(error: DisposalRepositoryError) -> Self {
        Self::Rejected(error)
    }
}

impl From<AwardError> for DisposalRepositoryError {
    fn from(error: AwardError) -> Self {
        match error {
            AwardError::Diesel(error) => map_diesel_error(error),
            AwardError::Rejected(error) => error,
        }
    }
}

/// Credit `points` to both counters, creating the user row if needed.
async fn credit_user(
    conn: &mut diesel_async::AsyncPgConnection,
    user_id: uuid::Uuid,
    points: i64,
    now: DateTime<Utc>,
) -> QueryResult<UserStandingRow> {
    diesel::insert_into(users::table)
        .values(&NewUserRow {
            id: user_id,
            points_total: points,
            experience: points,
            updated_at: now,
        })
        .on_conflict(users::id)
        .do_update()
        .set((
            users::points_total.eq(users::points_total + excluded(users::points_total)),
            users::experience.eq(users::experience + excluded(users::experience)),
            users::updated_at.eq(excluded(users::updated_at)),
        ))
        .returning(UserStandingRow::as_returning())
        .get_result(conn)
        .await
}

struct AwardRows {
    after_disposal: UserStandingRow,
    after_bonus: UserStandingRow,
    granted: Vec<UnlockedAchievement>,
}

#[async_trait]
impl DisposalRepository for DieselDisposalRepository {
    async fn record(
        &self,
        disposal: &Disposal,
        policy: &AchievementPolicy,
    ) -> Result<DisposalOutcome, DisposalRepositoryError> {
        let points = to_i32(disposal.points_awarded, "points")?;
        let user_uuid = *disposal.user_id.as_uuid();
        let new_disposal = NewDisposalRow {
            id: *disposal.id.as_uuid(),
            user_id: user_uuid,
            material_type: disposal.material.as_str(),
            weight_kg: disposal.weight.kg(),
            points_awarded: points,
            created_at: disposal.created_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction(|conn| {
                async move {
                    let after_disposal =
                        credit_user(conn, user_uuid, i64::from(points), disposal.created_at)
                            .await?;
                    diesel::insert_into(disposals::table)
                        .values(&new_disposal)
                        .execute(conn)
                        .await?;

                    let disposal_count: i64 = disposals::table
                        .filter(disposals::user_id.eq(user_uuid))
                        .count()
                        .get_result(conn)
                        .await?;
                    let held: Vec<String> = achievements::table
                        .filter(achievements::user_id.eq(user_uuid))
                        .select(achievements::title)
                        .load(conn)
                        .await?;
                    let snapshot = AchievementSnapshot {
                        disposal_count: to_u64(disposal_count, "disposal count")?,
                        points_total: after_disposal.points_total,
                        unlocked_titles: held.into_iter().collect(),
                    };

                    let mut granted = Vec::new();
                    for unlock in policy.evaluate(&snapshot) {
                        let achievement = UnlockedAchievement::grant(
                            disposal.user_id,
                            unlock,
                            disposal.created_at,
                        );
                        let inserted = diesel::insert_into(achievements::table)
                            .values(&NewAchievementRow {
                                id: achievement.id,
                                user_id: user_uuid,
                                title: &achievement.title,
                                description: &achievement.description,
                                points: to_i32(achievement.points, "achievement bonus")?,
                                icon: achievement.icon.identifier(),
                                unlocked_at: achievement.unlocked_at,
                            })
                            .on_conflict((achievements::user_id, achievements::title))
                            .do_nothing()
                            .execute(conn)
                            .await?;
                        if inserted == 1 {
                            granted.push(achievement);
                        }
                    }

                    let bonus: i64 = granted
                        .iter()
                        .map(|achievement| i64::from(achievement.points))
                        .sum();
                    let after_bonus = if bonus > 0 {
                        diesel::update(users::table.find(user_uuid))
                            .set((
                                users::points_total.eq(users::points_total + bonus),
                                users::experience.eq(users::experience + bonus),
                            ))
                            .returning(UserStandingRow::as_returning())
                            .get_result(conn)
                            .await?
                    } else {
                        after_disposal
                    };

                    Ok::<_, AwardError>(AwardRows {
                        after_disposal,
                        after_bonus,
                        granted,
                    })
                }
                .scope_boxed()
            })
            .await?;

        let after_disposal = row_to_standing(rows.after_disposal)?;
        let standing_before = UserStanding {
            points_total: after_disposal.points_total - i64::from(points),
            experience: after_disposal
                .experience
                .saturating_sub(u64::from(disposal.points_awarded)),
            ..after_disposal
        };
        Ok(DisposalOutcome {
            disposal: disposal.clone(),
            standing_before,
            standing_after: row_to_standing(rows.after_bonus)?,
            unlocked: rows.granted,
        })
    }

    async fn find_standing(
        &self,
        user_id: &UserId,
    ) -> Result<UserStanding, DisposalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(user_id.as_uuid())
            .select(UserStandingRow::as_select())
            .first::<UserStandingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map_or_else(|| Ok(UserStanding::empty(*user_id)), row_to_standing)
    }

    async fn disposal_count(&self, user_id: &UserId) -> Result<u64, DisposalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = disposals::table
            .filter(disposals::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_u64(count, "disposal count")
    }

    async fn list_disposals(
        &self,
        user_id: &UserId,
        limit: DisposalListLimit,
    ) -> Result<Vec<Disposal>, DisposalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DisposalRow> = disposals::table
            .filter(disposals::user_id.eq(user_id.as_uuid()))
            .order((disposals::created_at.desc(), disposals::id.desc()))
            .limit(i64::from(limit.get()))
            .select(DisposalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_disposal).collect()
    }

    async fn list_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DisposalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AchievementRow> = achievements::table
            .filter(achievements::user_id.eq(user_id.as_uuid()))
            .order((achievements::unlocked_at.asc(), achievements::title.asc()))
            .select(AchievementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_achievement).collect()
    }

    async fn material_totals_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<MaterialType, f64>, DisposalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, Option<f64>)> = disposals::table
            .filter(disposals::user_id.eq(user_id.as_uuid()))
            .group_by(disposals::material_type)
            .select((disposals::material_type, sum(disposals::weight_kg)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(material, total)| {
                let material = material
                    .parse::<MaterialType>()
                    .map_err(|err| DisposalRepositoryError::query(err.to_string()))?;
                Ok((material, total.unwrap_or(0.0)))
            })
            .collect()
    }
}
