//! PostgreSQL-backed `ImpactRepository` implementation using Diesel ORM.
//!
//! The three projection inputs are read inside one read-only
//! `REPEATABLE READ` transaction so a disposal committed mid-read cannot
//! leave the weights and the points sum out of step.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::dsl::{count_star, sql, sum};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{ImpactRepository, ImpactRepositoryError};
use crate::domain::{
    AGGREGATE_ID, AggregateImpactData, ImpactInputs, ImpactProjection, MaterialType,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::AggregateImpactRow;
use super::pool::{DbPool, PoolError};
use super::schema::{aggregate_impact, disposals, users};

/// Diesel-backed implementation of the impact repository port.
#[derive(Clone)]
pub struct DieselImpactRepository {
    pool: DbPool,
}

impl DieselImpactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ImpactRepositoryError {
    map_basic_pool_error(error, ImpactRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ImpactRepositoryError {
    map_basic_diesel_error(
        error,
        ImpactRepositoryError::query,
        ImpactRepositoryError::connection,
    )
}

fn aggregate_to_row(
    aggregate: &AggregateImpactData,
) -> Result<AggregateImpactRow, ImpactRepositoryError> {
    let weights = serde_json::to_value(&aggregate.projection.total_weight_per_material)
        .map_err(|err| ImpactRepositoryError::query(err.to_string()))?;
    let active_users = i64::try_from(aggregate.projection.active_users)
        .map_err(|_| ImpactRepositoryError::query("active user count out of range"))?;
    Ok(AggregateImpactRow {
        id: aggregate.id.clone(),
        total_weight_per_material: weights,
        co2_reduction: aggregate.projection.co2_reduction,
        active_users,
        total_points: aggregate.projection.total_points,
        updated_at: aggregate.updated_at,
    })
}

fn row_to_aggregate(row: AggregateImpactRow) -> Result<AggregateImpactData, ImpactRepositoryError> {
    let stored: BTreeMap<MaterialType, f64> = serde_json::from_value(row.total_weight_per_material)
        .map_err(|err| ImpactRepositoryError::query(format!("corrupt aggregate weights: {err}")))?;
    let total_weight_per_material = MaterialType::ALL
        .into_iter()
        .map(|material| (material, stored.get(&material).copied().unwrap_or(0.0)))
        .collect();
    let active_users = u64::try_from(row.active_users)
        .map_err(|_| ImpactRepositoryError::query("negative active user count"))?;
    Ok(AggregateImpactData {
        id: row.id,
        projection: ImpactProjection {
            total_weight_per_material,
            co2_reduction: row.co2_reduction,
            active_users,
            total_points: row.total_points,
        },
        updated_at: row.updated_at,
    })
}

fn collect_weights(
    rows: Vec<(String, Option<f64>)>,
) -> Result<BTreeMap<MaterialType, f64>, ImpactRepositoryError> {
    rows.into_iter()
        .map(|(material, total)| {
            let material = material
                .parse::<MaterialType>()
                .map_err(|err| ImpactRepositoryError::query(err.to_string()))?;
            Ok((material, total.unwrap_or(0.0)))
        })
        .collect()
}

#[async_trait]
impl ImpactRepository for DieselImpactRepository {
    async fn impact_inputs(&self) -> Result<ImpactInputs, ImpactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (weights, user_count, points) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let weights: Vec<(String, Option<f64>)> = disposals::table
                        .group_by(disposals::material_type)
                        .select((disposals::material_type, sum(disposals::weight_kg)))
                        .load(conn)
                        .await?;
                    let user_count: i64 = users::table.select(count_star()).get_result(conn).await?;
                    let points: i64 = users::table
                        .select(sql::<BigInt>("COALESCE(SUM(points_total), 0)::int8"))
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((weights, user_count, points))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(ImpactInputs {
            weight_by_material: collect_weights(weights)?,
            active_users: u64::try_from(user_count)
                .map_err(|_| ImpactRepositoryError::query("negative user count"))?,
            total_points: points,
        })
    }

    async fn save_aggregate(
        &self,
        aggregate: &AggregateImpactData,
    ) -> Result<(), ImpactRepositoryError> {
        let row = aggregate_to_row(aggregate)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(aggregate_impact::table)
            .values(&row)
            .on_conflict(aggregate_impact::id)
            .do_update()
            .set((
                aggregate_impact::total_weight_per_material
                    .eq(excluded(aggregate_impact::total_weight_per_material)),
                aggregate_impact::co2_reduction.eq(excluded(aggregate_impact::co2_reduction)),
                aggregate_impact::active_users.eq(excluded(aggregate_impact::active_users)),
                aggregate_impact::total_points.eq(excluded(aggregate_impact::total_points)),
                aggregate_impact::updated_at.eq(excluded(aggregate_impact::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn load_aggregate(&self) -> Result<Option<AggregateImpactData>, ImpactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = aggregate_impact::table
            .find(AGGREGATE_ID)
            .select(AggregateImpactRow::as_select())
            .first::<AggregateImpactRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_aggregate).transpose()
    }
}
