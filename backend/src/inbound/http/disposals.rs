//! Disposal handlers.
//!
//! ```text
//! POST /api/v1/disposals {"materialType":"GLASS","weightKg":5.0}
//! GET /api/v1/disposals?limit=20
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{RecordDisposalRequest, RecordDisposalResponse};
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AchievementBody, AggregateImpactBody, DisposalBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Request body for logging a disposal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDisposalBody {
    /// One of `PLASTIC`, `GLASS`, `PAPER`, `METAL`, `ORGANIC`, `ELECTRONIC`.
    #[schema(example = "GLASS")]
    pub material_type: Option<String>,
    /// Kilograms, greater than 0 and at most 1000.
    #[schema(example = 5.0)]
    pub weight_kg: Option<f64>,
}

fn parse_record_request(
    user_id: UserId,
    body: RecordDisposalBody,
) -> Result<RecordDisposalRequest, Error> {
    let material_type = body
        .material_type
        .ok_or_else(|| missing_field_error(FieldName::new("materialType")))?;
    let weight_kg = body
        .weight_kg
        .ok_or_else(|| missing_field_error(FieldName::new("weightKg")))?;
    Ok(RecordDisposalRequest {
        user_id,
        material_type,
        weight_kg,
    })
}

/// Result of logging a disposal.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDisposalResult {
    pub disposal_id: String,
    /// Points for the disposal itself, excluding achievement bonuses.
    #[schema(example = 75)]
    pub points_awarded: u32,
    pub new_achievements: Vec<AchievementBody>,
    /// Balance after the disposal and any bonuses.
    #[schema(example = 125)]
    pub points_total: i64,
    #[schema(example = 1)]
    pub level: u32,
    pub level_changed: bool,
    pub updated_aggregate: AggregateImpactBody,
    /// `false` when the aggregate shown is the last stored one because
    /// recomputation failed.
    pub aggregate_refreshed: bool,
}

impl From<RecordDisposalResponse> for RecordDisposalResult {
    fn from(value: RecordDisposalResponse) -> Self {
        Self {
            disposal_id: value.disposal_id.to_string(),
            points_awarded: value.points_awarded,
            new_achievements: value
                .new_achievements
                .into_iter()
                .map(AchievementBody::from)
                .collect(),
            points_total: value.points_total,
            level: value.level.get(),
            level_changed: value.level_changed,
            updated_aggregate: AggregateImpactBody::from(value.aggregate),
            aggregate_refreshed: value.aggregate_refreshed,
        }
    }
}

/// Log a disposal for the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/disposals",
    request_body = RecordDisposalBody,
    responses(
        (status = 201, description = "Disposal recorded", body = RecordDisposalResult),
        (status = 400, description = "Invalid material or weight", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["disposals"],
    operation_id = "recordDisposal"
)]
#[post("/disposals")]
pub async fn record_disposal(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecordDisposalBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = parse_record_request(user_id, payload.into_inner())?;
    let response = state.disposals.record_disposal(request).await?;
    Ok(HttpResponse::Created().json(RecordDisposalResult::from(response)))
}

/// Query parameters for listing disposals.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListDisposalsParams {
    /// Maximum entries, 1 to 100. Defaults to 20.
    pub limit: Option<u32>,
}

/// List the logged-in user's disposals, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/disposals",
    params(ListDisposalsParams),
    responses(
        (status = 200, description = "Disposals", body = [DisposalBody]),
        (status = 400, description = "Limit out of range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["disposals"],
    operation_id = "listDisposals"
)]
#[get("/disposals")]
pub async fn list_disposals(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListDisposalsParams>,
) -> ApiResult<web::Json<Vec<DisposalBody>>> {
    let user_id = session.require_user_id()?;
    let disposals = state.progress.disposals(&user_id, params.limit).await?;
    Ok(web::Json(
        disposals.into_iter().map(DisposalBody::from).collect(),
    ))
}

#[cfg(test)]
#[path = "disposals_tests.rs"]
mod tests;
