//! Global impact handlers.
//!
//! ```text
//! GET /api/v1/impact
//! POST /api/v1/impact/recompute
//! ```

use actix_web::{get, post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::AggregateImpactBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Current global impact aggregate.
///
/// Public; served from the stored projection, computed on first access.
#[utoipa::path(
    get,
    path = "/api/v1/impact",
    responses(
        (status = 200, description = "Global aggregate", body = AggregateImpactBody),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["impact"],
    operation_id = "getImpact",
    security([])
)]
#[get("/impact")]
pub async fn get_impact(state: web::Data<HttpState>) -> ApiResult<web::Json<AggregateImpactBody>> {
    let aggregate = state.impact.current().await?;
    Ok(web::Json(AggregateImpactBody::from(aggregate)))
}

/// Recompute the aggregate from the disposal log and store it.
#[utoipa::path(
    post,
    path = "/api/v1/impact/recompute",
    responses(
        (status = 200, description = "Recomputed aggregate", body = AggregateImpactBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["impact"],
    operation_id = "recomputeImpact"
)]
#[post("/impact/recompute")]
pub async fn recompute_impact(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AggregateImpactBody>> {
    session.require_user_id()?;
    let aggregate = state.impact.recompute().await?;
    Ok(web::Json(AggregateImpactBody::from(aggregate)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{
        FixtureLoginService, MockDisposalCommand, MockImpactQuery, MockProgressQuery,
    };
    use crate::domain::{AggregateImpactData, Error, ImpactInputs, MaterialType};
    use crate::inbound::http::test_utils::{
        login_and_get_cookie, memory_state, test_session_middleware,
    };
    use crate::inbound::http::users::login;
    use crate::test_support::fixture_timestamp;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    fn state_with_impact(impact: MockImpactQuery) -> HttpState {
        HttpState {
            login: Arc::new(FixtureLoginService),
            disposals: Arc::new(MockDisposalCommand::new()),
            progress: Arc::new(MockProgressQuery::new()),
            impact: Arc::new(impact),
        }
    }

    fn glass_aggregate() -> AggregateImpactData {
        let mut inputs = ImpactInputs::default();
        inputs.weight_by_material.insert(MaterialType::Glass, 4.0);
        inputs.active_users = 2;
        inputs.total_points = 310;
        AggregateImpactData::recompute(&inputs, fixture_timestamp())
    }

    #[actix_web::test]
    async fn get_impact_is_public() {
        let mut impact = MockImpactQuery::new();
        impact
            .expect_current()
            .times(1)
            .returning(|| Ok(glass_aggregate()));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_impact(impact)))
                .service(web::scope("/api/v1").service(get_impact)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/impact").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["co2Reduction"], 10.0);
        assert_eq!(body["totalPoints"], 310);
        assert_eq!(body["updatedAt"], "2026-03-01T09:00:00+00:00");
    }

    #[actix_web::test]
    async fn storage_outage_is_service_unavailable() {
        let mut impact = MockImpactQuery::new();
        impact
            .expect_current()
            .returning(|| Err(Error::service_unavailable("impact repository unavailable")));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_impact(impact)))
                .service(web::scope("/api/v1").service(get_impact)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/impact").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn recompute_requires_login_and_returns_fresh_aggregate() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(memory_state().state))
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .service(login)
                        .service(recompute_impact),
                ),
        )
        .await;

        let anonymous = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/impact/recompute")
                .to_request(),
        )
        .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let cookie = login_and_get_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/impact/recompute")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["activeUsers"], 0);
        assert_eq!(
            body["totalWeightPerMaterial"]
                .as_object()
                .expect("weights object")
                .len(),
            6
        );
    }
}
