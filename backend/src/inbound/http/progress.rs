//! Progress and personal impact handlers.
//!
//! ```text
//! GET /api/v1/users/me/progress
//! GET /api/v1/users/me/impact
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::UserProgress;
use crate::domain::{MaterialImpact, MaterialType, UserImpactSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::AchievementBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Gamification state of the logged-in user.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBody {
    pub user_id: String,
    #[schema(example = 125)]
    pub points_total: i64,
    #[schema(example = 125)]
    pub experience: u64,
    #[schema(example = 1)]
    pub level: u32,
    /// Experience still needed to reach the next level.
    #[schema(example = 375)]
    pub experience_to_next_level: u64,
    pub disposal_count: u64,
    pub achievements: Vec<AchievementBody>,
}

impl From<UserProgress> for ProgressBody {
    fn from(value: UserProgress) -> Self {
        Self {
            user_id: value.standing.user_id.to_string(),
            points_total: value.standing.points_total,
            experience: value.standing.experience,
            level: value.standing.level().get(),
            experience_to_next_level: value.standing.experience_to_next_level(),
            disposal_count: value.disposal_count,
            achievements: value
                .achievements
                .into_iter()
                .map(AchievementBody::from)
                .collect(),
        }
    }
}

/// Estimated savings for one material.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialImpactBody {
    pub material_type: MaterialType,
    pub weight_kg: f64,
    pub co2_kg: f64,
    pub water_litres: f64,
    pub energy_kwh: f64,
    /// Months the material would have taken to decompose in a landfill.
    pub decomposition_months_avoided: u32,
}

impl From<MaterialImpact> for MaterialImpactBody {
    fn from(value: MaterialImpact) -> Self {
        Self {
            material_type: value.material,
            weight_kg: value.weight_kg,
            co2_kg: value.co2_kg,
            water_litres: value.water_litres,
            energy_kwh: value.energy_kwh,
            decomposition_months_avoided: value.decomposition_months_avoided,
        }
    }
}

/// Personal environmental impact.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserImpactBody {
    pub materials: Vec<MaterialImpactBody>,
    pub total_weight_kg: f64,
    pub total_co2_kg: f64,
    pub total_water_litres: f64,
    pub total_energy_kwh: f64,
}

impl From<UserImpactSummary> for UserImpactBody {
    fn from(value: UserImpactSummary) -> Self {
        Self {
            materials: value
                .materials
                .into_iter()
                .map(MaterialImpactBody::from)
                .collect(),
            total_weight_kg: value.total_weight_kg,
            total_co2_kg: value.total_co2_kg,
            total_water_litres: value.total_water_litres,
            total_energy_kwh: value.total_energy_kwh,
        }
    }
}

/// Points, level and achievements of the logged-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/progress",
    responses(
        (status = 200, description = "Progress", body = ProgressBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProgress"
)]
#[get("/users/me/progress")]
pub async fn get_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProgressBody>> {
    let user_id = session.require_user_id()?;
    let progress = state.progress.progress(&user_id).await?;
    Ok(web::Json(ProgressBody::from(progress)))
}

/// Environmental impact of the logged-in user's disposals.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/impact",
    responses(
        (status = 200, description = "Personal impact", body = UserImpactBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserImpact"
)]
#[get("/users/me/impact")]
pub async fn get_user_impact(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserImpactBody>> {
    let user_id = session.require_user_id()?;
    let summary = state.progress.impact(&user_id).await?;
    Ok(web::Json(UserImpactBody::from(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::disposals::record_disposal;
    use crate::inbound::http::test_utils::{
        json_config, login_and_get_cookie, memory_state, test_session_middleware,
    };
    use crate::inbound::http::users::login;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    macro_rules! progress_app {
        () => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(memory_state().state))
                    .app_data(json_config())
                    .wrap(test_session_middleware())
                    .service(
                        web::scope("/api/v1")
                            .service(login)
                            .service(record_disposal)
                            .service(get_progress)
                            .service(get_user_impact),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn new_user_starts_at_level_one() {
        let app = progress_app!();
        let cookie = login_and_get_cookie(&app).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me/progress")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["pointsTotal"], 0);
        assert_eq!(body["level"], 1);
        assert_eq!(body["experienceToNextLevel"], 500);
        assert_eq!(body["achievements"], json!([]));
    }

    #[actix_web::test]
    async fn progress_and_impact_reflect_recorded_disposals() {
        let app = progress_app!();
        let cookie = login_and_get_cookie(&app).await;
        for (material, weight) in [("METAL", 2.0), ("PLASTIC", 1.0)] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/disposals")
                    .cookie(cookie.clone())
                    .set_json(json!({"materialType": material, "weightKg": weight}))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let progress = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me/progress")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let progress: Value = actix_test::read_body_json(progress).await;
        assert_eq!(progress["disposalCount"], 2);
        assert_eq!(progress["achievements"][0]["title"], "Primeiro Passo");

        let impact = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me/impact")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let impact: Value = actix_test::read_body_json(impact).await;
        let materials: Vec<_> = impact["materials"]
            .as_array()
            .expect("materials array")
            .iter()
            .map(|m| m["materialType"].clone())
            .collect();
        assert_eq!(materials, vec![json!("PLASTIC"), json!("METAL")]);
        assert_eq!(impact["totalWeightKg"], 3.0);
    }

    #[actix_web::test]
    async fn progress_requires_login() {
        let app = progress_app!();
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me/progress")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
