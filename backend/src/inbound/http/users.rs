//! Login handler.
//!
//! ```text
//! POST /api/v1/login {"username":"recycler","password":"descarte"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{json_config, memory_state, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    async fn post_login(body: Value) -> actix_web::dev::ServiceResponse {
        let harness = memory_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state))
                .app_data(json_config())
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login)),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(body)
            .to_request();
        actix_test::call_service(&app, request).await
    }

    #[actix_web::test]
    async fn fixture_credentials_set_session_cookie() {
        let response = post_login(json!({"username": "recycler", "password": "descarte"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[rstest]
    #[case("   ", "descarte", "username", "empty_username")]
    #[case("recycler", "", "password", "empty_password")]
    #[actix_web::test]
    async fn blank_credentials_are_invalid_requests(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let response = post_login(json!({"username": username, "password": password})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let response = post_login(json!({"username": "recycler", "password": "wrong"})).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_body_is_invalid_request() {
        let response = post_login(json!({"username": "recycler"})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "invalid_body");
    }
}
