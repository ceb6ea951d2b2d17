//! Tests for the disposal handlers, backed by the in-memory store.

use super::*;
use crate::domain::NotificationKind;
use crate::inbound::http::test_utils::{
    MemoryHarness, json_config, login_and_get_cookie, memory_state, query_config,
    test_session_middleware,
};
use crate::inbound::http::users::login;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(record_disposal)
                .service(list_disposals),
        )
}

fn post_disposal(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/disposals")
        .set_json(body)
}

#[actix_web::test]
async fn first_glass_disposal_returns_points_achievement_and_aggregate() {
    let MemoryHarness { state, emitter } = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post_disposal(json!({"materialType": "GLASS", "weightKg": 5.0}))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["pointsAwarded"], 75);
    assert_eq!(body["pointsTotal"], 125);
    assert_eq!(body["level"], 1);
    assert_eq!(body["levelChanged"], false);
    assert_eq!(body["newAchievements"][0]["title"], "Primeiro Passo");
    assert_eq!(body["newAchievements"][0]["icon"], "seedling");
    assert_eq!(body["updatedAggregate"]["co2Reduction"], 12.5);
    assert_eq!(body["updatedAggregate"]["activeUsers"], 1);
    assert_eq!(body["aggregateRefreshed"], true);

    let kinds: Vec<_> = emitter.sent().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Achievement]);
}

#[rstest]
#[case(json!({"materialType": "WOOD", "weightKg": 1.0}), "materialType", "invalid_material_type")]
#[case(json!({"materialType": "PAPER", "weightKg": 0.0}), "weightKg", "weight_out_of_range")]
#[case(json!({"materialType": "PAPER", "weightKg": 1000.01}), "weightKg", "weight_out_of_range")]
#[case(json!({"weightKg": 1.0}), "materialType", "missing_field")]
#[case(json!({"materialType": "PAPER"}), "weightKg", "missing_field")]
#[actix_web::test]
async fn invalid_disposals_are_rejected(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let MemoryHarness { state, emitter } = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        post_disposal(payload).cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
    assert!(emitter.sent().is_empty());

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/disposals")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let listed: Vec<Value> = actix_test::read_body_json(listed).await;
    assert!(listed.is_empty(), "rejected disposal must not be stored");
}

#[actix_web::test]
async fn disposals_require_login() {
    let MemoryHarness { state, .. } = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        post_disposal(json!({"materialType": "GLASS", "weightKg": 1.0})).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_honours_limit_and_order() {
    let MemoryHarness { state, .. } = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_and_get_cookie(&app).await;

    for material in ["PLASTIC", "METAL", "PAPER"] {
        let response = actix_test::call_service(
            &app,
            post_disposal(json!({"materialType": material, "weightKg": 1.0}))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/disposals?limit=2")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<Value> = actix_test::read_body_json(response).await;
    let materials: Vec<_> = body
        .iter()
        .map(|d| d["materialType"].as_str().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(materials, vec!["PAPER", "METAL"]);
}

#[rstest]
#[case("limit=0", "limit_out_of_range")]
#[case("limit=101", "limit_out_of_range")]
#[case("limit=abc", "invalid_query")]
#[actix_web::test]
async fn listing_rejects_bad_limits(#[case] query: &str, #[case] code: &str) {
    let MemoryHarness { state, .. } = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/disposals?{query}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], code);
}
