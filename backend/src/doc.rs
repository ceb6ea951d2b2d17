//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the
//! response bodies they return and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::domain::MaterialType;
use crate::inbound::http::disposals::{RecordDisposalBody, RecordDisposalResult};
use crate::inbound::http::dto::{AchievementBody, AggregateImpactBody, DisposalBody};
use crate::inbound::http::progress::{MaterialImpactBody, ProgressBody, UserImpactBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Descarte Certo backend API",
        description = "Disposal logging, scoring, achievements and environmental impact.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::disposals::record_disposal,
        crate::inbound::http::disposals::list_disposals,
        crate::inbound::http::progress::get_progress,
        crate::inbound::http::progress::get_user_impact,
        crate::inbound::http::impact::get_impact,
        crate::inbound::http::impact::recompute_impact,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequest,
        MaterialType,
        RecordDisposalBody,
        RecordDisposalResult,
        DisposalBody,
        AchievementBody,
        AggregateImpactBody,
        ProgressBody,
        MaterialImpactBody,
        UserImpactBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Session login"),
        (name = "disposals", description = "Logging and listing disposals"),
        (name = "progress", description = "Per-user points, level and impact"),
        (name = "impact", description = "Global environmental impact aggregate"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case("RecordDisposalResult", "pointsAwarded")]
    #[case("RecordDisposalResult", "aggregateRefreshed")]
    #[case("AggregateImpactBody", "totalWeightPerMaterial")]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas
            .get(schema)
            .unwrap_or_else(|| panic!("{schema} schema registered"));
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/disposals")]
    #[case("/api/v1/users/me/progress")]
    #[case("/api/v1/users/me/impact")]
    #[case("/api/v1/impact")]
    #[case("/api/v1/impact/recompute")]
    fn documents_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
