//! Request-shape validation shared by the HTTP handlers.
//!
//! Domain validation (material names, weight range, list limits) lives in
//! the domain; this module only covers what the JSON and query extractors
//! reject before a handler runs.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError};
use serde_json::json;

use crate::domain::Error;

/// Body field name as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    Error::invalid_request(format!("missing required field: {}", field.0)).with_details(json!({
        "field": field.0,
        "code": "missing_field",
    }))
}

/// Error handler for `web::JsonConfig`: malformed bodies become
/// `invalid_request` instead of Actix's plain-text 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected application/json body".to_owned(),
        other => format!("invalid JSON body: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": "invalid_body" }))
        .into()
}

/// Error handler for `web::QueryConfig`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({ "code": "invalid_query" }))
        .into()
}
