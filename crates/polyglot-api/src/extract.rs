//! Turn extractor rejections into the API's error envelope.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and friends so that a
//! malformed body or query string still answers with a structured error.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use polyglot_common::error::{PolyglotError, PolyglotResult};

/// A body that is not valid JSON for `T` is a 422 on `body`.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> PolyglotResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(PolyglotError::invalid(
                "body",
                "The request body must be a valid JSON object.",
            ))
        }
    }
}

/// A query string that does not fit `T` is a 422 on `query`.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> PolyglotResult<T> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected query string");
            Err(PolyglotError::invalid(
                "query",
                "The query parameters are invalid.",
            ))
        }
    }
}

/// A path id that is not an integer cannot name a record: 404 for `resource`.
pub fn path_id(id: Result<Path<i64>, PathRejection>, resource: &str) -> PolyglotResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|_| PolyglotError::not_found(resource))
}
