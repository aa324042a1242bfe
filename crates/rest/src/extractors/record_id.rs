//! Numeric record id from the last path parameter.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::RestError;

/// A record id taken from the `{id}` path parameter.
///
/// Ids that are not integers cannot name a stored record, so they reject with
/// `404 not-found` rather than `400`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: e.body_text(),
            })?;
        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| RestError::not_found("record", raw))
    }
}
