//! JSON request body extractor.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// Like [`axum::Json`], but rejects with the API's `400 invalid` error body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let JsonBody(named) = JsonBody::<Named>::from_request(request(r#"{"name":"Dune"}"#), &())
            .await
            .unwrap();
        assert_eq!(named.name, "Dune");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let err = JsonBody::<Named>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = JsonBody::<Named>::from_request(request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid");
    }
}
