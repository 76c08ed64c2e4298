//! Request extractors shared by module handlers.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has been deserialized and then checked against its
/// `validator` schema.
///
/// Malformed bodies reject as `bad_request`, schema violations as
/// `validation_error`; both are 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request_with(
                    vec![json!({
                        "field": "body",
                        "code": "invalid_body",
                        "message": rejection.body_text(),
                    })],
                    "request body could not be parsed",
                )
            })?;

        value.validate()?;

        Ok(ValidJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Greeting {
        #[validate(length(min = 1, max = 5))]
        word: String,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidJson(greeting) =
            ValidJson::<Greeting>::from_request(request(r#"{"word":"hi"}"#), &())
                .await
                .unwrap();
        assert_eq!(greeting.word, "hi");
    }

    #[tokio::test]
    async fn rejects_schema_violation() {
        let err = ValidJson::<Greeting>::from_request(request(r#"{"word":"toolong"}"#), &())
            .await
            .unwrap_err();
        match &err {
            AppError::Validation { details, .. } => assert_eq!(details[0]["field"], "word"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let err = ValidJson::<Greeting>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest { details, .. } => assert_eq!(details[0]["code"], "invalid_body"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
