//! JSON body extractor that also runs `validator` rules.
//!
//! Rejections reuse the `ApiResponse` envelope: axum's own status for bodies
//! that cannot be decoded (400 syntax, 415 content type, 422 shape) and 422
//! with one `field: message` entry per violation otherwise.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// `Json<T>` plus `Validate`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CheckEmail {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn check(ValidatedJson(body): ValidatedJson<CheckEmail>) {
///     // `body.email` is a syntactically valid address here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum BodyRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

impl From<JsonRejection> for BodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection)
    }
}

impl From<ValidationErrors> for BodyRejection {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Field violations sorted by field name, `field: message` joined by `; `.
fn describe_violations(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let parts: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |v| match &v.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", v.code),
            })
        })
        .collect();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Malformed(rejection) => (
                rejection.status(),
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe_violations(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await?;
        body.validate()?;
        Ok(Self(body))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct SignUp {
        #[validate(email)]
        email: String,
        #[validate(length(min = 1, max = 255))]
        full_name: String,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<SignUp>) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new().route("/sign-up", post(handler))
    }

    fn json_request(body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/sign-up")
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_returns_ok() {
        let body = serde_json::json!({"email": "ada@example.com", "full_name": "Ada"});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let resp = send(json_request(Body::from("not json"))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_field_returns_422() {
        let body = serde_json::json!({"email": "ada@example.com"});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn validation_failure_lists_fields() {
        let body = serde_json::json!({"email": "not-an-email", "full_name": ""});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = parsed["error"].as_str().unwrap();
        assert!(message.starts_with("email: "));
        assert!(message.contains("; full_name: "));
    }
}
