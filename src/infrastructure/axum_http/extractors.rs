//! Drop-in replacements for axum's `Json`, `Path` and `Query` whose
//! rejections answer with the `{ success, message }` error envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::infrastructure::axum_http::error_responses::AppError;

#[derive(Debug, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
        routing::{get, post},
    };
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Page {
        limit: i64,
    }

    #[derive(Debug, Deserialize)]
    struct Review {
        reason: String,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/requests/:id/approve",
                post(|Path(id): Path<Uuid>| async move { id.to_string() }),
            )
            .route(
                "/requests",
                get(|Query(page): Query<Page>| async move { page.limit.to_string() })
                    .post(|Json(review): Json<Review>| async move { review.reason }),
            )
    }

    async fn envelope(response: Response) -> Value {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn malformed_uuid_in_path_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/requests/not-a-uuid/approve")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = envelope(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|message| !message.is_empty()));
    }

    #[tokio::test]
    async fn malformed_json_body_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/requests")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{bad json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(response).await["success"], false);
    }

    #[tokio::test]
    async fn missing_json_content_type_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/requests")
            .body(Body::from(r#"{"reason":"full"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(response).await["success"], false);
    }

    #[tokio::test]
    async fn invalid_query_uses_error_envelope() {
        let request = Request::builder()
            .uri("/requests?limit=many")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(response).await["success"], false);
    }
}
