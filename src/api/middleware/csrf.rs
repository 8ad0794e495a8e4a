use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
    routing::get,
    Json, Router,
};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use tower_sessions::Session;

use super::session::{AppState, SESSION_KEY_CSRF_TOKEN};
use crate::error::AppError;

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Issues a token bound to the caller's session
async fn csrf_token(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    let token = generate_token();
    session.insert(SESSION_KEY_CSRF_TOKEN, token.clone()).await?;

    Ok(Json(json!({ "csrfToken": token })))
}

/// Rejects state-changing requests whose x-csrf-token header does not match
/// the session token. Mounted only when csrf_enabled is set.
pub async fn verify_csrf(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let mutating = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::DELETE
    );

    if mutating {
        let stored: Option<String> = session.get(SESSION_KEY_CSRF_TOKEN).await?;
        let presented = request
            .headers()
            .get("x-csrf-token")
            .and_then(|v| v.to_str().ok());

        match (stored, presented) {
            (Some(stored), Some(presented)) if stored == presented => {}
            _ => return Err(AppError::BadRequest("CSRF token mismatch".to_string())),
        }
    }

    Ok(next.run(request).await)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/csrf-token", get(csrf_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_32_alphanumeric_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_not_repeated() {
        assert_ne!(generate_token(), generate_token());
    }

    mod guard {
        use super::super::verify_csrf;
        use axum::{
            body::Body,
            http::{Request, StatusCode},
            routing::post,
            Router,
        };
        use tower::ServiceExt;
        use tower_sessions::{MemoryStore, SessionManagerLayer};

        fn guarded_app() -> Router {
            Router::new()
                .route("/items", post(|| async { "created" }).get(|| async { "ok" }))
                .layer(axum::middleware::from_fn(verify_csrf))
                .layer(SessionManagerLayer::new(MemoryStore::default()))
        }

        #[tokio::test]
        async fn mutating_request_without_token_is_rejected() {
            let response = guarded_app()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/items")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn reads_pass_without_a_token() {
            let response = guarded_app()
                .oneshot(
                    Request::builder()
                        .uri("/items")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
