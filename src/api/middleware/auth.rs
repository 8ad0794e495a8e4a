use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use super::session::{SESSION_KEY_EXPERT_ID, SESSION_KEY_SUPERUSER_ID, SESSION_KEY_USER_ID};
use crate::error::AppError;

async fn session_id(session: &Session, key: &str) -> Result<Option<i64>, AppError> {
    Ok(session.get::<i64>(key).await?)
}

/// Middleware that requires an institutional user login
pub async fn require_user(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if session_id(&session, SESSION_KEY_USER_ID).await?.is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Middleware that requires an expert login
pub async fn require_expert(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if session_id(&session, SESSION_KEY_EXPERT_ID).await?.is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Middleware that requires a superuser login
pub async fn require_superuser(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if session_id(&session, SESSION_KEY_SUPERUSER_ID)
        .await?
        .is_none()
    {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Middleware that admits any logged-in role
pub async fn require_any(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let logged_in = session_id(&session, SESSION_KEY_USER_ID).await?.is_some()
        || session_id(&session, SESSION_KEY_EXPERT_ID).await?.is_some()
        || session_id(&session, SESSION_KEY_SUPERUSER_ID)
            .await?
            .is_some();

    if !logged_in {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Extracts the authenticated user's id from the session
pub async fn current_user_id(session: &Session) -> Result<i64, AppError> {
    session_id(session, SESSION_KEY_USER_ID)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Extracts the authenticated expert's id from the session
pub async fn current_expert_id(session: &Session) -> Result<i64, AppError> {
    session_id(session, SESSION_KEY_EXPERT_ID)
        .await?
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    async fn anonymous_request(app: Router) -> StatusCode {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response.status()
    }

    #[tokio::test]
    async fn user_gate_rejects_anonymous_requests() {
        let app = Router::new()
            .route("/protected", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(require_user))
            .layer(SessionManagerLayer::new(MemoryStore::default()));

        assert_eq!(anonymous_request(app).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn any_gate_rejects_anonymous_requests() {
        let app = Router::new()
            .route("/protected", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(require_any))
            .layer(SessionManagerLayer::new(MemoryStore::default()));

        assert_eq!(anonymous_request(app).await, StatusCode::UNAUTHORIZED);
    }
}
