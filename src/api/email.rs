use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::session::AppState;
use crate::error::AppError;
use crate::models::email_verification::EmailVerification;
use crate::services::{mailer::Mailer, verification};

#[derive(Deserialize)]
struct SendCodeRequest {
    email: Option<String>,
}

/// Sends a verification code to the given address. Refuses while a previous
/// code is still valid.
async fn send_code(
    State(state): State<AppState>,
    Json(req): Json<SendCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req
        .email
        .ok_or_else(|| AppError::BadRequest("Email address is required".to_string()))?;

    if let Some(existing) = EmailVerification::find(&state.pool, &email).await? {
        if !existing.is_expired(Utc::now()) {
            return Err(AppError::BadRequest(
                "A verification code was already sent. Try again later.".to_string(),
            ));
        }
    }

    let code = verification::generate_code();
    EmailVerification::store(&state.pool, &email, &code).await?;

    let mailer = Mailer::from_config(&state.config);
    mailer.send_verification_code(&email, &code).await?;

    tracing::info!(email = %email, "Verification code sent");

    Ok(Json(json!({ "message": "Verification code sent" })))
}

#[derive(Deserialize)]
struct VerifyCodeRequest {
    email: Option<String>,
    code: Option<String>,
}

/// Checks a verification code. The stored code is deleted on success and on
/// expiry.
async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(code)) = (req.email, req.code) else {
        return Err(AppError::BadRequest(
            "Email and verification code are required".to_string(),
        ));
    };

    let stored = EmailVerification::find(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("No verification code was requested".to_string())
        })?;

    if stored.is_expired(Utc::now()) {
        EmailVerification::delete(&state.pool, &email).await?;
        return Err(AppError::BadRequest(
            "Verification code is invalid or expired".to_string(),
        ));
    }

    if stored.code != code {
        return Err(AppError::BadRequest(
            "Verification code does not match".to_string(),
        ));
    }

    EmailVerification::delete(&state.pool, &email).await?;

    tracing::info!(email = %email, "Email verified");

    Ok(Json(json!({ "message": "Email verification completed" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/email/send-code", post(send_code))
        .route("/email/verify-code", post(verify_code))
}
