use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::api::middleware::session::{AppState, SESSION_KEY_USER_ID};
use crate::error::AppError;
use crate::models::user::{CreateUserData, User};
use crate::services::password;

#[derive(Deserialize)]
struct RegisterRequest {
    institution_name: String,
    institution_address: String,
    representative_name: String,
    email: String,
    password: String,
    member_type: Option<String>,
}

/// Registers an institutional account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if User::find_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(AppError::BadRequest(
            "Email address is already in use".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.pool,
        CreateUserData {
            institution_name: req.institution_name,
            institution_address: req.institution_address,
            representative_name: req.representative_name,
            email: req.email,
            password_hash,
            member_type: req.member_type,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Registered institutional account");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful" })),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Logs an institutional user in and stores their id in the session
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = User::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    session.insert(SESSION_KEY_USER_ID, user.id).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "user": {
            "id": user.id,
            "email": user.email,
            "member_type": user.member_type,
        },
    })))
}

/// Destroys the session
async fn logout(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    session.flush().await?;

    Ok(Json(json!({ "message": "Logout successful" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
