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

use crate::api::middleware::session::{AppState, SESSION_KEY_EXPERT_ID};
use crate::error::AppError;
use crate::models::expert::{CreateExpertData, Expert};
use crate::services::password;

#[derive(Deserialize)]
struct RegisterExpertRequest {
    email: Option<String>,
    name: Option<String>,
    institution_name: Option<String>,
    position: Option<String>,
    phone_number: Option<String>,
    specialty: Option<String>,
    password: Option<String>,
    member_type: Option<String>,
}

/// Registers an expert reviewer account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterExpertRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password), Some(member_type)) =
        (req.email, req.password, req.member_type)
    else {
        return Err(AppError::BadRequest(
            "Required fields are missing".to_string(),
        ));
    };

    if Expert::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::BadRequest(
            "Email address is already in use".to_string(),
        ));
    }

    let password_hash = password::hash_password(&password)?;

    let expert = Expert::create(
        &state.pool,
        CreateExpertData {
            name: req.name.unwrap_or_default(),
            institution_name: req.institution_name.unwrap_or_default(),
            position: req.position,
            phone_number: req.phone_number,
            email,
            specialty: req.specialty,
            password_hash,
            member_type,
        },
    )
    .await?;

    tracing::info!(expert_id = expert.id, "Registered expert account");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful" })),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Logs an expert in and stores their id in the session
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let expert = Expert::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&password, &expert.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    session.insert(SESSION_KEY_EXPERT_ID, expert.id).await?;

    tracing::info!(expert_id = expert.id, "Expert logged in");

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Login successful",
        "user": {
            "id": expert.id,
            "email": expert.email,
            "name": expert.name,
            "role": "expert",
        },
    })))
}

async fn logout(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    session.flush().await?;

    Ok(Json(json!({ "resultCode": "S-1", "msg": "Logout successful" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/expert/register", post(register))
        .route("/expert/login", post(login))
        .route("/expert/logout", post(logout))
}
