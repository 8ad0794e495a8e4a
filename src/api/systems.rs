use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::api::middleware::auth::{self, current_user_id};
use crate::api::middleware::session::AppState;
use crate::error::AppError;
use crate::models::feedback::Feedback;
use crate::models::system::{CreateSystemData, System};

/// Registered systems allowed per institution.
const MAX_SYSTEMS_PER_USER: i64 = 10;

/// The intake form submits inclusion flags as the literal choice label.
fn included(value: &str) -> bool {
    value == "포함"
}

#[derive(Deserialize)]
struct CreateSystemRequest {
    name: String,
    min_subjects: i32,
    max_subjects: i32,
    purpose: String,
    #[serde(default)]
    is_private: String,
    #[serde(default)]
    is_unique: String,
    #[serde(default)]
    is_resident: String,
    reason: Option<String>,
}

/// Registers a system for assessment
async fn create_system(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateSystemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;

    let count = System::count_for_user(&state.pool, user_id).await?;
    if count >= MAX_SYSTEMS_PER_USER {
        tracing::warn!(user_id, count, "System registration limit reached");
        return Err(AppError::BadRequest(
            "At most 10 systems can be registered".to_string(),
        ));
    }

    let system = System::create(
        &state.pool,
        CreateSystemData {
            user_id,
            name: req.name,
            min_subjects: req.min_subjects,
            max_subjects: req.max_subjects,
            purpose: req.purpose,
            is_private: included(&req.is_private),
            is_unique: included(&req.is_unique),
            is_resident: included(&req.is_resident),
            reason: req.reason,
        },
    )
    .await?;

    tracing::info!(system_id = system.id, user_id, "Registered system");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "System registered",
            "systemId": system.id,
        })),
    ))
}

/// Lists the caller's systems
async fn list_systems(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;
    let systems = System::list_for_user(&state.pool, user_id).await?;

    Ok(Json(systems))
}

/// Detail view of one system
async fn get_system(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let system = System::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("System not found".to_string()))?;

    Ok(Json(system))
}

#[derive(Deserialize)]
struct UpdateSystemRequest {
    name: String,
    purpose: String,
    min_subjects: i32,
    max_subjects: i32,
}

async fn update_system(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSystemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = System::update(
        &state.pool,
        id,
        &req.name,
        &req.purpose,
        req.min_subjects,
        req.max_subjects,
    )
    .await?;

    if !updated {
        return Err(AppError::NotFound("System not found".to_string()));
    }

    Ok(Json(json!({ "message": "System updated" })))
}

async fn delete_system(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !System::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("System not found".to_string()));
    }

    Ok(Json(json!({ "message": "System deleted" })))
}

/// The caller's systems with their results, overall feedback, and matched
/// expert
async fn owner_results(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;
    let rows = Feedback::results_for_owner(&state.pool, user_id).await?;

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "System results fetched",
        "data": rows,
    })))
}

pub fn router() -> Router<AppState> {
    let user_routes = Router::new()
        .route("/systems", post(create_system).get(list_systems))
        .route("/systems/results", get(owner_results))
        .route_layer(middleware::from_fn(auth::require_user));

    let shared_routes = Router::new()
        .route(
            "/systems/:id",
            get(get_system).put(update_system).delete(delete_system),
        )
        .route_layer(middleware::from_fn(auth::require_any));

    user_routes.merge(shared_routes)
}
