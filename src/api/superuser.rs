use axum::{
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::api::middleware::auth;
use crate::api::middleware::session::{AppState, SESSION_KEY_SUPERUSER_ID};
use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::expert::Expert;
use crate::models::question::{
    QualitativeQuestion, QuantitativeQuestion, UpsertQualitativeQuestionData,
    UpsertQuantitativeQuestionData,
};
use crate::models::superuser::SuperUser;
use crate::models::system::System;
use crate::models::user::User;
use crate::services::password;

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Logs a superuser in
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let superuser = SuperUser::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&password, &superuser.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    session
        .insert(SESSION_KEY_SUPERUSER_ID, superuser.id)
        .await?;

    tracing::info!(superuser_id = superuser.id, "Superuser logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "data": {
            "id": superuser.id,
            "email": superuser.email,
            "name": superuser.name,
            "member_type": superuser.member_type,
        },
    })))
}

async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    session.flush().await?;

    Ok(Json(json!({ "message": "Logout successful" })))
}

/// Every registered system with owner contact info
async fn all_systems(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let systems = System::list_all(&state.pool).await?;

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "All systems fetched",
        "data": systems,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchExpertsRequest {
    system_id: Option<i64>,
    expert_ids: Option<Vec<i64>>,
}

/// Replaces the expert set matched to a system
async fn match_experts(
    State(state): State<AppState>,
    Json(req): Json<MatchExpertsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(system_id), Some(expert_ids)) = (req.system_id, req.expert_ids) else {
        return Err(AppError::BadRequest(
            "systemId and expertIds are required".to_string(),
        ));
    };

    if expert_ids.is_empty() {
        return Err(AppError::BadRequest(
            "expertIds must not be empty".to_string(),
        ));
    }

    if !System::exists(&state.pool, system_id).await? {
        return Err(AppError::BadRequest("Invalid system ID".to_string()));
    }

    Assignment::replace_for_system(&state.pool, system_id, &expert_ids).await?;

    tracing::info!(
        system_id,
        expert_count = expert_ids.len(),
        "Experts matched to system"
    );

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Experts matched to system",
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemQuery {
    system_id: Option<i64>,
}

/// Experts currently matched to a system
async fn matched_experts(
    State(state): State<AppState>,
    Query(query): Query<SystemQuery>,
) -> Result<impl IntoResponse, AppError> {
    let system_id = query
        .system_id
        .ok_or_else(|| AppError::BadRequest("System ID is required".to_string()))?;

    let experts = Assignment::experts_for_system(&state.pool, system_id).await?;

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Matched experts fetched",
        "data": experts,
    })))
}

async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = User::list(&state.pool).await?;

    Ok(Json(users))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !User::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "User deleted by superuser");

    Ok(Json(json!({ "message": "User deleted" })))
}

async fn list_experts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let experts = Expert::list(&state.pool).await?;

    Ok(Json(experts))
}

async fn delete_expert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !Expert::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Expert not found".to_string()));
    }

    tracing::info!(expert_id = id, "Expert deleted by superuser");

    Ok(Json(json!({ "message": "Expert deleted" })))
}

#[derive(Deserialize)]
struct QuantitativeQuestionRequest {
    question_number: Option<i32>,
    question: Option<String>,
    unit: Option<String>,
    legal_basis: Option<String>,
    evaluation_criteria: Option<String>,
    reference_info: Option<String>,
    image_path: Option<String>,
}

/// Creates or replaces a quantitative question
async fn upsert_quantitative_question(
    State(state): State<AppState>,
    Json(req): Json<QuantitativeQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(question_number), Some(question)) = (req.question_number, req.question) else {
        return Err(AppError::BadRequest(
            "questionNumber and question are required".to_string(),
        ));
    };

    let saved = QuantitativeQuestion::upsert(
        &state.pool,
        UpsertQuantitativeQuestionData {
            question_number,
            question,
            unit: req.unit,
            legal_basis: req.legal_basis,
            evaluation_criteria: req.evaluation_criteria,
            reference_info: req.reference_info,
            image_path: req.image_path,
        },
    )
    .await?;

    Ok(Json(saved))
}

async fn list_quantitative_questions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(QuantitativeQuestion::list(&state.pool).await?))
}

async fn delete_quantitative_question(
    State(state): State<AppState>,
    Path(question_number): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !QuantitativeQuestion::delete(&state.pool, question_number).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(json!({ "message": "Question deleted" })))
}

#[derive(Deserialize)]
struct QualitativeQuestionRequest {
    question_number: Option<i32>,
    indicator: Option<String>,
    indicator_definition: Option<String>,
    evaluation_criteria: Option<String>,
    reference_info: Option<String>,
}

/// Creates or replaces a qualitative question
async fn upsert_qualitative_question(
    State(state): State<AppState>,
    Json(req): Json<QualitativeQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(question_number), Some(indicator)) = (req.question_number, req.indicator) else {
        return Err(AppError::BadRequest(
            "questionNumber and indicator are required".to_string(),
        ));
    };

    let saved = QualitativeQuestion::upsert(
        &state.pool,
        UpsertQualitativeQuestionData {
            question_number,
            indicator,
            indicator_definition: req.indicator_definition,
            evaluation_criteria: req.evaluation_criteria,
            reference_info: req.reference_info,
        },
    )
    .await?;

    Ok(Json(saved))
}

async fn list_qualitative_questions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(QualitativeQuestion::list(&state.pool).await?))
}

async fn delete_qualitative_question(
    State(state): State<AppState>,
    Path(question_number): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !QualitativeQuestion::delete(&state.pool, question_number).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(json!({ "message": "Question deleted" })))
}

pub fn router() -> Router<AppState> {
    let open_routes = Router::new().route("/superuser/login", post(login));

    let admin_routes = Router::new()
        .route("/superuser/logout", post(logout))
        .route("/superuser/systems", get(all_systems))
        .route(
            "/superuser/assignments",
            post(match_experts).get(matched_experts),
        )
        .route("/superuser/users", get(list_users))
        .route("/superuser/users/:id", delete(delete_user))
        .route("/superuser/experts", get(list_experts))
        .route("/superuser/experts/:id", delete(delete_expert))
        .route(
            "/superuser/questions/quantitative",
            post(upsert_quantitative_question)
                .put(upsert_quantitative_question)
                .get(list_quantitative_questions),
        )
        .route(
            "/superuser/questions/quantitative/:question_number",
            delete(delete_quantitative_question),
        )
        .route(
            "/superuser/questions/qualitative",
            post(upsert_qualitative_question)
                .put(upsert_qualitative_question)
                .get(list_qualitative_questions),
        )
        .route(
            "/superuser/questions/qualitative/:question_number",
            delete(delete_qualitative_question),
        )
        .route_layer(middleware::from_fn(auth::require_superuser));

    open_routes.merge(admin_routes)
}
