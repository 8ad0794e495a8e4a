use axum::{
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_sessions::Session;

use crate::api::middleware::auth::{self, current_user_id};
use crate::api::middleware::session::AppState;
use crate::error::AppError;
use crate::models::assessment_result::AssessmentResult;
use crate::models::response::{QualitativeResponse, QuantitativeResponse};
use crate::models::self_assessment::SelfAssessment;
use crate::models::system::{AssessmentStatus, System};
use crate::services::scoring;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest {
    system_id: Option<i64>,
}

/// Finalizes a self-test: scores the stored responses and records the result
async fn complete_self_test(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CompleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;

    let system_id = req
        .system_id
        .ok_or_else(|| AppError::BadRequest("System ID is required".to_string()))?;

    let assessment = SelfAssessment::find_for_system_and_user(&state.pool, system_id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No self-assessment data for this system".to_string())
        })?;

    let quantitative = QuantitativeResponse::list_answers(&state.pool, system_id).await?;
    let qualitative = QualitativeResponse::list_answers(&state.pool, system_id).await?;
    let scored = scoring::evaluate(&quantitative, &qualitative);

    let mut tx = state.pool.begin().await?;
    AssessmentResult::upsert(
        &mut *tx,
        system_id,
        user_id,
        assessment.id,
        scored.score,
        scored.grade.as_str(),
    )
    .await?;
    System::set_status(&mut *tx, system_id, AssessmentStatus::Completed).await?;
    tx.commit().await?;

    tracing::info!(
        system_id,
        user_id,
        score = scored.score,
        grade = scored.grade.as_str(),
        "Self-test completed"
    );

    Ok(Json(json!({
        "message": "Self-test result saved successfully",
        "score": scored.score,
        "grade": scored.grade,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultQuery {
    system_id: Option<i64>,
    user_id: Option<i64>,
}

/// Results for a system and user, newest first
async fn get_results(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(system_id), Some(user_id)) = (query.system_id, query.user_id) else {
        return Err(AppError::BadRequest(
            "Required fields are missing".to_string(),
        ));
    };

    let results =
        AssessmentResult::list_for_system_and_user(&state.pool, system_id, user_id).await?;

    if results.is_empty() {
        return Err(AppError::NotFound("No assessment results".to_string()));
    }

    Ok(Json(results))
}

/// Completion flag per system id
async fn get_statuses(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = AssessmentResult::completion_map(&state.pool).await?;

    let mut map = Map::new();
    for (system_id, is_completed) in rows {
        map.insert(system_id.to_string(), Value::Bool(is_completed));
    }

    Ok(Json(Value::Object(map)))
}

pub fn router() -> Router<AppState> {
    let user_routes = Router::new()
        .route("/assessment/complete", post(complete_self_test))
        .route_layer(middleware::from_fn(auth::require_user));

    let shared_routes = Router::new()
        .route("/assessment/result", get(get_results))
        .route("/assessment/statuses", get(get_statuses))
        .route_layer(middleware::from_fn(auth::require_any));

    user_routes.merge(shared_routes)
}
