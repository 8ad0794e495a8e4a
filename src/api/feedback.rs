use axum::{
    extract::{Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::api::middleware::auth::{self, current_expert_id};
use crate::api::middleware::session::AppState;
use crate::error::AppError;
use crate::models::assessment_result::{AssessmentResult, FEEDBACK_REFLECTED};
use crate::models::assignment::Assignment;
use crate::models::feedback::Feedback;
use crate::models::response::{Answer, QualitativeResponse, QuantitativeResponse};

/// Systems assigned to the calling expert
async fn assigned_systems(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let expert_id = current_expert_id(&session).await?;
    let systems = Assignment::systems_for_expert(&state.pool, expert_id).await?;

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Assigned systems fetched",
        "data": systems,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemQuery {
    system_id: Option<i64>,
}

/// The assessment result of one assigned system
async fn system_result(
    State(state): State<AppState>,
    Query(query): Query<SystemQuery>,
) -> Result<impl IntoResponse, AppError> {
    let system_id = query
        .system_id
        .ok_or_else(|| AppError::BadRequest("System ID is required".to_string()))?;

    let result = AssessmentResult::find_detail_for_system(&state.pool, system_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assessment result not found".to_string()))?;

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Assessment result fetched",
        "data": result,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantitativeFeedbackItem {
    question_number: Option<i32>,
    feedback: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantitativeFeedbackRequest {
    system_id: Option<i64>,
    feedback_responses: Option<Vec<QuantitativeFeedbackItem>>,
}

/// Writes per-question feedback onto the quantitative responses in one
/// transaction
async fn update_quantitative_feedback(
    State(state): State<AppState>,
    Json(req): Json<QuantitativeFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(system_id), Some(items)) = (req.system_id, req.feedback_responses) else {
        return Err(AppError::BadRequest(
            "systemId and feedbackResponses are required".to_string(),
        ));
    };

    let mut tx = state.pool.begin().await?;
    for item in items {
        let Some(question_number) = item.question_number else {
            return Err(AppError::BadRequest(
                "Missing question number in feedback response".to_string(),
            ));
        };

        let feedback = item.feedback.unwrap_or_else(|| "피드백 없음".to_string());
        QuantitativeResponse::apply_feedback(&mut *tx, system_id, question_number, &feedback)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(system_id, "Quantitative feedback updated");

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Quantitative feedback updated",
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QualitativeFeedbackItem {
    question_number: Option<i32>,
    feedback: Option<String>,
    additional_comment: Option<String>,
    response: Option<Answer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QualitativeFeedbackRequest {
    system_id: Option<i64>,
    feedback_responses: Option<Vec<QualitativeFeedbackItem>>,
}

/// Writes qualitative feedback and flips the result's feedback status, both
/// in one transaction
async fn update_qualitative_feedback(
    State(state): State<AppState>,
    Json(req): Json<QualitativeFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(system_id), Some(items)) = (req.system_id, req.feedback_responses) else {
        return Err(AppError::BadRequest(
            "systemId and feedbackResponses are required".to_string(),
        ));
    };

    let mut tx = state.pool.begin().await?;
    for item in items {
        let (Some(question_number), Some(feedback), Some(additional_comment), Some(response)) = (
            item.question_number,
            item.feedback,
            item.additional_comment,
            item.response,
        ) else {
            return Err(AppError::BadRequest(
                "Malformed feedback response".to_string(),
            ));
        };

        QualitativeResponse::apply_feedback(
            &mut *tx,
            system_id,
            question_number,
            &feedback,
            &additional_comment,
            response.as_str(),
        )
        .await?;
    }

    AssessmentResult::set_feedback_status(&mut *tx, system_id, FEEDBACK_REFLECTED).await?;
    tx.commit().await?;

    tracing::info!(system_id, "Qualitative feedback updated and status flipped");

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Qualitative feedback and status updated",
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackStatusRequest {
    system_id: Option<i64>,
}

/// Marks a system's result as having expert feedback reflected
async fn update_feedback_status(
    State(state): State<AppState>,
    Json(req): Json<FeedbackStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let system_id = req
        .system_id
        .ok_or_else(|| AppError::BadRequest("System ID is required".to_string()))?;

    let affected =
        AssessmentResult::set_feedback_status(&state.pool, system_id, FEEDBACK_REFLECTED).await?;

    if affected == 0 {
        return Err(AppError::NotFound(
            "No result found for this system".to_string(),
        ));
    }

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Feedback status updated",
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryFeedbackRequest {
    assessment_result_id: Option<i64>,
    feedback_content: Option<String>,
}

/// Records the expert's overall comment on an assessment result
async fn submit_summary(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SummaryFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let expert_id = current_expert_id(&session).await?;

    let (Some(assessment_result_id), Some(feedback_content)) =
        (req.assessment_result_id, req.feedback_content)
    else {
        return Err(AppError::BadRequest(
            "assessmentResultId and feedbackContent are required".to_string(),
        ));
    };

    let feedback = Feedback::create(
        &state.pool,
        assessment_result_id,
        expert_id,
        &feedback_content,
    )
    .await?;

    tracing::info!(
        feedback_id = feedback.id,
        expert_id,
        "Summary feedback recorded"
    );

    Ok(Json(json!({
        "resultCode": "S-1",
        "msg": "Feedback recorded",
        "data": feedback,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedback/systems", get(assigned_systems))
        .route("/feedback/result", get(system_result))
        .route("/feedback/quantitative", post(update_quantitative_feedback))
        .route("/feedback/qualitative", post(update_qualitative_feedback))
        .route("/feedback/status", put(update_feedback_status))
        .route("/feedback/summary", post(submit_summary))
        .route_layer(middleware::from_fn(auth::require_expert))
}
