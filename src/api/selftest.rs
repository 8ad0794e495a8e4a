use axum::{
    extract::{Query, State},
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
use crate::models::response::{
    Answer, QualitativeResponse, QuantitativeResponse, UpsertResponseData,
};
use crate::models::self_assessment::{SelfAssessment, UpsertSelfAssessmentData};
use crate::models::system::{AssessmentStatus, System};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelfAssessmentRequest {
    organization: Option<String>,
    user_group: Option<String>,
    personal_info_system: Option<String>,
    member_info_homepage: Option<String>,
    external_data_provision: Option<String>,
    cctv_operation: Option<String>,
    task_outsourcing: Option<String>,
    personal_info_disposal: Option<String>,
    system_id: Option<i64>,
}

/// Saves (or overwrites) the intake questionnaire for a system
async fn save_self_assessment(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SelfAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;

    let (Some(organization), Some(user_group), Some(system_id)) =
        (req.organization, req.user_group, req.system_id)
    else {
        return Err(AppError::BadRequest(
            "Required fields are missing".to_string(),
        ));
    };

    SelfAssessment::upsert(
        &state.pool,
        UpsertSelfAssessmentData {
            user_id,
            system_id,
            organization,
            user_scale: user_group,
            personal_info_system: req.personal_info_system,
            member_info_homepage: req.member_info_homepage,
            external_data_provision: req.external_data_provision,
            cctv_operation: req.cctv_operation,
            task_outsourcing: req.task_outsourcing,
            personal_info_disposal: req.personal_info_disposal,
        },
    )
    .await?;

    // The intake form is the first step of a self-test
    System::set_status(&state.pool, system_id, AssessmentStatus::InProgress).await?;

    tracing::info!(system_id, user_id, "Self-assessment saved");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Self-assessment saved successfully" })),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantitativeResponseItem {
    question_number: Option<i32>,
    response: Option<Answer>,
    additional_comment: Option<String>,
    file_path: Option<String>,
    system_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveQuantitativeRequest {
    quantitative_responses: Option<Vec<QuantitativeResponseItem>>,
}

/// Saves a batch of quantitative answers in one transaction
async fn save_quantitative(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SaveQuantitativeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;

    let Some(items) = req.quantitative_responses else {
        return Err(AppError::BadRequest(
            "Invalid quantitative responses format".to_string(),
        ));
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let (Some(question_number), Some(response), Some(system_id)) =
            (item.question_number, item.response, item.system_id)
        else {
            return Err(AppError::BadRequest(
                "Missing required fields in quantitative response".to_string(),
            ));
        };

        rows.push(UpsertResponseData {
            question_number,
            system_id,
            user_id,
            response: response.as_str().to_string(),
            additional_comment: item.additional_comment,
            file_path: item.file_path,
        });
    }

    let count = rows.len();
    QuantitativeResponse::upsert_batch(&state.pool, rows).await?;

    tracing::info!(user_id, count, "Quantitative responses saved");

    Ok(Json(json!({ "message": "Quantitative responses saved successfully" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveQualitativeRequest {
    question_number: Option<i32>,
    response: Option<Answer>,
    additional_comment: Option<String>,
    file_path: Option<String>,
    system_id: Option<i64>,
}

/// Saves a single qualitative answer; an omitted answer counts as 해당없음
async fn save_qualitative(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SaveQualitativeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = current_user_id(&session).await?;

    let (Some(question_number), Some(system_id)) = (req.question_number, req.system_id) else {
        return Err(AppError::BadRequest(
            "Required fields are missing".to_string(),
        ));
    };

    let response = req.response.unwrap_or(Answer::NotApplicable);

    QualitativeResponse::upsert(
        &state.pool,
        UpsertResponseData {
            question_number,
            system_id,
            user_id,
            response: response.as_str().to_string(),
            additional_comment: req.additional_comment,
            file_path: req.file_path,
        },
    )
    .await?;

    Ok(Json(json!({ "message": "Qualitative response saved successfully" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetQuery {
    system_id: Option<i64>,
}

/// Quantitative questions joined with the system's answers
async fn get_quantitative(
    State(state): State<AppState>,
    Query(query): Query<SheetQuery>,
) -> Result<impl IntoResponse, AppError> {
    let system_id = query
        .system_id
        .ok_or_else(|| AppError::BadRequest("System ID is required".to_string()))?;

    let rows = QuantitativeResponse::sheet_for_system(&state.pool, system_id).await?;

    Ok(Json(rows))
}

/// Qualitative questions joined with the system's answers; empty array when
/// nothing is stored
async fn get_qualitative(
    State(state): State<AppState>,
    Query(query): Query<SheetQuery>,
) -> Result<impl IntoResponse, AppError> {
    let system_id = query
        .system_id
        .ok_or_else(|| AppError::BadRequest("System ID is required".to_string()))?;

    let rows = QualitativeResponse::sheet_for_system(&state.pool, system_id).await?;

    Ok(Json(rows))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/selftest/assessment", post(save_self_assessment))
        .route(
            "/selftest/quantitative",
            post(save_quantitative).get(get_quantitative),
        )
        .route(
            "/selftest/qualitative",
            post(save_qualitative).get(get_qualitative),
        )
        .route_layer(middleware::from_fn(auth::require_user))
}
