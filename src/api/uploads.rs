use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    middleware,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use crate::api::middleware::auth;
use crate::api::middleware::session::AppState;
use crate::error::AppError;
use crate::services::upload::{self, UploadKind};

/// Room above the largest per-kind cap for multipart framing.
const BODY_LIMIT: usize = 11 * 1024 * 1024;

struct UploadedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Pulls the "file" part out of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
            .to_vec();

        return Ok(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }

    Err(AppError::BadRequest("No file field in upload".to_string()))
}

async fn store(
    state: &AppState,
    kind: UploadKind,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let file = read_file_field(multipart).await?;

    let path = upload::store_upload(
        &state.config.upload_dir,
        kind,
        &file.name,
        &file.content_type,
        &file.bytes,
    )
    .await?;

    tracing::info!(path = %path, size = file.bytes.len(), "File uploaded");

    Ok(Json(json!({
        "message": "File uploaded",
        "filePath": path,
    })))
}

/// Question illustration uploaded by the superuser
async fn upload_question_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    store(&state, UploadKind::QuestionImage, multipart).await
}

/// Evidence document attached to a questionnaire response
async fn upload_response_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    store(&state, UploadKind::ResponseDocument, multipart).await
}

pub fn router() -> Router<AppState> {
    let superuser_routes = Router::new()
        .route("/uploads/question-image", post(upload_question_image))
        .route_layer(middleware::from_fn(auth::require_superuser));

    let user_routes = Router::new()
        .route("/uploads/response-file", post(upload_response_file))
        .route_layer(middleware::from_fn(auth::require_user));

    superuser_routes
        .merge(user_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}
