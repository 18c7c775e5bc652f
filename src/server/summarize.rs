use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;

/// Multipart field carrying the transcript
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub chunk_count: usize,
    /// Seconds spent chunking and generating
    pub time_taken: f64,
    pub timestamp: DateTime<Utc>,
}

struct Upload {
    filename: String,
    content: Vec<u8>,
}

pub async fn handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("summarize", %request_id);

    async move {
        let upload = read_upload(multipart?).await?;
        validate_extension(&upload.filename, &state.allowed_extensions)?;

        tracing::info!(
            filename = %upload.filename,
            size_bytes = upload.content.len(),
            "summarize_request_received"
        );

        let content = String::from_utf8(upload.content)
            .map_err(|_| ApiError::Validation("Transcript is not valid UTF-8".to_string()))?;

        let summary = state.service.summarize(content).await?;

        Ok(Json(SummarizeResponse {
            summary: summary.text,
            chunk_count: summary.chunk_count,
            time_taken: summary.elapsed_secs,
            timestamp: Utc::now(),
        }))
    }
    .instrument(span)
    .await
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await?.to_vec();

        return Ok(Upload { filename, content });
    }

    Err(ApiError::Validation(format!(
        "Missing form field '{}'",
        FILE_FIELD
    )))
}

fn validate_extension(filename: &str, allowed: &[String]) -> Result<(), ApiError> {
    let lower = filename.to_lowercase();
    if allowed.iter().any(|ext| lower.ends_with(&ext.to_lowercase())) {
        return Ok(());
    }

    Err(ApiError::BadRequest(format!(
        "Invalid file type. Please upload one of: {}",
        allowed.join(", ")
    )))
}
