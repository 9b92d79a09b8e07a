//! Axum route handler for the resume parsing API.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::fields::{extract_fields, ExtractedRecord};
use crate::extraction::text::extract_resume_text;
use crate::state::AppState;

/// Multipart field name carrying the uploaded resume.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub success: bool,
    pub data: ExtractedRecord,
}

/// POST /parse-resume
///
/// Accepts a multipart upload with a `resume` file field, extracts its text,
/// and returns the structured record produced by the completion capability.
/// Each request is independent: no session, no history, no retained files.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let data = read_resume_field(&mut multipart).await?;
    info!("received resume upload ({} bytes)", data.len());

    let resume_text = extract_resume_text(&data)?;
    info!("extracted {} chars of resume text", resume_text.len());

    let record = extract_fields(&resume_text, &state.schema, state.completion.as_ref()).await?;

    Ok(Json(ParseResumeResponse {
        success: true,
        data: record,
    }))
}

/// Reads the upload bytes from the first multipart field named `resume`.
async fn read_resume_field(multipart: &mut Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() == Some(RESUME_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read uploaded file: {e}")));
        }
    }

    Err(AppError::Validation(format!(
        "missing '{RESUME_FIELD}' file field"
    )))
}
