use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{info, instrument};

use docscan_core::api_types::{ExtractRequest, ExtractResponse};
use docscan_core::InputImage;

use crate::errors::ApiError;
use crate::state::AppState;

/// POST /api/extract — images sent as base64 inside a JSON body.
#[instrument(skip_all)]
pub async fn extract_json(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let session = state.session(req.api_key.as_deref())?;

    let mut images = Vec::with_capacity(req.images.len());
    for encoded in req.images {
        let bytes = STANDARD.decode(encoded.data_base64.trim()).map_err(|e| {
            ApiError::bad_request(format!("image '{}' is not valid base64: {e}", encoded.name))
        })?;
        images.push(InputImage::new(encoded.name, bytes));
    }

    info!(count = images.len(), "Received JSON extraction request");
    let report = state.pipeline.process_batch(&session, &images).await;
    Ok(Json(report.into()))
}

/// POST /api/extract/upload — multipart form. Every file field is one image,
/// kept in the order received; an optional `api_key` text field overrides the
/// configured credential.
#[instrument(skip_all)]
pub async fn extract_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let mut images = Vec::new();
    let mut api_key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("failed to read '{file_name}': {e}"))
                })?;
                // An unselected file input still posts a part with no name and no body.
                if file_name.is_empty() && bytes.is_empty() {
                    tracing::debug!(field = %field_name, "Skipping empty file field");
                    continue;
                }
                images.push(InputImage::new(file_name, bytes.to_vec()));
            }
            None if field_name == "api_key" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid api_key field: {e}")))?;
                api_key = Some(value);
            }
            None => {
                tracing::debug!(field = %field_name, "Ignoring unknown form field");
            }
        }
    }

    let session = state.session(api_key.as_deref())?;

    info!(count = images.len(), "Received multipart extraction request");
    let report = state.pipeline.process_batch(&session, &images).await;
    Ok(Json(report.into()))
}
