use crate::AppState;
use crate::api::error::AppError;
use crate::error::TransferError;
use crate::models::{FileDetails, Payload, UploadRequest};
use crate::utils::validation::{sanitize_filename, validate_csv_file};
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub bucket: String,
    pub object_name: String,
    pub details: FileDetails,
    pub local_copy: Option<String>,
}

/// Multipart form accepted by `/upload`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Destination bucket
    pub bucket: String,
    /// CSV file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

pub async fn upload_form(State(state): State<AppState>) -> Html<String> {
    let config = state.service.config();
    let bucket = config.default_bucket.as_deref().unwrap_or("");

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>CSV Upload</title>
</head>
<body>
  <h1>Energy Consumption Data Upload</h1>
  <p><strong>Upload a CSV file</strong> with energy consumption data for analysis.</p>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <label>Bucket name <input type="text" name="bucket" value="{bucket}" required></label><br>
    <label>Data file (CSV, max {limit} MB) <input type="file" name="file" accept=".csv,text/csv" required></label><br>
    <button type="submit">Upload</button>
  </form>
</body>
</html>
"#,
        bucket = escape_html(bucket),
        limit = config.limit_mb(),
    ))
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing bucket or non-CSV file"),
        (status = 413, description = "File exceeds the size limit"),
        (status = 500, description = "Local copy could not be written"),
        (status = 502, description = "Object store rejected or failed the upload")
    ),
    tag = "upload"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let limit = state.service.config().bucket_size_limit_bytes;
    let mut bucket = String::new();
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "bucket" => {
                bucket = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?
                    .trim()
                    .to_string();
            }
            "file" => {
                let original_filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|s| s.to_string());

                let filename = sanitize_filename(&original_filename)?;
                validate_csv_file(&filename)?;

                let data = field.bytes().await.map_err(|e| {
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        AppError::Transfer(TransferError::Oversize {
                            size: limit.saturating_add(1),
                            limit,
                        })
                    } else {
                        AppError::BadRequest(e.body_text())
                    }
                })?;

                file = Some((filename, content_type, data));
            }
            _ => {}
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let payload = Payload::from_bytes(filename, content_type, data);
    let details = payload.details();
    tracing::info!(
        "📄 File details: name={}, type={}, size={} MB",
        details.filename,
        details.content_type.as_deref().unwrap_or("unknown"),
        details.size_mb
    );

    let receipt = state
        .service
        .upload(UploadRequest::new(bucket, payload))
        .await?;

    Ok(Json(UploadResponse {
        message: format!(
            "File {} uploaded successfully to bucket: {}.",
            receipt.object_name, receipt.bucket
        ),
        bucket: receipt.bucket,
        object_name: receipt.object_name,
        details,
        local_copy: receipt.local_copy.map(|p| p.display().to_string()),
    }))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
