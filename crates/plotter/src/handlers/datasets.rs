//! Dataset upload and retrieval handlers.

use axum::{
    Extension,
    extract::{Multipart, Path},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use axum_extra::headers::{ContentType, HeaderMapExt, Mime};
use bytes::{Bytes, BytesMut};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dataset_store::DatasetStore, errors::AppError, request_id::record_dataset};

/// Number of leading lines echoed back after an upload.
pub const PREVIEW_LINES: usize = 5;

/// A stored dataset.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatasetResponse {
    pub id: Uuid,
    pub filename: String,
    pub bytes: usize,
    /// First lines of the file.
    pub preview: Vec<String>,
}

impl DatasetResponse {
    pub(crate) fn new(id: Uuid, filename: String, text: &str) -> Self {
        Self {
            id,
            filename,
            bytes: text.len(),
            preview: preview(text),
        }
    }
}

fn preview(text: &str) -> Vec<String> {
    text.split('\n')
        .take(PREVIEW_LINES)
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Upload a text or CSV dataset.
#[utoipa::path(
    post,
    path = "/datasets",
    tag = "datasets",
    request_body(content_type = "multipart/form-data", description = "Text file in the `file` field"),
    responses(
        (status = 200, description = "Dataset stored", body = DatasetResponse),
        (status = 400, description = "Missing file or not UTF-8 text")
    )
)]
pub async fn upload_dataset(
    Extension(store): Extension<DatasetStore>,
    mut multipart: Multipart,
) -> Result<Json<DatasetResponse>, AppError> {
    let mut file_bytes = BytesMut::new();
    let mut filename = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::InvalidInput("Failed to process multipart data".to_string()))?
    {
        if field.name() == Some("file") {
            if let Some(ct) = field.headers().typed_get::<ContentType>() {
                let mime = Mime::from(ct);
                if mime.type_() != "text" && mime.subtype() != "octet-stream" {
                    tracing::warn!("Unexpected upload content type: {}", mime);
                }
            }
            filename = field.file_name().map(|s| s.to_string());
            let chunk = field
                .bytes()
                .await
                .map_err(|_| AppError::InvalidInput("Failed to read file data".to_string()))?;
            file_bytes.extend(chunk);
        } else {
            tracing::warn!("Unexpected field: {:?}", field.name());
        }
    }

    if file_bytes.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()));
    }

    let file_bytes = file_bytes.freeze();
    let text = std::str::from_utf8(&file_bytes).map_err(|_| AppError::InvalidEncoding)?;
    let filename = filename.unwrap_or_else(|| "data.txt".to_string());

    let id = store.save(file_bytes.clone()).await?;
    record_dataset(id);
    tracing::info!("Successfully uploaded: {} as {}", filename, id);

    Ok(Json(DatasetResponse::new(id, filename, text)))
}

/// Download a dataset as plain text.
#[utoipa::path(
    get,
    path = "/datasets/{id}",
    tag = "datasets",
    params(
        ("id" = Uuid, Path, description = "Dataset ID")
    ),
    responses(
        (status = 200, description = "Dataset contents", body = String, content_type = "text/plain"),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn get_dataset(
    Extension(store): Extension<DatasetStore>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    record_dataset(id);
    let contents: Bytes = store.load(id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        contents,
    )
        .into_response())
}

/// Delete a dataset.
#[utoipa::path(
    delete,
    path = "/datasets/{id}",
    tag = "datasets",
    params(
        ("id" = Uuid, Path, description = "Dataset ID")
    ),
    responses(
        (status = 204, description = "Dataset deleted"),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn delete_dataset(
    Extension(store): Extension<DatasetStore>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    record_dataset(id);
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_takes_first_lines() {
        let text = "a\r\nb\nc\nd\ne\nf\ng\n";
        assert_eq!(preview(text), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(preview("only"), vec!["only"]);
    }
}
