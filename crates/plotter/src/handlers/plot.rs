//! Plot rendering handler.

use axum::{Extension, response::Json};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::format_description};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dataset_store::DatasetStore, errors::AppError, gnuplot::PlotRunner,
    request_id::record_dataset,
};

/// Script to render, optionally against a stored dataset.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlotRequest {
    /// Gnuplot commands. The dataset is available as `data.txt`.
    pub script: String,
    #[serde(default)]
    pub dataset_id: Option<Uuid>,
}

/// Rendered image.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlotResponse {
    /// PNG as a `data:` URL.
    pub image: String,
    /// Wall-clock time the plot finished, `HH:MM:SS` UTC.
    pub generated_at: String,
}

/// Render a gnuplot script.
#[utoipa::path(
    post,
    path = "/plot",
    tag = "plot",
    request_body = PlotRequest,
    responses(
        (status = 200, description = "Plot rendered", body = PlotResponse),
        (status = 400, description = "Empty script"),
        (status = 404, description = "Dataset not found"),
        (status = 422, description = "Gnuplot failed or produced no image"),
        (status = 503, description = "Gnuplot is not installed")
    )
)]
pub async fn render_plot(
    Extension(store): Extension<DatasetStore>,
    Extension(runner): Extension<PlotRunner>,
    Json(req): Json<PlotRequest>,
) -> Result<Json<PlotResponse>, AppError> {
    if req.script.trim().is_empty() {
        return Err(AppError::EmptyScript);
    }

    let png = match req.dataset_id {
        Some(id) => {
            record_dataset(id);
            if !store.exists(id).await? {
                return Err(AppError::NotFound);
            }
            runner.render(&req.script, &store.dataset_dir(id)).await?
        }
        None => {
            let scratch = store.scratch_dir().await?;
            runner.render(&req.script, scratch.path()).await?
        }
    };

    let generated_at = OffsetDateTime::now_utc()
        .format(format_description!("[hour]:[minute]:[second]"))
        .map_err(|_| AppError::Internal)?;

    tracing::info!(bytes = png.len(), "Plot generated successfully at {}", generated_at);

    Ok(Json(PlotResponse {
        image: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
        generated_at,
    }))
}
