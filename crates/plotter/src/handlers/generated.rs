//! Server-side terrain generation into a new dataset.

use axum::{Extension, response::Json};
use bytes::Bytes;
use serde::Deserialize;
use terrain::{
    config::{FractalConfig, TrigConfig},
    export::to_csv_string,
    projector::Point,
};

use crate::{
    dataset_store::DatasetStore, errors::AppError, handlers::DatasetResponse,
    request_id::record_dataset,
};

/// Largest accepted fractal grid dimension (`2^10 + 1`, about a million points).
pub const MAX_GRID_SIZE: usize = 1025;
/// Largest accepted trigonometric sample count.
pub const MAX_SAMPLES: usize = 1_000_000;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TerrainRequest {
    Fractal(FractalConfig),
    Trig(TrigConfig),
}

impl TerrainRequest {
    fn validate(&self) -> Result<(), AppError> {
        match self {
            TerrainRequest::Fractal(c) if c.size > MAX_GRID_SIZE => Err(AppError::InvalidInput(
                format!("grid size {} exceeds the maximum of {MAX_GRID_SIZE}", c.size),
            )),
            TerrainRequest::Trig(c) if c.samples > MAX_SAMPLES => Err(AppError::InvalidInput(
                format!("sample count {} exceeds the maximum of {MAX_SAMPLES}", c.samples),
            )),
            _ => Ok(()),
        }
    }

    fn generate(&self) -> terrain::Result<Vec<Point>> {
        match self {
            TerrainRequest::Fractal(c) => c.generate(),
            TerrainRequest::Trig(c) => c.generate(),
        }
    }
}

/// Generate a terrain point cloud and store it as a dataset.
#[utoipa::path(
    post,
    path = "/datasets/terrain",
    tag = "datasets",
    request_body(content_type = "application/json", description = "`{\"kind\": \"fractal\" | \"trig\", ...parameters}`"),
    responses(
        (status = 200, description = "Terrain dataset stored", body = DatasetResponse),
        (status = 400, description = "Invalid terrain parameters")
    )
)]
pub async fn generate_terrain(
    Extension(store): Extension<DatasetStore>,
    Json(req): Json<TerrainRequest>,
) -> Result<Json<DatasetResponse>, AppError> {
    req.validate()?;
    tracing::info!(?req, "Generating terrain dataset");

    let csv = tokio::task::spawn_blocking(move || req.generate().and_then(|p| to_csv_string(&p)))
        .await
        .map_err(|e| {
            tracing::error!("Terrain generation task failed: {e}");
            AppError::Internal
        })??;

    let id = store.save(Bytes::from(csv.clone())).await?;
    record_dataset(id);
    Ok(Json(DatasetResponse::new(id, "terrain.csv".to_string(), &csv)))
}
