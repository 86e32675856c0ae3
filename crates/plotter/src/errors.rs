use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use terrain::TerrainError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Uploaded file is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("Please enter gnuplot commands.")]
    EmptyScript,

    #[error("Not found")]
    NotFound,

    #[error("Gnuplot is not installed or not found in PATH.")]
    PlotterMissing,

    #[error("Gnuplot execution failed")]
    PlotFailed { stderr: String },

    #[error("Plot file was not generated. Check your gnuplot commands.")]
    OutputMissing,

    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::PlotFailed { stderr } = &self {
            let body = Json(json!({
                "error": self.to_string(),
                "stderr": stderr,
            }));
            return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
        }

        let (status, error_message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidEncoding | AppError::EmptyScript => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::PlotterMissing => {
                error!("Plot executable missing");
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::OutputMissing => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Terrain(e) if e.is_invalid_input() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Terrain(e) => {
                error!("Terrain error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Io(e) => {
                error!("IO error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Storage(e) => {
                error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            AppError::PlotFailed { .. } => unreachable!(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
