//! HTTP request handlers for the plot server.

pub mod datasets;
pub mod generated;
pub mod pages;
pub mod plot;

pub use datasets::{DatasetResponse, delete_dataset, get_dataset, upload_dataset};
pub use generated::{TerrainRequest, generate_terrain};
pub use pages::{health_check, index};
pub use plot::{PlotRequest, PlotResponse, render_plot};
