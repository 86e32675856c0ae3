//! Generates a midpoint-displacement terrain and writes it as CSV.
//!
//! Run with:
//! ```
//! cargo run -p terrain --bin terrain-fractal -- [config.json]
//! ```
//!
//! `TERRAIN_OUTPUT`, `TERRAIN_SEED` and `PLOTTER_URL` override the defaults.

use terrain::config::{self, FractalConfig, OutputConfig};
use terrain::upload::deliver;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut terrain = match std::env::args().nth(1) {
        Some(path) => config::load_json::<FractalConfig>(&path)?,
        None => FractalConfig::default(),
    };
    if let Some(seed) = config::seed_from_env() {
        terrain = terrain.with_seed(seed);
    }
    let output = OutputConfig::from_env();

    tracing::info!(
        size = terrain.size,
        roughness = terrain.roughness,
        height_scale = terrain.height_scale,
        seed = terrain.seed,
        "Generating fractal terrain"
    );

    let points = terrain.generate()?;
    deliver(&points, &output).await?;

    tracing::info!("Terrain generation complete!");
    Ok(())
}
