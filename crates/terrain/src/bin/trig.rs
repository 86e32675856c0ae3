//! Samples the trigonometric terrain surface and writes it as CSV.
//!
//! Run with:
//! ```
//! cargo run -p terrain --bin terrain-trig -- [config.json]
//! ```

use terrain::config::{self, OutputConfig, TrigConfig};
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
        Some(path) => config::load_json::<TrigConfig>(&path)?,
        None => TrigConfig::default(),
    };
    if let Some(seed) = config::seed_from_env() {
        terrain.seed = Some(seed);
    }
    let output = OutputConfig::from_env();

    tracing::info!(
        width = terrain.width,
        length = terrain.length,
        samples = terrain.samples,
        "Sampling trigonometric terrain"
    );

    let points = terrain.generate()?;
    deliver(&points, &output).await?;

    tracing::info!("Terrain generation complete!");
    Ok(())
}
