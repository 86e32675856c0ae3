//! Server settings read from the environment.

use std::{path::PathBuf, str::FromStr, time::Duration};

/// Runtime settings for the plot server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Root directory for datasets and scratch space.
    pub data_dir: PathBuf,
    /// Executable invoked to render scripts.
    pub gnuplot_bin: PathBuf,
    pub request_timeout: Duration,
    /// Plot processes allowed to run at once.
    pub max_concurrent_plots: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8081,
            data_dir: PathBuf::from("./plot-data"),
            gnuplot_bin: PathBuf::from("gnuplot"),
            request_timeout: Duration::from_secs(120),
            max_concurrent_plots: 2,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: env_or("PORT", defaults.port),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            gnuplot_bin: std::env::var("GNUPLOT_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.gnuplot_bin),
            request_timeout: Duration::from_secs(env_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            max_concurrent_plots: env_or("MAX_CONCURRENT_PLOTS", defaults.max_concurrent_plots)
                .max(1),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.max_concurrent_plots, 2);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        // SAFETY: test-local variable name, not read by other tests.
        unsafe { std::env::set_var("PLOTTER_TEST_PORT", "not-a-port") };
        assert_eq!(env_or("PLOTTER_TEST_PORT", 3000u16), 3000);
        unsafe { std::env::set_var("PLOTTER_TEST_PORT", "4000") };
        assert_eq!(env_or("PLOTTER_TEST_PORT", 3000u16), 4000);
        unsafe { std::env::remove_var("PLOTTER_TEST_PORT") };
    }
}
