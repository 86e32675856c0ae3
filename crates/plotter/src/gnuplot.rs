//! Runs user scripts through the external gnuplot executable.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{process::Command, sync::Semaphore};
use uuid::Uuid;

use crate::errors::AppError;

/// Output file name scripts are written against.
pub const DEFAULT_OUTPUT: &str = "plot.png";

/// Rewrites a user script so its image lands in `output`.
///
/// Single- or double-quoted references to [`DEFAULT_OUTPUT`], with or
/// without a leading `./`, are redirected to `output`. A script with no
/// `set output` directive gets a PNG terminal and output prepended.
pub fn prepare_script(script: &str, output: &str) -> String {
    let mut modified = script.to_string();
    for quote in ['"', '\''] {
        for prefix in ["", "./"] {
            modified = modified.replace(
                &format!("{quote}{prefix}{DEFAULT_OUTPUT}{quote}"),
                &format!("{quote}{output}{quote}"),
            );
        }
    }
    if modified.contains("set output") {
        modified
    } else {
        format!("set terminal png\nset output \"{output}\"\n{modified}")
    }
}

/// Files created for one render, removed when dropped.
///
/// Dropping also happens when the render future is cancelled mid-run, for
/// example by the request timeout.
struct RenderFiles {
    script: PathBuf,
    output: PathBuf,
}

impl Drop for RenderFiles {
    fn drop(&mut self) {
        for path in [&self.script, &self.output] {
            if let Err(e) = std::fs::remove_file(path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlotRunner {
    program: PathBuf,
    permits: Arc<Semaphore>,
}

impl PlotRunner {
    /// Runner for `program` allowing at most `max_concurrent` live processes.
    pub fn new(program: impl Into<PathBuf>, max_concurrent: usize) -> Self {
        Self {
            program: program.into(),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Renders `script` with `workdir` as the working directory and returns
    /// the PNG bytes.
    ///
    /// Script and image use per-call file names, so concurrent renders in the
    /// same directory do not collide. Both files are removed afterwards.
    pub async fn render(&self, script: &str, workdir: &Path) -> Result<Vec<u8>, AppError> {
        let token = Uuid::new_v4().simple();
        let script_name = format!("script-{token}.gp");
        let output_name = format!("plot-{token}.png");
        let files = RenderFiles {
            script: workdir.join(&script_name),
            output: workdir.join(&output_name),
        };

        tokio::fs::write(&files.script, prepare_script(script, &output_name)).await?;
        self.execute(&script_name, &files.output, workdir).await
    }

    async fn execute(
        &self,
        script_name: &str,
        output_path: &Path,
        workdir: &Path,
    ) -> Result<Vec<u8>, AppError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AppError::Internal)?;
        tracing::debug!(program = %self.program.display(), script = script_name, "Running plot script");

        let output = Command::new(&self.program)
            .arg(script_name)
            .current_dir(workdir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AppError::PlotterMissing,
                _ => AppError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::info!(status = ?output.status.code(), "Plot script failed");
            return Err(AppError::PlotFailed {
                stderr: if stderr.is_empty() {
                    "Unknown gnuplot error".to_string()
                } else {
                    stderr
                },
            });
        }

        match tokio::fs::read(output_path).await {
            Ok(png) => Ok(png),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::OutputMissing),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirects_default_output() {
        let script = "set terminal png size 800,600\nset output \"plot.png\"\nplot \"data.txt\" using 1:2";
        let prepared = prepare_script(script, "plot-abc.png");
        assert_eq!(
            prepared,
            "set terminal png size 800,600\nset output \"plot-abc.png\"\nplot \"data.txt\" using 1:2"
        );
    }

    #[test]
    fn test_redirects_single_quoted_and_relative_output() {
        let prepared = prepare_script("set output 'plot.png'\nplot x", "plot-abc.png");
        assert_eq!(prepared, "set output 'plot-abc.png'\nplot x");

        let prepared = prepare_script("set output \"./plot.png\"\nplot x", "plot-abc.png");
        assert_eq!(prepared, "set output \"plot-abc.png\"\nplot x");

        let prepared = prepare_script("set output './plot.png'\nplot x", "plot-abc.png");
        assert_eq!(prepared, "set output 'plot-abc.png'\nplot x");
    }

    #[test]
    fn test_adds_output_when_missing() {
        let prepared = prepare_script("plot sin(x)", "plot-abc.png");
        assert_eq!(
            prepared,
            "set terminal png\nset output \"plot-abc.png\"\nplot sin(x)"
        );
    }

    #[test]
    fn test_keeps_custom_output() {
        let script = "set output \"mine.png\"\nplot x";
        assert_eq!(prepare_script(script, "plot-abc.png"), script);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = PlotRunner::new("definitely-not-a-plotting-program", 1);
        let dir = std::env::temp_dir();
        let err = runner.render("plot x", &dir).await.unwrap_err();
        assert!(matches!(err, AppError::PlotterMissing));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_reports_stderr() {
        let dir = std::env::temp_dir().join(format!("plotter-runner-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let runner = PlotRunner::new("sh", 1);
        let err = runner
            .render("set output \"plot.png\"\necho broken >&2\nexit 3", &dir)
            .await
            .unwrap_err();
        match err {
            AppError::PlotFailed { stderr } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = runner.render("set output \"plot.png\"\nexit 1", &dir).await.unwrap_err();
        assert!(matches!(err, AppError::PlotFailed { stderr } if stderr == "Unknown gnuplot error"));

        let err = runner.render("set output \"plot.png\"\ntrue", &dir).await.unwrap_err();
        assert!(matches!(err, AppError::OutputMissing));

        let png = runner
            .render("set output \"plot.png\"\nprintf PNG > \"plot.png\"", &dir)
            .await
            .unwrap();
        assert_eq!(png, b"PNG");

        let png = runner
            .render("set output 'plot.png'\nprintf PNG > plot.png", &dir)
            .await
            .unwrap();
        assert_eq!(png, b"PNG");

        // Nothing left behind.
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancelled_render_removes_files() {
        let dir = std::env::temp_dir().join(format!("plotter-runner-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let runner = PlotRunner::new("sh", 1);
        let render = runner.render("set output \"plot.png\"\ntouch \"plot.png\"\nsleep 5", &dir);
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(300), render).await;
        assert!(timed_out.is_err());

        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
