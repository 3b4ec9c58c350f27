use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_appender::non_blocking::{self, NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the background writer alive; drop it last to flush pending lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: Option<PathBuf>,
}

pub fn init_logging(logging: &LoggingConfig, run_id: &str) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let (writer, guard, telemetry_path) = match logging.telemetry_path.as_ref() {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir).with_context(|| {
                    format!("creating telemetry directory at {}", dir.display())
                })?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating telemetry file at {}", path.display()))?;
            let (writer, guard) = non_blocking_writer(file);
            (writer, guard, Some(path.clone()))
        }
        None => {
            let (writer, guard) = non_blocking_writer(std::io::stderr());
            (writer, guard, None)
        }
    };

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A global subscriber may already be installed (tests, embedding hosts).
    let _ = tracing::subscriber::set_global_default(subscriber);
    info!(target: "mascarade_bench::logging", run_id, level = %level, "structured logging enabled");

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

fn non_blocking_writer<W>(sink: W) -> (NonBlocking, WorkerGuard)
where
    W: std::io::Write + Send + 'static,
{
    non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn disabled_logging_installs_nothing() {
        let config = LoggingConfig::default();
        assert!(init_logging(&config, "quiet").unwrap().is_none());
    }

    #[test]
    fn telemetry_file_is_created_under_missing_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("telemetry.jsonl");
        let config = LoggingConfig {
            enable_structured: true,
            tracing_level: "debug".to_string(),
            telemetry_path: Some(path.clone()),
        };
        let guard = init_logging(&config, "file_sink").unwrap().unwrap();
        assert_eq!(guard.telemetry_path.as_deref(), Some(path.as_path()));
        assert!(path.exists());
    }
}
