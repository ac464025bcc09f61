use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline configuration, constructed once at startup and passed by
/// parameter into the run - there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of slowest endpoints kept in the report
    pub report_size: usize,
    /// Directory scanned for access logs
    pub log_dir: PathBuf,
    /// Directory the HTML reports are written to
    pub report_dir: PathBuf,
    /// Directory processed logs are relocated into
    pub done_dir: PathBuf,
    /// Tolerated ratio of unparsable lines before the run is failed
    pub error_threshold: f64,
    /// Optional file the process log is written to instead of stderr
    pub logging_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: 1000,
            log_dir: PathBuf::from("./log"),
            report_dir: PathBuf::from("./reports"),
            done_dir: PathBuf::from("./done"),
            error_threshold: 0.8,
            logging_path: None,
        }
    }
}

/// JSON overlay; absent keys keep their built-in defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    report_size: Option<usize>,
    log_dir: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    done_dir: Option<PathBuf>,
    error_threshold: Option<f64>,
    logging_path: Option<PathBuf>,
}

impl Config {
    /// Built-in defaults, overridden by the JSON file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            let overlay: ConfigOverlay = serde_json::from_str(&raw)
                .with_context(|| format!("cannot parse config file {}", path.display()))?;
            config.apply(overlay);
            tracing::debug!("Loaded config overlay from {}", path.display());
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(report_size) = overlay.report_size {
            self.report_size = report_size;
        }
        if let Some(log_dir) = overlay.log_dir {
            self.log_dir = log_dir;
        }
        if let Some(report_dir) = overlay.report_dir {
            self.report_dir = report_dir;
        }
        if let Some(done_dir) = overlay.done_dir {
            self.done_dir = done_dir;
        }
        if let Some(error_threshold) = overlay.error_threshold {
            self.error_threshold = error_threshold;
        }
        if overlay.logging_path.is_some() {
            self.logging_path = overlay.logging_path;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.report_size == 0 {
            bail!("report_size must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.error_threshold) {
            bail!(
                "error_threshold must be within [0, 1], got {}",
                self.error_threshold
            );
        }
        Ok(())
    }
}
