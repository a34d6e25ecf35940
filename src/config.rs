//! Configuration
//!
//! Resolves the dataset path and control parameters from the command line,
//! the environment and an optional TOML file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "launch-dash.toml";
/// Environment override for the dataset path.
pub const DATA_ENV_VAR: &str = "LAUNCH_DASH_DATA";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub controls: ControlsConfig,

    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

/// Range control settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "default_payload_step")]
    pub payload_step: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("spacex_launch_dash.csv")
}

fn default_payload_step() -> f64 {
    1000.0
}

fn default_width() -> f32 {
    1200.0
}

fn default_height() -> f32 {
    800.0
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            payload_step: default_payload_step(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DashConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DashConfig = toml::from_str(text).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file. An explicit path must exist; without one,
    /// `launch-dash.toml` is read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Dataset path precedence: CLI argument, then `LAUNCH_DASH_DATA`, then
    /// the config file (or its default).
    pub fn resolve_data_path(&self, cli: Option<&Path>, env: Option<&str>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| self.dataset.path.clone())
    }

    fn validate(&self) -> Result<()> {
        let step = self.controls.payload_step;
        if !(step.is_finite() && step > 0.0) {
            bail!("controls.payload_step must be a positive number, got {step}");
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            bail!("window size must be positive");
        }
        Ok(())
    }
}
