use crate::markers::MarkerShape;
use crate::reports::DEFAULT_TICKET_PRICE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub data_csv: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            data_csv: PathBuf::from("data_wisata_clean_final.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("output"),
            preview_rows: 8,
        }
    }
}

/// `classic` is the KPI + map + three charts layout; `simulator` swaps the
/// proportional circles for pins and adds the revenue card.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Classic,
    Simulator,
}

impl Layout {
    pub fn marker_shape(self) -> MarkerShape {
        match self {
            Layout::Classic => MarkerShape::ProportionalCircle,
            Layout::Simulator => MarkerShape::Pin,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub layout: Layout,
    pub ticket_price: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            layout: Layout::Classic,
            ticket_price: DEFAULT_TICKET_PRICE,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            info!(path = %path.display(), "loading configuration");
            Self::load_from_file(path)
        } else {
            info!(path = %path.display(), "no configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}
