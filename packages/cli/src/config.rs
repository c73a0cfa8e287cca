use reportkit_export::{PageGeometry, PageSize, DEFAULT_BLOCK_GAP, DEFAULT_MARGIN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "reportkit.config.json";

/// Reportkit configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Named page size, used unless both `width` and `height` are set
    #[serde(default)]
    pub page: PageSize,

    /// Custom page width in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Custom page height in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default = "default_margin")]
    pub margin: f64,

    /// Vertical space between consecutive blocks
    #[serde(default = "default_block_gap")]
    pub block_gap: f64,

    /// Where exported PDFs are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

fn default_block_gap() -> f64 {
    DEFAULT_BLOCK_GAP
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        let base = match (self.width, self.height) {
            (Some(width), Some(height)) => PageGeometry::new(width, height, self.margin),
            _ => PageGeometry::from_size(self.page).with_margin(self.margin),
        };
        base.with_block_gap(self.block_gap)
    }

    /// Get absolute path to output directory
    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        let out = Path::new(&self.out_dir);
        if out.is_absolute() {
            out.to_path_buf()
        } else {
            PathBuf::from(cwd).join(out)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            width: None,
            height: None,
            margin: default_margin(),
            block_gap: default_block_gap(),
            out_dir: default_out_dir(),
        }
    }
}
