use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ErrorCode, PlannerError, Result};
use crate::itinerary::types::DEFAULT_CITY_COLOR;
use crate::storage::DEFAULT_DOCUMENT_FILE;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TRIP_PLANNER_DATA_DIR";

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "TRIP_PLANNER_LOG";

const CONFIG_FILE: &str = "config.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "trip-planner", "trip-planner")
}

/// Directory where the trip document lives by default
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".trip-planner"))
}

/// Location of the user config file, when a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn default_palette() -> Vec<String> {
    [
        "#e74c3c", "#3498db", "#9b59b6", "#2ecc71", "#f39c12", "#1abc9c", "#e67e22", "#34495e",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// File name of the trip document inside `data_dir`
    pub document_file: String,
    pub log_level: String,
    pub default_city_color: String,
    /// Colors handed out to new cities in turn
    pub palette: Vec<String>,
    /// Nights given to a new city when none are specified
    pub default_nights: u32,
    /// How far in the future the demo trip starts
    pub demo_start_offset_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            document_file: DEFAULT_DOCUMENT_FILE.to_string(),
            log_level: "info".to_string(),
            default_city_color: DEFAULT_CITY_COLOR.to_string(),
            palette: default_palette(),
            default_nights: 2,
            demo_start_offset_days: 30,
        }
    }
}

impl Config {
    /// Load from `path` if given (it must exist), else from the default
    /// config location if present, else defaults. Environment overrides
    /// are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(PlannerError::config_with_code(
                        ErrorCode::CONFIG_NOT_FOUND,
                        format!("Configuration file not found: {}", explicit.display()),
                    ));
                }
                Self::from_file(explicit)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.merge_env_vars();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PlannerError::config_with_code(
                ErrorCode::CONFIG_PATH_ERROR,
                format!("Cannot read {}", path.display()),
            )
            .with_source(e)
        })?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn merge_env_vars(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }

        if let Ok(level) = std::env::var(LOG_ENV) {
            if !level.trim().is_empty() {
                self.log_level = level;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.document_file.trim().is_empty() {
            return Err(PlannerError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "document_file must not be empty",
            ));
        }
        Ok(())
    }

    /// Color for the city about to be added at position `index`
    pub fn color_for(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            &self.default_city_color
        } else {
            &self.palette[index % self.palette.len()]
        }
    }
}
