//! Application settings loaded from config.toml
//!
//! Every key is optional. A missing file yields the defaults, so a fresh checkout
//! only needs the credentials in `.env` to run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Structure of the whole config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the tabular-data service lives and which tables to use
    pub service: ServiceSettings,
    /// How amounts and lists are presented
    pub display: DisplaySettings,
    /// Where the login session is persisted
    pub session: SessionSettings,
}

/// `[service]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Root URL of the service API
    pub endpoint_url: String,
    /// Table names, matched case-sensitively by the service
    #[serde(flatten)]
    pub tables: TableNames,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint_url: "https://api.airtable.com".to_string(),
            tables: TableNames::default(),
        }
    }
}

/// Names of the two tables the application reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableNames {
    /// Table holding students
    #[serde(rename = "students_table")]
    pub students: String,
    /// Table holding lessons
    #[serde(rename = "lessons_table")]
    pub lessons: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            students: "Students".to_string(),
            lessons: "Lessons".to_string(),
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Symbol placed in front of amounts
    pub currency_symbol: String,
    /// How many lessons the dashboard lists
    pub recent_lessons: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: crate::core::payment::DEFAULT_CURRENCY_SYMBOL.to_string(),
            recent_lessons: 5,
        }
    }
}

/// `[session]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// File holding the persisted login
    pub path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/session.json"),
        }
    }
}

/// Loads settings from a TOML file, falling back to defaults if it does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or is not valid TOML.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    tracing::debug!("Loading settings from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}
