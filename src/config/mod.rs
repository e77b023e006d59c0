//! Configuration management.
//!
//! Settings come from `config.toml`, secrets from the environment (optionally via
//! `.env`). Everything is read once at startup into an [`AppConfig`].

/// Administrator login from environment variables
pub mod admin;
/// Service access token and base id from environment variables
pub mod credentials;
/// Table names, display and session settings from config.toml
pub mod settings;

pub use admin::AdminCredentials;
pub use credentials::{ConfigReport, ServiceCredentials, VarStatus, check_environment};
pub use settings::{DEFAULT_CONFIG_PATH, Settings, TableNames, load_settings};

use crate::errors::Result;
use std::path::Path;

/// Everything read at startup except the service credentials, which are only
/// required once a command needs the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Parsed config.toml (or defaults)
    pub settings: Settings,
    /// The login accepted by the session store
    pub admin: AdminCredentials,
}

/// Loads settings from `path` and the admin login from the environment.
pub fn load_app_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let settings = load_settings(path)?;
    let admin = AdminCredentials::from_env();
    tracing::info!(
        students_table = %settings.service.tables.students,
        lessons_table = %settings.service.tables.lessons,
        "Configuration loaded"
    );
    Ok(AppConfig { settings, admin })
}
