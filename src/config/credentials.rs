//! Service credentials from environment variables.
//!
//! The access token and base id are required to reach the tabular-data service.
//! They are read once at startup; problems surface as a configuration error the
//! first time a client is built, and `check_environment` lists every problem at
//! once for the startup diagnostic.

use crate::errors::{Error, Result};
use std::fmt;

/// Environment variable holding the personal access token
pub const API_KEY_VAR: &str = "AIRTABLE_API_KEY";
/// Environment variable holding the base id
pub const BASE_ID_VAR: &str = "AIRTABLE_BASE_ID";

/// True when a value is empty or still the template text from `.env.example`.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.contains("your_") || value.contains("here")
}

/// Credentials for one base of the tabular-data service
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    /// Personal access token
    pub api_key: String,
    /// Base (workspace) id
    pub base_id: String,
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("api_key", &format_args!("<{} chars>", self.api_key.len()))
            .field("base_id", &self.base_id)
            .finish()
    }
}

/// Outcome of checking one environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarStatus {
    /// Present with a real-looking value
    Set,
    /// Absent or empty
    Missing,
    /// Still holds template text
    Placeholder,
}

/// Result of checking the service environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    /// Status of the access token variable
    pub api_key: VarStatus,
    /// Status of the base id variable
    pub base_id: VarStatus,
}

impl ConfigReport {
    /// True when both variables hold usable values.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.api_key == VarStatus::Set && self.base_id == VarStatus::Set
    }

    /// One line per unusable variable.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        [(API_KEY_VAR, &self.api_key), (BASE_ID_VAR, &self.base_id)]
            .into_iter()
            .filter_map(|(name, status)| match status {
                VarStatus::Set => None,
                VarStatus::Missing => Some(format!("{name} is not set")),
                VarStatus::Placeholder => Some(format!("{name} still holds the example value")),
            })
            .collect()
    }
}

fn var_status(value: Option<&str>) -> VarStatus {
    match value {
        None => VarStatus::Missing,
        Some(v) if v.trim().is_empty() => VarStatus::Missing,
        Some(v) if is_placeholder(v) => VarStatus::Placeholder,
        Some(_) => VarStatus::Set,
    }
}

impl ServiceCredentials {
    /// Builds credentials from raw values, rejecting missing or placeholder ones.
    pub fn from_values(api_key: Option<&str>, base_id: Option<&str>) -> Result<Self> {
        let report = ConfigReport {
            api_key: var_status(api_key),
            base_id: var_status(base_id),
        };
        match (api_key, base_id) {
            (Some(api_key), Some(base_id)) if report.is_ok() => Ok(Self {
                api_key: api_key.trim().to_string(),
                base_id: base_id.trim().to_string(),
            }),
            _ => Err(Error::Config {
                message: report.problems().join("; "),
            }),
        }
    }

    /// Reads `AIRTABLE_API_KEY` and `AIRTABLE_BASE_ID` from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).ok();
        let base_id = std::env::var(BASE_ID_VAR).ok();
        Self::from_values(api_key.as_deref(), base_id.as_deref())
    }
}

/// Checks the service variables without failing, for the startup diagnostic.
#[must_use]
pub fn check_environment() -> ConfigReport {
    ConfigReport {
        api_key: var_status(std::env::var(API_KEY_VAR).ok().as_deref()),
        base_id: var_status(std::env::var(BASE_ID_VAR).ok().as_deref()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("your_airtable_token"));
        assert!(is_placeholder("paste_token_here"));
        assert!(!is_placeholder("patR4nd0mT0k3n.abc123"));
    }

    #[test]
    fn test_from_values_accepts_real_values() {
        let credentials = ServiceCredentials::from_values(Some(" patABC.123 "), Some("appXYZ")).ok();
        assert_eq!(
            credentials,
            Some(ServiceCredentials {
                api_key: "patABC.123".to_string(),
                base_id: "appXYZ".to_string(),
            })
        );
    }

    #[test]
    fn test_from_values_reports_every_problem() {
        let result = ServiceCredentials::from_values(None, Some("your_base_id"));
        let Err(Error::Config { message }) = result else {
            panic!("expected a configuration error");
        };
        assert!(message.contains("AIRTABLE_API_KEY is not set"));
        assert!(message.contains("AIRTABLE_BASE_ID still holds the example value"));
    }

    #[test]
    fn test_debug_hides_token() {
        let credentials = ServiceCredentials {
            api_key: "patSECRET".to_string(),
            base_id: "appXYZ".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("patSECRET"));
        assert!(debug.contains("appXYZ"));
    }

    #[test]
    fn test_report_problems() {
        let report = ConfigReport {
            api_key: VarStatus::Set,
            base_id: VarStatus::Missing,
        };
        assert!(!report.is_ok());
        assert_eq!(report.problems(), vec!["AIRTABLE_BASE_ID is not set".to_string()]);
    }
}
