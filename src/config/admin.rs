//! Administrator login loaded from environment variables.
//!
//! There is a single shared login. `ADMIN_USERNAME` and `ADMIN_PASSWORD` override
//! the built-in pair; absent or blank values fall back to the defaults rather
//! than failing. Any other value is used as given.

use std::fmt;

/// Environment variable overriding the admin username
pub const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";
/// Environment variable overriding the admin password
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";

/// The one username/password pair allowed to log in
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    /// Login name
    pub username: String,
    password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl AdminCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds the pair from optional overrides, using the default for each
    /// value that is absent or blank.
    #[must_use]
    pub fn from_overrides(username: Option<&str>, password: Option<&str>) -> Self {
        let pick = |value: Option<&str>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| default.to_string(), str::to_string)
        };
        Self {
            username: pick(username, DEFAULT_USERNAME),
            password: pick(password, DEFAULT_PASSWORD),
        }
    }

    /// Reads `ADMIN_USERNAME` / `ADMIN_PASSWORD` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let username = std::env::var(ADMIN_USERNAME_VAR).ok();
        let password = std::env::var(ADMIN_PASSWORD_VAR).ok();
        if username.is_none() || password.is_none() {
            tracing::debug!("Admin login not fully configured, using defaults for missing values");
        }
        Self::from_overrides(username.as_deref(), password.as_deref())
    }

    /// True when the given pair matches exactly.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let admin = AdminCredentials::default();
        assert!(admin.matches("admin", "admin123"));
        assert!(!admin.matches("admin", "wrong"));
        assert!(!admin.matches("Admin", "admin123"));
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let admin = AdminCredentials::from_overrides(Some("tutor"), Some("s3cret-pass"));
        assert!(admin.matches("tutor", "s3cret-pass"));
        assert!(!admin.matches("admin", "admin123"));
    }

    #[test]
    fn test_blank_overrides_fall_back_to_defaults() {
        let admin = AdminCredentials::from_overrides(Some("   "), Some(""));
        assert_eq!(admin, AdminCredentials::default());

        let admin = AdminCredentials::from_overrides(None, None);
        assert_eq!(admin, AdminCredentials::default());
    }

    #[test]
    fn test_overrides_resembling_placeholders_are_kept() {
        let admin = AdminCredentials::from_overrides(Some("your_tutor"), Some("nowhere-2-hide"));
        assert!(admin.matches("your_tutor", "nowhere-2-hide"));
        assert!(!admin.matches("admin", "admin123"));
    }

    #[test]
    fn test_debug_hides_password() {
        let admin = AdminCredentials::new("tutor", "s3cret-pass");
        assert!(!format!("{admin:?}").contains("s3cret-pass"));
    }
}
