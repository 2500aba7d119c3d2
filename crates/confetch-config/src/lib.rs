//! Local credential store for confetch.
//!
//! A small TOML file holds the site hostname, account email and API
//! token used to authenticate against the Confluence REST API. Every
//! key is optional on disk; [`ConfigFile::credentials`] turns the
//! stored values into a validated triple or reports every unset key
//! at once.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default config file location, tilde-expanded at lookup time.
const DEFAULT_CONFIG_PATH: &str = "~/.config/confetch/config.toml";

/// Stored configuration as read from disk.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ConfigFile {
    /// Tenant hostname, e.g. `example.atlassian.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// API token for the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

/// Validated credential triple consumed by the export client.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Tenant hostname, lower-cased, no scheme or path.
    pub site: String,
    /// Account email.
    pub email: String,
    /// API token, non-empty.
    pub api_token: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// One or more required keys are unset.
    #[error("missing configuration: {} (run `confetch config set`)", .0.join(", "))]
    Missing(Vec<String>),
}

/// Default config file path (`~/.config/confetch/config.toml`).
#[must_use]
pub fn default_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned())
}

impl ConfigFile {
    /// Load the config file, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` or `ConfigError::Parse` when the file
    /// exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Write the config file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Produce the validated credential triple.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming every unset key, or
    /// `ConfigError::Validation` when a stored value is malformed.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let mut missing = Vec::new();
        if self.site.is_none() {
            missing.push("site".to_owned());
        }
        if self.email.is_none() {
            missing.push("email".to_owned());
        }
        if self.api_token.is_none() {
            missing.push("api_token".to_owned());
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let site = normalize_site(self.site.as_deref().unwrap_or_default())?;
        let email = self.email.clone().unwrap_or_default();
        validate_email(&email)?;
        let api_token = self.api_token.clone().unwrap_or_default();
        require_non_empty(&api_token, "api_token")?;

        Ok(Credentials {
            site,
            email,
            api_token,
        })
    }
}

/// Normalize a site value to a bare lower-cased hostname.
///
/// # Errors
///
/// Returns `ConfigError::Validation` when the value is empty or
/// carries a scheme, path, or whitespace.
pub fn normalize_site(site: &str) -> Result<String, ConfigError> {
    let site = site.trim();
    require_non_empty(site, "site")?;
    if site.contains("://") || site.contains('/') {
        return Err(ConfigError::Validation(
            "site must be a bare hostname without scheme or path".to_owned(),
        ));
    }
    if site.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(
            "site must not contain whitespace".to_owned(),
        ));
    }
    Ok(site.to_lowercase())
}

/// Validate an email address: one `@` with non-empty sides.
///
/// # Errors
///
/// Returns `ConfigError::Validation` otherwise.
pub fn validate_email(email: &str) -> Result<(), ConfigError> {
    require_non_empty(email, "email")?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        return Err(ConfigError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn full_config() -> ConfigFile {
        ConfigFile {
            site: Some("example.atlassian.net".to_owned()),
            email: Some("dev@example.com".to_owned()),
            api_token: Some("token123".to_owned()),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load(&dir.path().join("config.toml")).unwrap();
        assert!(config.site.is_none());
        assert!(config.email.is_none());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/confetch/config.toml");

        full_config().save(&path).unwrap();
        let loaded = ConfigFile::load(&path).unwrap();

        assert_eq!(loaded.site.as_deref(), Some("example.atlassian.net"));
        assert_eq!(loaded.email.as_deref(), Some("dev@example.com"));
        assert_eq!(loaded.api_token.as_deref(), Some("token123"));
    }

    #[test]
    fn test_save_skips_unset_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        ConfigFile {
            site: Some("example.atlassian.net".to_owned()),
            ..ConfigFile::default()
        }
        .save(&path)
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("site"));
        assert!(!text.contains("email"));
        assert!(!text.contains("api_token"));
    }

    #[test]
    fn test_credentials_reports_every_missing_key() {
        let err = ConfigFile::default().credentials().unwrap_err();
        match err {
            ConfigError::Missing(keys) => {
                assert_eq!(keys, vec!["site".to_owned(), "email".to_owned(), "api_token".to_owned()]);
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_credentials_reports_single_missing_key() {
        let mut config = full_config();
        config.email = None;
        let err = config.credentials().unwrap_err();
        match err {
            ConfigError::Missing(keys) => assert_eq!(keys, vec!["email".to_owned()]),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_credentials_lowercases_site() {
        let mut config = full_config();
        config.site = Some("Example.Atlassian.NET".to_owned());
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.site, "example.atlassian.net");
    }

    #[test]
    fn test_normalize_site_rejects_scheme_and_path() {
        assert!(normalize_site("https://example.atlassian.net").is_err());
        assert!(normalize_site("example.atlassian.net/wiki").is_err());
        assert!(normalize_site("").is_err());
        assert_eq!(
            normalize_site(" example.atlassian.net ").unwrap(),
            "example.atlassian.net"
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dev@example.com").is_ok());
        assert!(validate_email("dev").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("dev@").is_err());
        assert!(validate_email("").is_err());
    }
}
