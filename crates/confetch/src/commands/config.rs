//! `confetch config` command implementations.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, Subcommand};
use confetch_config::{ConfigFile, normalize_site, validate_email};

use crate::error::CliError;
use crate::output::Output;

/// Credential management commands.
#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Store credential values.
    Set(SetArgs),
    /// Show stored values (token redacted).
    Show(ShowArgs),
}

impl ConfigCommand {
    /// Execute the config command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Set(args) => args.execute(),
            Self::Show(args) => args.execute(),
        }
    }
}

/// Arguments for the config set command.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// Tenant hostname, e.g. example.atlassian.net.
    #[arg(long)]
    site: Option<String>,

    /// Account email.
    #[arg(long)]
    email: Option<String>,

    /// API token for the account.
    #[arg(long)]
    api_token: Option<String>,

    /// Path to the config file (default: ~/.config/confetch/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SetArgs {
    /// Execute the config set command.
    ///
    /// With no value flags and a terminal attached, prompts for each
    /// key interactively; existing values are kept on empty input.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let path = self
            .config
            .clone()
            .unwrap_or_else(confetch_config::default_path);
        let mut config = ConfigFile::load(&path)?;

        let no_flags = self.site.is_none() && self.email.is_none() && self.api_token.is_none();
        let (site, email, api_token) = if no_flags {
            if !io::stdin().is_terminal() {
                return Err(CliError::Validation(
                    "nothing to set; pass --site, --email or --api-token".to_owned(),
                ));
            }
            prompt_values(&config)?
        } else {
            (self.site, self.email, self.api_token)
        };

        if let Some(site) = site {
            config.site = Some(normalize_site(&site)?);
        }
        if let Some(email) = email {
            validate_email(&email)?;
            config.email = Some(email);
        }
        if let Some(api_token) = api_token {
            config.api_token = Some(api_token);
        }

        config.save(&path)?;
        output.success(&format!("Saved configuration to {}", path.display()));
        Ok(())
    }
}

/// Prompt for each key on the attached terminal. Empty input keeps
/// the current value.
fn prompt_values(
    current: &ConfigFile,
) -> Result<(Option<String>, Option<String>, Option<String>), CliError> {
    let site = prompt("Site (e.g. example.atlassian.net)", current.site.as_deref())?;
    let email = prompt("Email", current.email.as_deref())?;
    let api_token = prompt(
        "API token",
        current.api_token.as_ref().map(|_| "keep current"),
    )?;
    Ok((site, email, api_token))
}

fn prompt(label: &str, current: Option<&str>) -> Result<Option<String>, CliError> {
    match current {
        Some(value) => write!(io::stdout(), "{label} [{value}]: ")?,
        None => write!(io::stdout(), "{label}: ")?,
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim();
    Ok(if line.is_empty() {
        None
    } else {
        Some(line.to_owned())
    })
}

/// Arguments for the config show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Path to the config file (default: ~/.config/confetch/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ShowArgs {
    /// Execute the config show command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let path = self
            .config
            .clone()
            .unwrap_or_else(confetch_config::default_path);
        let config = ConfigFile::load(&path)?;

        output.info(&format!("Config file: {}", path.display()));
        output.info(&format!("site:      {}", display_value(config.site.as_deref())));
        output.info(&format!("email:     {}", display_value(config.email.as_deref())));
        output.info(&format!(
            "api_token: {}",
            if config.api_token.is_some() {
                "(set)"
            } else {
                "(unset)"
            }
        ));
        Ok(())
    }
}

fn display_value(value: Option<&str>) -> &str {
    value.unwrap_or("(unset)")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_set_normalizes_and_persists_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        SetArgs {
            site: Some("Example.Atlassian.NET".to_owned()),
            email: Some("dev@example.com".to_owned()),
            api_token: Some("token123".to_owned()),
            config: Some(path.clone()),
        }
        .execute()
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.site.as_deref(), Some("example.atlassian.net"));
        assert_eq!(config.email.as_deref(), Some("dev@example.com"));
        assert_eq!(config.api_token.as_deref(), Some("token123"));
    }

    #[test]
    fn test_set_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        ConfigFile {
            site: Some("example.atlassian.net".to_owned()),
            ..ConfigFile::default()
        }
        .save(&path)
        .unwrap();

        SetArgs {
            site: None,
            email: Some("dev@example.com".to_owned()),
            api_token: None,
            config: Some(path.clone()),
        }
        .execute()
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.site.as_deref(), Some("example.atlassian.net"));
        assert_eq!(config.email.as_deref(), Some("dev@example.com"));
    }

    #[test]
    fn test_set_rejects_invalid_email() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = SetArgs {
            site: None,
            email: Some("not-an-email".to_owned()),
            api_token: None,
            config: Some(path),
        }
        .execute()
        .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(Some("x")), "x");
        assert_eq!(display_value(None), "(unset)");
    }
}
