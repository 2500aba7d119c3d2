//! `confetch fetch` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use confetch_config::ConfigFile;
use confetch_confluence::{ConfluenceClient, resolve_for_site};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fetch command.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Page ID or full page URL.
    page: String,

    /// Write the JSON document to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON with 2-space indentation.
    #[arg(long)]
    pretty: bool,

    /// Path to the config file (default: ~/.config/confetch/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl FetchArgs {
    /// Execute the fetch command.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, the identifier is
    /// invalid, or any upstream fetch fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config_path = self
            .config
            .clone()
            .unwrap_or_else(confetch_config::default_path);
        let credentials = ConfigFile::load(&config_path)?.credentials()?;

        // Host check happens here, before the client touches the network.
        let page = resolve_for_site(&self.page, &credentials.site)?;

        let client = ConfluenceClient::new(
            &credentials.site,
            &credentials.email,
            &credentials.api_token,
        );
        let export = client.fetch_export(&page.id)?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&export)?
        } else {
            serde_json::to_string(&export)?
        };

        match &self.output {
            Some(file) => {
                std::fs::write(file, &json)?;
                output.success(&format!("Wrote export to {}", file.display()));
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(json.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }

        Ok(())
    }
}
