//! Authenticated Confluence REST API client.
//!
//! Sync HTTP client for the Confluence Cloud REST API using HTTP Basic
//! authentication (`email:api_token`). The client holds no mutable
//! state after construction and is reused for every request of one
//! export.

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde_json::Value;
use ureq::Agent;

use crate::error::ExportError;
use crate::pagination::Listing;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// REST API root path, relative to the site host.
///
/// Relative `_links.next` values sometimes repeat this prefix; the
/// paginated fetcher strips it before reusing the link.
pub(crate) const API_ROOT: &str = "/wiki/rest/api";

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    web_base: String,
    api_base: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create a client for one site from validated credentials.
    ///
    /// # Arguments
    /// * `site` - Tenant hostname, e.g. `example.atlassian.net`
    /// * `email` - Account email
    /// * `api_token` - API token for the account
    #[must_use]
    pub fn new(site: &str, email: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let credentials = BASE64_STANDARD.encode(format!("{email}:{api_token}"));
        let site = site.trim_end_matches('/');

        Self {
            agent,
            web_base: format!("https://{site}/wiki"),
            api_base: format!("https://{site}{API_ROOT}"),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Base URL for web UI links (`_links.webui` paths resolve against it).
    pub(crate) fn web_base(&self) -> &str {
        &self.web_base
    }

    /// Resolve a request path against the API base URL.
    fn request_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            format!("{}{}", self.api_base, path)
        }
    }

    /// GET a JSON document from the API.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Transport`] for any non-success status;
    /// no partial body is consumed in that case.
    pub(crate) fn get_json(&self, path: &str) -> Result<Value, ExportError> {
        let url = self.request_url(path);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Transport {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_owned(),
                method: "GET".to_owned(),
                url,
            });
        }

        Ok(response.into_body().read_json()?)
    }

    /// GET one page of a paginated listing.
    pub(crate) fn get_listing(&self, path: &str) -> Result<Listing, ExportError> {
        Ok(serde_json::from_value(self.get_json(path)?)?)
    }
}
