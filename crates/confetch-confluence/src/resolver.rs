//! Page identifier resolution.
//!
//! Accepts either a bare numeric page ID or a full page URL and
//! extracts the ID. URL inputs also carry their host so the caller
//! can verify it against the configured site before any request is
//! made.

use url::Url;

use crate::error::ExportError;

/// A resolved page identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageId {
    /// Numeric page ID in string form.
    pub id: String,
    /// Host from a URL input, lower-cased. `None` for bare numeric
    /// input.
    pub host_from_url: Option<String>,
}

/// Resolve a user-supplied page identifier.
///
/// Digits-only input (after trimming) is taken as the page ID
/// directly. Anything else must parse as an absolute URL containing
/// either a `/pages/<digits>` path segment pair or a numeric `pageId`
/// query parameter.
///
/// # Errors
///
/// Returns [`ExportError::InvalidInput`] when the input is neither
/// numeric nor a URL with an extractable numeric ID.
pub fn resolve(input: &str) -> Result<PageId, ExportError> {
    let trimmed = input.trim();

    if is_digits(trimmed) {
        return Ok(PageId {
            id: trimmed.to_owned(),
            host_from_url: None,
        });
    }

    let url = Url::parse(trimmed).map_err(|_| {
        ExportError::InvalidInput("provide a numeric page ID or a full page URL".to_owned())
    })?;

    let id = id_from_url(&url).ok_or_else(|| {
        ExportError::InvalidInput(
            "could not extract a numeric page ID from the provided URL".to_owned(),
        )
    })?;

    Ok(PageId {
        id,
        host_from_url: url.host_str().map(str::to_lowercase),
    })
}

/// Resolve an identifier and verify a URL-derived host against the
/// configured site.
///
/// Runs entirely before any network call.
///
/// # Errors
///
/// Returns [`ExportError::HostMismatch`] when the input was a URL
/// whose host differs (case-insensitively) from `site`.
pub fn resolve_for_site(input: &str, site: &str) -> Result<PageId, ExportError> {
    let page = resolve(input)?;

    if let Some(host) = &page.host_from_url
        && !host.eq_ignore_ascii_case(site)
    {
        return Err(ExportError::HostMismatch {
            url_host: host.clone(),
            configured: site.to_owned(),
        });
    }

    Ok(page)
}

/// Extract a numeric ID from the first `/pages/<digits>` path segment
/// pair, falling back to a `pageId` query parameter.
fn id_from_url(url: &Url) -> Option<String> {
    if let Some(segments) = url.path_segments() {
        let segments: Vec<&str> = segments.collect();
        for pair in segments.windows(2) {
            if pair[0] == "pages" && is_digits(pair[1]) {
                return Some(pair[1].to_owned());
            }
        }
    }

    url.query_pairs()
        .find(|(key, value)| key == "pageId" && is_digits(value))
        .map(|(_, value)| value.into_owned())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
