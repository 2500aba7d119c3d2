//! Cursor pagination over Confluence listing endpoints.
//!
//! Listing responses carry their items in `results` and an optional
//! `_links.next` cursor. Pages are fetched strictly sequentially:
//! each page's URL comes from the previous response.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::API_ROOT;
use crate::error::ExportError;

/// One page of a paginated listing response.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    /// Items on this page, in response order.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Hypermedia links; `next` points at the following page.
    #[serde(rename = "_links", default)]
    pub links: Option<ListingLinks>,
}

/// Pagination links of a listing response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// Collect every item of a paginated listing, following `_links.next`
/// until it is absent.
///
/// `fetch` performs one page request. Any error aborts the whole
/// collection; no partial results are returned and nothing is retried
/// here.
pub(crate) fn collect_paginated<F>(
    start_path: &str,
    mut fetch: F,
) -> Result<Vec<Value>, ExportError>
where
    F: FnMut(&str) -> Result<Listing, ExportError>,
{
    let mut items = Vec::new();
    let mut path = start_path.to_owned();

    loop {
        let page = fetch(&path)?;
        items.extend(page.results);

        let Some(next) = page.links.and_then(|links| links.next) else {
            break;
        };
        debug!("Following pagination link {next}");
        path = normalize_next_link(&next);
    }

    Ok(items)
}

/// Normalize a `next` link for reuse as a request path.
///
/// The API base URL already ends with the REST root, so a relative
/// link that repeats it would double the path.
fn normalize_next_link(next: &str) -> String {
    if next.starts_with("http://") || next.starts_with("https://") {
        return next.to_owned();
    }
    next.strip_prefix(API_ROOT).unwrap_or(next).to_owned()
}
