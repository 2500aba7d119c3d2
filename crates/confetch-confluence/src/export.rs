//! Page export assembly.

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use tracing::info;

use crate::client::ConfluenceClient;
use crate::comments::{RawBody, RawHistory, RawId, RawVersion};
use crate::error::ExportError;
use crate::types::{Comment, ExportMeta, PageExport, PageInfo};

/// Expansions requested for the page metadata fetch.
const PAGE_EXPAND: &str = "body.storage,version,history,space,metadata.labels";

/// Raw page record as returned by the API.
#[derive(Debug, Deserialize)]
struct RawPage {
    id: RawId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    space: Option<RawSpace>,
    #[serde(default)]
    version: Option<RawVersion>,
    #[serde(default)]
    history: Option<RawHistory>,
    #[serde(default)]
    body: Option<RawBody>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(rename = "_links", default)]
    links: Option<RawPageLinks>,
}

#[derive(Debug, Deserialize)]
struct RawSpace {
    #[serde(default)]
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    labels: Option<RawLabels>,
}

#[derive(Debug, Deserialize)]
struct RawLabels {
    #[serde(default)]
    results: Vec<RawLabel>,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPageLinks {
    #[serde(default)]
    webui: Option<String>,
}

impl RawPage {
    /// Normalize into the output shape. Missing optional fields
    /// degrade to empty string, empty list, or version 1.
    fn normalize(self, web_base: &str) -> PageInfo {
        let (updated, version_number, version_author) = self
            .version
            .map(|v| (v.when, v.number, v.by.and_then(|user| user.display_name)))
            .unwrap_or_default();
        let (created, creator) = self
            .history
            .map(|h| (h.created_date, h.created_by.and_then(|user| user.display_name)))
            .unwrap_or_default();

        let webui = self
            .links
            .and_then(|links| links.webui)
            .unwrap_or_default();

        PageInfo {
            id: self.id.into_string(),
            title: self.title.unwrap_or_default(),
            space_key: self
                .space
                .and_then(|space| space.key)
                .unwrap_or_default(),
            url: format!("{web_base}{webui}"),
            author: version_author.or(creator).unwrap_or_else(|| "unknown".to_owned()),
            created: created.unwrap_or_default(),
            updated: updated.unwrap_or_default(),
            version: version_number.unwrap_or(1),
            labels: self
                .metadata
                .and_then(|meta| meta.labels)
                .map(|labels| {
                    labels
                        .results
                        .into_iter()
                        .filter_map(|label| label.name)
                        .collect()
                })
                .unwrap_or_default(),
            body_html: self
                .body
                .and_then(|body| body.storage.and_then(|storage| storage.value))
                .unwrap_or_default(),
        }
    }
}

/// Count every node reachable through `children`, all levels included.
///
/// Iterative on purpose; tree depth is unbounded.
#[must_use]
pub fn count_comments(comments: &[Comment]) -> usize {
    let mut stack: Vec<&Comment> = comments.iter().collect();
    let mut total = 0;

    while let Some(comment) = stack.pop() {
        total += 1;
        stack.extend(comment.children.iter());
    }

    total
}

impl ConfluenceClient {
    /// Fetch a page and its full comment tree as one export document.
    ///
    /// # Errors
    ///
    /// Any failed fetch aborts the whole export; there is no
    /// partial-success mode.
    pub fn fetch_export(&self, page_id: &str) -> Result<PageExport, ExportError> {
        info!("Fetching page {page_id}");

        let raw: RawPage = serde_json::from_value(
            self.get_json(&format!("/content/{page_id}?expand={PAGE_EXPAND}"))?,
        )?;
        let page = raw.normalize(self.web_base());

        let comments = self.fetch_comment_tree(page_id)?;
        let total_comments = count_comments(&comments);
        info!("Fetched {total_comments} comments for page {page_id}");

        // Stamped when the document is finalized, not when the first
        // request went out.
        Ok(PageExport {
            page,
            comments,
            meta: ExportMeta {
                fetched_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                total_comments,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn normalize(record: serde_json::Value) -> PageInfo {
        let raw: RawPage = serde_json::from_value(record).unwrap();
        raw.normalize("https://example.atlassian.net/wiki")
    }

    #[test]
    fn test_normalize_full_page() {
        let page = normalize(json!({
            "id": "22982787097",
            "title": "Release Plan",
            "space": { "key": "DOC" },
            "version": { "number": 7, "when": "2025-03-01T10:00:00.000Z",
                         "by": { "displayName": "Ann" } },
            "history": { "createdDate": "2024-12-24T08:00:00.000Z",
                         "createdBy": { "displayName": "Bob" } },
            "body": { "storage": { "value": "<p>body</p>" } },
            "metadata": { "labels": { "results": [
                { "name": "release" }, { "name": "plan" }
            ] } },
            "_links": { "webui": "/spaces/DOC/pages/22982787097/Release+Plan" }
        }));

        assert_eq!(page.id, "22982787097");
        assert_eq!(page.title, "Release Plan");
        assert_eq!(page.space_key, "DOC");
        assert_eq!(
            page.url,
            "https://example.atlassian.net/wiki/spaces/DOC/pages/22982787097/Release+Plan"
        );
        assert_eq!(page.author, "Ann");
        assert_eq!(page.created, "2024-12-24T08:00:00.000Z");
        assert_eq!(page.updated, "2025-03-01T10:00:00.000Z");
        assert_eq!(page.version, 7);
        assert_eq!(page.labels, vec!["release".to_owned(), "plan".to_owned()]);
        assert_eq!(page.body_html, "<p>body</p>");
    }

    #[test]
    fn test_normalize_sparse_page() {
        let page = normalize(json!({ "id": 42 }));

        assert_eq!(page.id, "42");
        assert_eq!(page.title, "");
        assert_eq!(page.space_key, "");
        assert_eq!(page.url, "https://example.atlassian.net/wiki");
        assert_eq!(page.author, "unknown");
        assert_eq!(page.created, "");
        assert_eq!(page.updated, "");
        assert_eq!(page.version, 1);
        assert_eq!(page.labels, Vec::<String>::new());
        assert_eq!(page.body_html, "");
    }

    fn comment(id: &str, children: Vec<Comment>) -> Comment {
        Comment {
            id: id.to_owned(),
            title: String::new(),
            author: "unknown".to_owned(),
            created: String::new(),
            updated: String::new(),
            body_html: String::new(),
            inline_context: None,
            children,
        }
    }

    #[test]
    fn test_count_comments_empty() {
        assert_eq!(count_comments(&[]), 0);
    }

    #[test]
    fn test_count_comments_depth_three_fan_out_two() {
        let leaf_pair = || vec![comment("x", Vec::new()), comment("y", Vec::new())];
        let mid = |id: &str| comment(id, leaf_pair());
        let tree = vec![
            comment("a", vec![mid("a1"), mid("a2")]),
            comment("b", vec![mid("b1"), mid("b2")]),
        ];

        assert_eq!(count_comments(&tree), 14);
    }
}
