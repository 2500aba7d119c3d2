//! Normalized export document schema.
//!
//! These types define the output contract: field names are camelCase
//! in the serialized JSON, `children` is always present (empty when a
//! comment has no replies), and `inlineContext` is omitted entirely
//! for non-inline comments.

use serde::Serialize;

/// Root export document for one page.
#[derive(Debug, Serialize)]
pub struct PageExport {
    /// Normalized page metadata.
    pub page: PageInfo,
    /// Top-level comments in arrival order; replies nest inside.
    pub comments: Vec<Comment>,
    /// Export generation metadata.
    pub meta: ExportMeta,
}

/// Normalized page metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Page ID (string form of the upstream numeric ID).
    pub id: String,
    /// Page title.
    pub title: String,
    /// Key of the space containing the page.
    pub space_key: String,
    /// Canonical web UI URL.
    pub url: String,
    /// Display name of the page author.
    pub author: String,
    /// Creation timestamp as reported upstream.
    pub created: String,
    /// Last-updated timestamp as reported upstream.
    pub updated: String,
    /// Version number, at least 1.
    pub version: u32,
    /// Labels in listing order.
    pub labels: Vec<String>,
    /// Page body in storage (HTML) markup.
    pub body_html: String,
}

/// One comment or reply node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID (string form of the upstream numeric ID).
    pub id: String,
    /// Comment title.
    pub title: String,
    /// Display name of the comment author.
    pub author: String,
    /// Creation timestamp.
    pub created: String,
    /// Last-updated timestamp.
    pub updated: String,
    /// Comment body in storage (HTML) markup.
    pub body_html: String,
    /// Inline-annotation metadata; present only for inline comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_context: Option<InlineContext>,
    /// Replies in arrival order, recursively the same shape.
    pub children: Vec<Comment>,
}

/// Metadata tying an inline comment to a text selection in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineContext {
    /// Text the comment was anchored to (may be empty).
    pub text_selection: String,
    /// Upstream marker reference (may be empty).
    pub marker_ref: String,
    /// True iff the upstream resolution status is exactly "resolved".
    pub resolved: bool,
}

/// Export generation metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    /// ISO-8601 instant at which the export document was finalized.
    pub fetched_at: String,
    /// Count of every comment node in the tree, all levels included.
    pub total_comments: usize,
}
