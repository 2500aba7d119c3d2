//! Comment tree retrieval and normalization.
//!
//! Every parent (the page, then each comment) gets one paginated
//! child-comment listing. Raw records are normalized through explicit
//! fallback chains, and the tree is assembled with an arena plus a
//! work queue so reply depth never grows the call stack.

use std::collections::VecDeque;

use serde::Deserialize;
use tracing::info;

use crate::client::ConfluenceClient;
use crate::error::ExportError;
use crate::pagination::{Listing, collect_paginated};
use crate::types::{Comment, InlineContext};

/// Page size for child-comment listings.
const PAGE_LIMIT: u32 = 50;

/// Expansions requested for every comment record.
const COMMENT_EXPAND: &str =
    "body.storage,body.view,version,history,extensions.inlineProperties,extensions.resolution";

/// Child-comment listing path for a page or comment ID.
fn child_comment_path(parent_id: &str) -> String {
    format!("/content/{parent_id}/child/comment?expand={COMMENT_EXPAND}&limit={PAGE_LIMIT}")
}

/// Upstream ID, returned as either a JSON string or a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Text(id) => id,
            Self::Number(id) => id.to_string(),
        }
    }
}

/// Raw comment record as returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    id: RawId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    version: Option<RawVersion>,
    #[serde(default)]
    history: Option<RawHistory>,
    #[serde(default)]
    body: Option<RawBody>,
    #[serde(default)]
    extensions: Option<RawExtensions>,
}

/// Version block shared by pages and comments.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawVersion {
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub by: Option<RawUser>,
}

/// History block shared by pages and comments.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawHistory {
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawUser {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Body block with its representation variants.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawBody {
    #[serde(default)]
    pub storage: Option<RawBodyValue>,
    #[serde(default)]
    pub view: Option<RawBodyValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBodyValue {
    #[serde(default)]
    pub value: Option<String>,
}

/// Inline-comment extension block.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExtensions {
    #[serde(default)]
    inline_properties: Option<RawInlineProperties>,
    #[serde(default)]
    resolution: Option<RawResolution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInlineProperties {
    #[serde(default)]
    original_selection: Option<String>,
    #[serde(default)]
    marker_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResolution {
    #[serde(default)]
    status: Option<String>,
}

impl RawExtensions {
    /// Inline context is produced only when the record actually
    /// carries inline properties.
    fn into_inline_context(self) -> Option<InlineContext> {
        let props = self.inline_properties?;
        let resolved =
            self.resolution.and_then(|r| r.status).as_deref() == Some("resolved");

        Some(InlineContext {
            text_selection: props.original_selection.unwrap_or_default(),
            marker_ref: props.marker_ref.unwrap_or_default(),
            resolved,
        })
    }
}

/// First value produced by an ordered chain of accessor attempts.
fn first_of<const N: usize>(chain: [Option<String>; N], fallback: &str) -> String {
    chain
        .into_iter()
        .flatten()
        .next()
        .unwrap_or_else(|| fallback.to_owned())
}

impl RawComment {
    /// Normalize into the output shape, with no children attached yet.
    fn normalize(self) -> Comment {
        let (version_when, version_author) = self
            .version
            .map(|v| (v.when, v.by.and_then(|user| user.display_name)))
            .unwrap_or_default();
        let (created_date, creator) = self
            .history
            .map(|h| (h.created_date, h.created_by.and_then(|user| user.display_name)))
            .unwrap_or_default();
        let (storage, view) = self
            .body
            .map(|b| {
                (
                    b.storage.and_then(|body| body.value),
                    b.view.and_then(|body| body.value),
                )
            })
            .unwrap_or_default();

        Comment {
            id: self.id.into_string(),
            title: self.title.unwrap_or_default(),
            author: first_of([version_author, creator], "unknown"),
            created: first_of([version_when.clone(), created_date], ""),
            updated: first_of([version_when], ""),
            body_html: first_of([storage, view], ""),
            inline_context: self.extensions.and_then(RawExtensions::into_inline_context),
            children: Vec::new(),
        }
    }
}

/// Arena slot used during tree assembly.
struct Node {
    comment: Option<Comment>,
    children: Vec<usize>,
}

/// Build the full comment tree under one root content ID.
///
/// `fetch` performs one listing-page request; each discovered comment
/// is queued for its own child listing, so depth is bounded only by
/// the data. Sibling order follows upstream arrival order at every
/// level.
pub(crate) fn build_tree<F>(root_id: &str, mut fetch: F) -> Result<Vec<Comment>, ExportError>
where
    F: FnMut(&str) -> Result<Listing, ExportError>,
{
    let mut nodes: Vec<Node> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();

    let mut pending: VecDeque<(Option<usize>, String)> = VecDeque::new();
    pending.push_back((None, root_id.to_owned()));

    while let Some((parent, id)) = pending.pop_front() {
        let records = collect_paginated(&child_comment_path(&id), &mut fetch)?;

        for record in records {
            let raw: RawComment = serde_json::from_value(record)?;
            let comment = raw.normalize();
            let index = nodes.len();

            pending.push_back((Some(index), comment.id.clone()));
            nodes.push(Node {
                comment: Some(comment),
                children: Vec::new(),
            });

            match parent {
                Some(parent) => nodes[parent].children.push(index),
                None => roots.push(index),
            }
        }
    }

    // Children always sit at higher indices than their parent, so a
    // reverse sweep finalizes every subtree before its parent.
    for index in (0..nodes.len()).rev() {
        let child_indices = std::mem::take(&mut nodes[index].children);
        let mut children = Vec::with_capacity(child_indices.len());
        for child in child_indices {
            children.push(nodes[child].comment.take().expect("child taken once"));
        }
        if let Some(comment) = nodes[index].comment.as_mut() {
            comment.children = children;
        }
    }

    Ok(roots
        .iter()
        .map(|&index| nodes[index].comment.take().expect("root taken once"))
        .collect())
}

impl ConfluenceClient {
    /// Fetch all top-level comments of a page, replies included.
    pub(crate) fn fetch_comment_tree(&self, page_id: &str) -> Result<Vec<Comment>, ExportError> {
        info!("Fetching comment tree for page {page_id}");
        build_tree(page_id, |path| self.get_listing(path))
    }
}
