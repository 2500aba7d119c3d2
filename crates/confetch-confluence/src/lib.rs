//! Confluence Cloud export client.
//!
//! Fetches a page and its full comment tree (nested replies and
//! inline-annotation metadata included) over the REST API and
//! normalizes the result into a stable JSON document.

mod client;
mod comments;
mod error;
mod export;
mod pagination;
mod resolver;
mod types;

pub use client::ConfluenceClient;
pub use error::ExportError;
pub use export::count_comments;
pub use resolver::{PageId, resolve, resolve_for_site};
pub use types::{Comment, ExportMeta, InlineContext, PageExport, PageInfo};
