//! Pagination cursors and the page aggregation loops.
//!
//! Two strategies exist:
//! - numbered pages (`page` + `perPage`), used for issue search, users,
//!   components and priorities. Totals come from `X-Total-Pages` / `X-Total-Count`.
//! - watermark pages (`id` + `perPage`), used for comments. Each page starts after
//!   the id of the last comment on the previous page.
//!
//! Pages are always fetched one after another; each request depends on the
//! previous response.

use std::collections::HashSet;
use std::future::Future;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::Result;

/// Page size used by single-page calls when none is given.
pub const DEFAULT_PAGE_SIZE: i32 = 5;

/// Page size used when aggregating all pages and for comment pages.
pub const FETCH_ALL_PAGE_SIZE: i32 = 50;

/// Response header carrying the total number of pages.
pub const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";

/// Response header carrying the total number of items.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// What to do when a page after the first one fails during aggregation.
///
/// A failure on the first page is always returned to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePolicy {
    /// Abort and return the error.
    #[default]
    Strict,
    /// Log the error and keep what was collected. A failed numbered page
    /// contributes no items; a failed watermark page ends the walk.
    Lenient,
}

/// Numbered page cursor.
///
/// Values `<= 0` mean "unset" and are replaced by the defaults on send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: i32,
    pub page: i32,
}

impl PageRequest {
    pub fn new(page: i32, per_page: i32) -> Self {
        Self { per_page, page }
    }

    /// Apply the single-page defaults: size 5, page 1.
    pub fn with_defaults(self) -> Self {
        Self {
            per_page: if self.per_page <= 0 {
                DEFAULT_PAGE_SIZE
            } else {
                self.per_page
            },
            page: if self.page <= 0 { 1 } else { self.page },
        }
    }

    /// `perPage` and `page` query pairs after defaults are applied.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        let normalized = self.with_defaults();
        [
            ("perPage", normalized.per_page.to_string()),
            ("page", normalized.page.to_string()),
        ]
    }
}

/// Watermark cursor for comment listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentCursor {
    /// Values `<= 0` fall back to 50.
    pub per_page: i32,
    /// Return comments after this id. Values `<= 0` start from the beginning.
    pub from_id: i64,
}

impl CommentCursor {
    pub fn new(per_page: i32, from_id: i64) -> Self {
        Self { per_page, from_id }
    }

    pub fn after(self, from_id: i64) -> Self {
        Self { from_id, ..self }
    }

    pub fn per_page(&self) -> i32 {
        if self.per_page <= 0 {
            FETCH_ALL_PAGE_SIZE
        } else {
            self.per_page
        }
    }

    /// The `id` query value, only present for a positive watermark.
    pub fn from_id_query(&self) -> Option<String> {
        (self.from_id > 0).then(|| self.from_id.to_string())
    }
}

/// Pagination metadata read from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageResponse {
    pub total_pages: i64,
    pub total_count: i64,
    /// Id of the last item on the page; only set for watermark pages, 0 when empty.
    pub last_id: i64,
}

impl PageResponse {
    /// Parse totals from headers. Missing or unparseable values become 0.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            total_pages: header_number(headers, TOTAL_PAGES_HEADER),
            total_count: header_number(headers, TOTAL_COUNT_HEADER),
            last_id: 0,
        }
    }

    pub fn with_last_id(self, last_id: i64) -> Self {
        Self { last_id, ..self }
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> i64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// One page of items with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageResponse,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, info: PageResponse) -> Self {
        Self { items, info }
    }
}

/// Fetch every numbered page with a page size of 50.
///
/// Page 1 is requested first; pages `2..=total_pages` follow in order.
pub async fn collect_numbered<T, F, Fut>(policy: PagePolicy, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let first = fetch(PageRequest::new(1, FETCH_ALL_PAGE_SIZE)).await?;
    let total_pages = first.info.total_pages;
    let mut items = first.items;
    debug!(total_pages, "Fetched first page");

    let mut page = 1;
    while i64::from(page) < total_pages {
        page += 1;
        match fetch(PageRequest::new(page, FETCH_ALL_PAGE_SIZE)).await {
            Ok(next) => items.extend(next.items),
            Err(e) => match policy {
                PagePolicy::Strict => return Err(e),
                PagePolicy::Lenient => {
                    warn!(page, error = %e, "Skipping failed page");
                }
            },
        }
    }

    Ok(items)
}

/// Walk watermark pages until a page reports no last id.
///
/// Stops early if the API hands back a watermark that was already requested.
pub async fn collect_watermarked<T, F, Fut>(
    policy: PagePolicy,
    per_page: i32,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(CommentCursor) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let cursor = CommentCursor::new(per_page, 0);
    let first = fetch(cursor).await?;
    let mut items = first.items;
    let mut from_id = first.info.last_id;
    let mut seen = HashSet::new();

    while from_id > 0 {
        if !seen.insert(from_id) {
            warn!(from_id, "Watermark repeated, stopping");
            break;
        }
        match fetch(cursor.after(from_id)).await {
            Ok(next) => {
                from_id = next.info.last_id;
                items.extend(next.items);
            }
            Err(e) => match policy {
                PagePolicy::Strict => return Err(e),
                PagePolicy::Lenient => {
                    warn!(from_id, error = %e, "Stopping after failed page");
                    break;
                }
            },
        }
    }

    Ok(items)
}
