//! Pagination query parameters and response headers
//!
//! Offsets are one-based on the wire (`page=1` is the first page) and
//! zero-based in [`PageRequest`].

use axum::http::{header, HeaderMap, HeaderValue};
use serde::{Deserialize, Deserializer};

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::DomainError;

pub const DEFAULT_OFFSET: u32 = 1;
pub const MIN_OFFSET: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Header carrying the size of the whole result set
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// `?page=&per_page=` query parameters
///
/// A parameter sent without a value counts as absent.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub per_page: Option<i64>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Apply defaults to raw offset/limit values
fn normalize(offset: Option<i64>, limit: Option<i64>) -> (u32, u32) {
    let offset = match offset {
        Some(o) if o >= i64::from(MIN_OFFSET) => u32::try_from(o).unwrap_or(u32::MAX),
        _ => DEFAULT_OFFSET,
    };

    let limit = match limit {
        Some(l) if (1..=i64::from(MAX_LIMIT)).contains(&l) => l as u32,
        _ => DEFAULT_LIMIT,
    };

    (offset, limit)
}

/// Build the repository page request for a one-based offset and a limit
pub fn page_request(offset: Option<i64>, limit: Option<i64>) -> Result<PageRequest, DomainError> {
    let (offset, limit) = normalize(offset, limit);
    PageRequest::new(offset - 1, limit)
}

/// `X-Total-Count` and `Link` headers for a page
pub fn pagination_headers<T>(
    page: &Page<T>,
    base_path: &str,
    offset: Option<i64>,
    limit: Option<i64>,
) -> HeaderMap {
    let (offset, limit) = normalize(offset, limit);
    let total_pages = page.total_pages();

    let mut links = Vec::with_capacity(4);

    if u64::from(offset) < total_pages {
        links.push(link(base_path, u64::from(offset) + 1, limit, "next"));
    }

    if offset > 1 {
        links.push(link(base_path, u64::from(offset) - 1, limit, "prev"));
    }

    links.push(link(base_path, total_pages.max(1), limit, "last"));
    links.push(link(base_path, 1, limit, "first"));

    let mut headers = HeaderMap::new();
    headers.insert(
        TOTAL_COUNT_HEADER,
        HeaderValue::from(page.total_elements()),
    );

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(header::LINK, value);
    }

    headers
}

fn link(base_path: &str, page: u64, limit: u32, rel: &str) -> String {
    format!(
        "<{}?page={}&per_page={}>; rel=\"{}\"",
        base_path, page, limit, rel
    )
}
