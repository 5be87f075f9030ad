use std::ops::RangeInclusive;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filters::ListQuery;

/// Normalized page of a paginated admin collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Slices one page out of an already filtered collection.
    pub fn from_records(records: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let count = records.len() as u64;
        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let results = records.into_iter().skip(skip).take(limit as usize).collect();

        Self {
            count,
            page,
            limit,
            total_pages: total_pages(count, limit),
            results,
        }
    }

    /// One-based positions of this page's entries within the whole collection.
    pub fn entry_range(&self) -> Option<RangeInclusive<u64>> {
        entry_range(self.page, self.limit, self.count)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

pub fn total_pages(count: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(limit as u64) as u32
}

pub fn entry_range(page: u32, limit: u32, count: u64) -> Option<RangeInclusive<u64>> {
    if page == 0 || limit == 0 {
        return None;
    }
    let first = (page as u64 - 1) * limit as u64 + 1;
    if first > count {
        return None;
    }
    let last = (page as u64 * limit as u64).min(count);
    Some(first..=last)
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
    results: Vec<T>,
}

/// Reads a list response into a [`Paginated`].
///
/// Envelopes may omit any metadata field; the request fills the gaps. A bare
/// JSON array is read as the whole collection on a single page.
pub fn normalize_page<T: DeserializeOwned>(
    body: &[u8],
    requested: &ListQuery,
) -> Result<Paginated<T>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;

    if value.is_array() {
        let results: Vec<T> = serde_json::from_value(value)?;
        let count = results.len() as u64;
        return Ok(Paginated {
            count,
            page: 1,
            limit: results.len().max(1) as u32,
            total_pages: u32::from(count > 0),
            results,
        });
    }

    let envelope: Envelope<T> = serde_json::from_value(value)?;
    let limit = envelope.limit.filter(|limit| *limit > 0).unwrap_or(requested.limit);
    let count = envelope.count.unwrap_or(envelope.results.len() as u64);
    Ok(Paginated {
        count,
        page: envelope.page.unwrap_or(requested.page),
        limit,
        total_pages: envelope
            .total_pages
            .unwrap_or_else(|| total_pages(count, limit)),
        results: envelope.results,
    })
}
