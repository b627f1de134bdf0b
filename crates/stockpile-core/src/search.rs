//! Free-text and structured item search.

use crate::error::{CoreError, Result};
use crate::item::{parse_tag_list, Item};
use serde::{Deserialize, Serialize};

/// Default cap on free-text search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Default edit distance tolerated by fuzzy term matching.
pub const DEFAULT_MAX_EDITS: usize = 1;

/// Shorter terms only match as substrings; fuzzy matching them is mostly noise.
const FUZZY_MIN_TERM_LEN: usize = 4;

/// Tuning for free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results returned for a non-empty query.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Maximum edit distance for a fuzzy word match (0 disables fuzzy matching).
    #[serde(default = "default_max_edits")]
    pub max_edits: usize,
}

const fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

const fn default_max_edits() -> usize {
    DEFAULT_MAX_EDITS
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            max_edits: DEFAULT_MAX_EDITS,
        }
    }
}

/// Order items newest first by creation time.
pub fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Rank items against a free-text query.
///
/// A blank query returns every item, newest first. Otherwise items matching at
/// least one term are returned best match first, capped at `options.limit`.
#[must_use]
pub fn search(mut items: Vec<Item>, query: &str, options: &SearchOptions) -> Vec<Item> {
    let terms = split_terms(query);
    if terms.is_empty() {
        sort_newest_first(&mut items);
        return items;
    }

    let mut scored: Vec<(usize, Item)> = items
        .into_iter()
        .filter_map(|item| {
            let score = score(&item, &terms, options.max_edits);
            (score > 0).then_some((score, item))
        })
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| b.created_at.cmp(&a.created_at)));
    scored.truncate(options.limit);

    scored.into_iter().map(|(_, item)| item).collect()
}

/// Structured filter; every criterion present must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Free-text terms, matched without fuzziness.
    pub query: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Tags the item must all carry.
    pub tags: Vec<String>,
}

impl ItemFilter {
    /// Build a filter from raw query-string values. Blank values are ignored.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if a price bound is not a number.
    pub fn from_params(
        query: Option<&str>,
        category: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
        tags: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            query: non_blank(query).map(str::to_string),
            category: non_blank(category).map(str::to_string),
            min_price: non_blank(min_price)
                .map(|v| parse_price("minPrice", v))
                .transpose()?,
            max_price: non_blank(max_price)
                .map(|v| parse_price("maxPrice", v))
                .transpose()?,
            tags: tags.map(parse_tag_list).unwrap_or_default(),
        })
    }

    /// Check if an item matches this filter.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(query) = &self.query {
            let terms = split_terms(query);
            if !terms.is_empty() && score(item, &terms, 0) == 0 {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if item.category != *category {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| item.price < min) {
            return false;
        }

        if self.max_price.is_some_and(|max| item.price > max) {
            return false;
        }

        self.tags.iter().all(|tag| item.has_tag(tag))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(param: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::validation(format!("{param} must be a number, got '{raw}'")))
}

fn split_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Number of (term, field) pairs that match.
fn score(item: &Item, terms: &[String], max_edits: usize) -> usize {
    let fields: Vec<String> = [&item.name, &item.description, &item.category]
        .into_iter()
        .chain(item.tags.iter())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_lowercase())
        .collect();

    terms
        .iter()
        .map(|term| {
            fields
                .iter()
                .filter(|field| term_matches(term, field, max_edits))
                .count()
        })
        .sum()
}

fn term_matches(term: &str, field: &str, max_edits: usize) -> bool {
    if field.contains(term) {
        return true;
    }

    if max_edits == 0 || term.chars().count() < FUZZY_MIN_TERM_LEN {
        return false;
    }

    field
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| edit_distance(term, word) <= max_edits)
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
