//! Summary statistics over the item collection.

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lower bounds of the half-open price buckets; the last bound opens the overflow bucket.
pub const PRICE_BOUNDARIES: [f64; 6] = [0.0, 10.0, 50.0, 100.0, 500.0, 1000.0];

/// Bucket labels, one per boundary interval plus the overflow bucket.
pub const PRICE_BUCKET_LABELS: [&str; 6] = ["0-10", "10-50", "50-100", "100-500", "500-1000", "1000+"];

/// Category reported for items with an empty category.
///
/// Items explicitly filed under this name are counted in the same entry.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Aggregated view of the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub summary: Summary,
    pub category_distribution: Vec<CategoryCount>,
    pub price_ranges: Vec<PriceRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_items: usize,
    pub total_value: f64,
    pub average_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub bucket_label: String,
    pub count: usize,
    /// Names of the items in this bucket.
    pub items: Vec<String>,
}

/// Aggregate items in a single pass. Bucket item names keep the input order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze(items: &[Item]) -> Analytics {
    let mut total_value = 0.0;
    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    let mut ranges: Vec<PriceRange> = PRICE_BUCKET_LABELS
        .iter()
        .map(|label| PriceRange {
            bucket_label: (*label).to_string(),
            count: 0,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        total_value += item.price;

        let category = if item.category.is_empty() {
            UNCATEGORIZED
        } else {
            item.category.as_str()
        };
        *categories.entry(category).or_default() += 1;

        let bucket = &mut ranges[bucket_index(item.price)];
        bucket.count += 1;
        bucket.items.push(item.name.clone());
    }

    let average_price = if items.is_empty() {
        0.0
    } else {
        total_value / items.len() as f64
    };

    let mut category_distribution: Vec<CategoryCount> = categories
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps ties alphabetical.
    category_distribution.sort_by(|a, b| b.count.cmp(&a.count));

    Analytics {
        summary: Summary {
            total_items: items.len(),
            total_value: round_cents(total_value),
            average_price: round_cents(average_price),
        },
        category_distribution,
        price_ranges: ranges,
    }
}

/// Index of the bucket a price falls into; anything outside `[0, 1000)` overflows.
fn bucket_index(price: f64) -> usize {
    PRICE_BOUNDARIES
        .windows(2)
        .position(|bounds| bounds[0] <= price && price < bounds[1])
        .unwrap_or(PRICE_BUCKET_LABELS.len() - 1)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
