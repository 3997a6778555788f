//! Aggregations behind the session charts and the item filter.

use crate::api::ScrapedItem;
use crate::config::CHART_PALETTE;
use serde::Serialize;

/// Labels and counts for one chart, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub counts: Vec<u32>,
}

/// Export formats offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub const LENGTH_BUCKETS: [&str; 6] = [
    "Empty",
    "1-10 chars",
    "11-50 chars",
    "51-100 chars",
    "101-500 chars",
    "500+ chars",
];

/// Count items per element type, in order of first appearance.
pub fn element_type_counts(items: &[ScrapedItem]) -> ChartSeries {
    let mut series = ChartSeries::default();
    for item in items {
        let kind = item
            .element_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("unknown");
        match series.labels.iter().position(|l| l == kind) {
            Some(i) => series.counts[i] += 1,
            None => {
                series.labels.push(kind.to_string());
                series.counts.push(1);
            }
        }
    }
    series
}

fn length_bucket(len: usize) -> usize {
    match len {
        0 => 0,
        1..=10 => 1,
        11..=50 => 2,
        51..=100 => 3,
        101..=500 => 4,
        _ => 5,
    }
}

/// Histogram of content length (in characters) over fixed buckets.
pub fn content_length_histogram(items: &[ScrapedItem]) -> ChartSeries {
    let mut counts = vec![0u32; LENGTH_BUCKETS.len()];
    for item in items {
        let len = item.content.as_deref().map_or(0, |c| c.chars().count());
        counts[length_bucket(len)] += 1;
    }
    ChartSeries {
        labels: LENGTH_BUCKETS.iter().map(|s| s.to_string()).collect(),
        counts,
    }
}

/// One palette color per label, cycling when there are more labels than colors.
pub fn chart_colors(n: usize) -> Vec<&'static str> {
    CHART_PALETTE.iter().copied().cycle().take(n).collect()
}

/// Indices of items whose content contains `term`, case-insensitively.
/// An empty term matches everything.
pub fn filter_items(items: &[ScrapedItem], term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            needle.is_empty()
                || item
                    .content
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Status line under the filter box; `None` hides it.
pub fn filter_summary(term: &str, matches: usize) -> Option<String> {
    (!term.is_empty()).then(|| format!("Showing {} matching items", matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: Option<&str>, content: Option<&str>) -> ScrapedItem {
        ScrapedItem {
            element_type: kind.map(str::to_string),
            content: content.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn counts_types_in_first_seen_order() {
        let items = [
            item(Some("p"), None),
            item(Some("div"), None),
            item(None, None),
            item(Some("p"), None),
        ];
        let series = element_type_counts(&items);
        assert_eq!(series.labels, vec!["p", "div", "unknown"]);
        assert_eq!(series.counts, vec![2, 1, 1]);
    }

    #[test]
    fn buckets_content_lengths_at_boundaries() {
        let long = "x".repeat(501);
        let items = [
            item(None, None),
            item(None, Some("")),
            item(None, Some("0123456789")),
            item(None, Some("01234567890")),
            item(None, Some(&"y".repeat(100))),
            item(None, Some(&"z".repeat(500))),
            item(None, Some(&long)),
        ];
        let series = content_length_histogram(&items);
        assert_eq!(series.counts, vec![2, 1, 1, 1, 1, 1]);
        assert_eq!(series.labels[5], "500+ chars");
    }

    #[test]
    fn palette_repeats() {
        let colors = chart_colors(9);
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[7], colors[0]);
        assert_eq!(colors[8], colors[1]);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let items = [
            item(None, Some("Price: 10 EUR")),
            item(None, Some("About us")),
            item(None, None),
        ];
        assert_eq!(filter_items(&items, "price"), vec![0]);
        assert_eq!(filter_items(&items, ""), vec![0, 1, 2]);
        assert_eq!(filter_summary("price", 1).as_deref(), Some("Showing 1 matching items"));
        assert_eq!(filter_summary("", 3), None);
    }
}
