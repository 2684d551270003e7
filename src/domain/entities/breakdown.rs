//! Preview counters shown before generation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::service_area::{Keyword, ServiceArea};

/// Summary of what a generation run would produce.
///
/// `city_count` is the number of configured service areas; `state_count` is
/// the number of distinct states, compared case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlBreakdown {
    pub total_urls: usize,
    pub city_count: usize,
    pub state_count: usize,
    pub keyword_count: usize,
}

impl UrlBreakdown {
    pub fn compute(keywords: &[Keyword], areas: &[ServiceArea]) -> Self {
        let states: HashSet<String> = areas
            .iter()
            .map(|area| area.state.trim().to_lowercase())
            .collect();

        Self {
            total_urls: keywords.len() * areas.len(),
            city_count: areas.len(),
            state_count: states.len(),
            keyword_count: keywords.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_counts_distinct_states() {
        let keywords = vec![Keyword::from("dispensary"), Keyword::from("cbd")];
        let areas = vec![
            ServiceArea::new("Towson", "MD"),
            ServiceArea::new("Bel Air", "md"),
            ServiceArea::new("York", "PA"),
        ];

        let breakdown = UrlBreakdown::compute(&keywords, &areas);

        assert_eq!(breakdown.total_urls, 6);
        assert_eq!(breakdown.city_count, 3);
        assert_eq!(breakdown.state_count, 2);
        assert_eq!(breakdown.keyword_count, 2);
    }

    #[test]
    fn test_breakdown_empty_inputs() {
        let breakdown = UrlBreakdown::compute(&[], &[ServiceArea::new("Towson", "MD")]);
        assert_eq!(breakdown.total_urls, 0);
        assert_eq!(breakdown.city_count, 1);
        assert_eq!(breakdown.keyword_count, 0);
    }
}
