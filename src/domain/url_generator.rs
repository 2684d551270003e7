//! Cartesian URL generation over service areas and keywords.
//!
//! Generation is pure: the same pattern, keywords and areas always produce the
//! same candidates in the same order (outer loop over areas, inner loop over
//! keywords, both in input order).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::{GeneratedUrl, Keyword, PathPattern, ServiceArea};

/// How the stable fingerprint of a URL is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdScheme {
    /// `city-keyword`. Two areas with the same city in different states
    /// share ids.
    #[default]
    CityKeyword,
    /// `city-state-keyword`.
    CityStateKeyword,
}

/// Returned when an id scheme name is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown id scheme '{0}' (expected 'city-keyword' or 'city-state-keyword')")]
pub struct UnknownIdScheme(pub String);

impl FromStr for IdScheme {
    type Err = UnknownIdScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "city-keyword" => Ok(IdScheme::CityKeyword),
            "city-state-keyword" => Ok(IdScheme::CityStateKeyword),
            other => Err(UnknownIdScheme(other.to_string())),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::CityKeyword => f.write_str("city-keyword"),
            IdScheme::CityStateKeyword => f.write_str("city-state-keyword"),
        }
    }
}

/// Builds the fingerprint of an (area, keyword) pair.
pub fn fingerprint(area: &ServiceArea, keyword: &Keyword, scheme: IdScheme) -> String {
    match scheme {
        IdScheme::CityKeyword => format!("{}-{}", area.city_slug(), keyword.slug()),
        IdScheme::CityStateKeyword => format!(
            "{}-{}-{}",
            area.city_slug(),
            area.state_slug(),
            keyword.slug()
        ),
    }
}

/// Generates one candidate per (area, keyword) pair with the default id scheme.
///
/// Returns `areas.len() * keywords.len()` candidates, all `Generated`.
/// Empty `keywords` or `areas` yield an empty list.
pub fn generate(
    pattern: &PathPattern,
    keywords: &[Keyword],
    areas: &[ServiceArea],
) -> Vec<GeneratedUrl> {
    generate_with_scheme(pattern, keywords, areas, IdScheme::default())
}

/// Generates candidates using an explicit [`IdScheme`].
pub fn generate_with_scheme(
    pattern: &PathPattern,
    keywords: &[Keyword],
    areas: &[ServiceArea],
    scheme: IdScheme,
) -> Vec<GeneratedUrl> {
    let mut candidates = Vec::with_capacity(keywords.len() * areas.len());

    for area in areas {
        let city = area.city_slug();
        let state = area.state_slug();

        for keyword in keywords {
            let keyword_slug = keyword.slug();
            let path = pattern.render(&keyword_slug, &city, &state);
            candidates.push(GeneratedUrl::candidate(
                fingerprint(area, keyword, scheme),
                path,
            ));
        }
    }

    candidates
}

/// Returns ids that occur more than once, in first-repeat order.
pub fn colliding_ids(candidates: &[GeneratedUrl]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut collisions = Vec::new();

    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) && reported.insert(candidate.id.as_str()) {
            collisions.push(candidate.id.clone());
        }
    }

    collisions
}
