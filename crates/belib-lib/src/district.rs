//! Paris districts (arrondissements) as labelled in the station dataset.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::geo::GeoPoint;

/// Minimum Jaro-Winkler similarity for a label to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Maximum number of suggestions returned.
const MAX_SUGGESTIONS: usize = 3;

/// Approximate centre of every district label used by the dataset. The first
/// four arrondissements are grouped under `Paris centre`.
const CENTERS: &[(&str, f64, f64)] = &[
    ("05e Arrondissement", 48.8443, 2.3499),
    ("06e Arrondissement", 48.8505, 2.3327),
    ("07e Arrondissement", 48.8561, 2.3127),
    ("08e Arrondissement", 48.8722, 2.3163),
    ("09e Arrondissement", 48.8765, 2.3386),
    ("10e Arrondissement", 48.8745, 2.3596),
    ("11e Arrondissement", 48.8579, 2.3799),
    ("12e Arrondissement", 48.8359, 2.4143),
    ("13e Arrondissement", 48.8292, 2.3553),
    ("14e Arrondissement", 48.8317, 2.3237),
    ("15e Arrondissement", 48.8390, 2.2923),
    ("16e Arrondissement", 48.8642, 2.2707),
    ("17e Arrondissement", 48.8855, 2.3168),
    ("18e Arrondissement", 48.8925, 2.3442),
    ("19e Arrondissement", 48.8842, 2.3824),
    ("20e Arrondissement", 48.8647, 2.3984),
    ("Paris centre", 48.8606, 2.3425),
];

static CENTER_BY_LABEL: Lazy<HashMap<String, GeoPoint>> = Lazy::new(|| {
    CENTERS
        .iter()
        .map(|(label, latitude, longitude)| {
            (
                label.to_lowercase(),
                GeoPoint::known(*latitude, *longitude),
            )
        })
        .collect()
});

/// Centre of a district label (case-insensitive), if it is a known Paris district.
pub fn center(label: &str) -> Option<GeoPoint> {
    CENTER_BY_LABEL.get(&label.trim().to_lowercase()).copied()
}

/// Every district label with a known centre.
pub fn known_labels() -> impl Iterator<Item = &'static str> {
    CENTERS.iter().map(|(label, _, _)| *label)
}

/// Rank `candidates` by similarity to `label`, best first.
pub fn suggest<'a, I>(label: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = label.trim().to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            (
                strsim::jaro_winkler(&wanted, &candidate.to_lowercase()),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
