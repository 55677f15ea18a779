//! Turns nearest-neighbour rows into the list shown to the user.

use ahash::AHashSet;
use careerfit_core::Neighbor;
use careerfit_corpus::Corpus;
use serde::Serialize;

/// A career label together with the corpus row it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub label: String,
    pub row: usize,
    pub distance: f32,
}

/// True for labels that carry no career: blank, or equal to `sentinel`
/// ignoring case and surrounding whitespace.
#[must_use]
pub fn is_placeholder(label: &str, sentinel: &str) -> bool {
    let label = label.trim();
    label.is_empty() || label.eq_ignore_ascii_case(sentinel.trim())
}

/// Map neighbours to labels, dropping placeholders and repeats.
///
/// Input order (closest first) is preserved and the first occurrence of each
/// label wins. Rows outside the corpus are skipped.
pub fn assemble_scored(neighbors: &[Neighbor], corpus: &Corpus, sentinel: &str) -> Vec<Recommendation> {
    let mut seen = AHashSet::with_capacity(neighbors.len());
    neighbors
        .iter()
        .filter_map(|n| corpus.label(n.row).map(|label| (n, label)))
        .filter(|(_, label)| !is_placeholder(label, sentinel))
        .filter(|(_, label)| seen.insert(*label))
        .map(|(n, label)| Recommendation {
            label: label.to_string(),
            row: n.row,
            distance: n.distance,
        })
        .collect()
}

/// Labels only; see [`assemble_scored`]
pub fn assemble(neighbors: &[Neighbor], corpus: &Corpus, sentinel: &str) -> Vec<String> {
    assemble_scored(neighbors, corpus, sentinel)
        .into_iter()
        .map(|r| r.label)
        .collect()
}
