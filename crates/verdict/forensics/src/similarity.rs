//! Word-shingle text similarity.

use std::collections::HashSet;

/// Shingle width used by [`similarity`].
pub const SHINGLE_WIDTH: usize = 3;

/// Lowercased alphanumeric words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Contiguous `width`-word windows. Texts shorter than `width` yield their
/// single shortened window.
pub fn shingles(text: &str, width: usize) -> HashSet<String> {
    let words = words(text);
    if words.is_empty() {
        return HashSet::new();
    }
    let width = width.clamp(1, words.len());
    words.windows(width).map(|w| w.join(" ")).collect()
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        // Two empty texts are indistinguishable.
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard similarity of the texts' word shingles, in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&shingles(a, SHINGLE_WIDTH), &shingles(b, SHINGLE_WIDTH))
}

/// Every pair `(i, j, similarity)` with `i < j`.
pub fn pairwise(texts: &[&str]) -> Vec<(usize, usize, f64)> {
    let sets: Vec<_> = texts.iter().map(|t| shingles(t, SHINGLE_WIDTH)).collect();
    let mut pairs = Vec::new();
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            pairs.push((i, j, jaccard(&sets[i], &sets[j])));
        }
    }
    pairs
}

/// The most similar pair, if there are at least two texts.
pub fn most_similar_pair(texts: &[&str]) -> Option<(usize, usize, f64)> {
    pairwise(texts)
        .into_iter()
        .max_by(|a, b| a.2.total_cmp(&b.2))
}
