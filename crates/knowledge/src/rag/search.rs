//! Lexical retrieval over an index snapshot.
//!
//! Each chunk is scored by literal substring matching against the
//! lower-cased query:
//! - a bonus when the chunk contains the whole query,
//! - a weight per occurrence of each query token (overlapping matches count),
//! - a bonus per domain term present in both the query and the chunk.
//!
//! Chunks scoring zero are dropped. There is no IDF and no length
//! normalization.

use crate::config::ScoringWeights;
use crate::index::Index;
use crate::types::SearchResult;

/// A query normalized once for scoring many chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    phrase: String,
    tokens: Vec<String>,
    domain_terms: Vec<String>,
}

impl PreparedQuery {
    pub fn new(query: &str, weights: &ScoringWeights) -> Self {
        let phrase = query.trim().to_lowercase();

        let mut tokens: Vec<String> = Vec::new();
        for word in phrase.split_whitespace() {
            if word.chars().count() >= weights.min_token_len && !tokens.iter().any(|t| t == word) {
                tokens.push(word.to_string());
            }
        }

        let domain_terms = weights
            .domain_terms
            .iter()
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty() && phrase.contains(t.as_str()))
            .collect();

        Self {
            phrase,
            tokens,
            domain_terms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Score lower-cased chunk content.
    pub fn score(&self, content: &str, weights: &ScoringWeights) -> u32 {
        if self.is_empty() {
            return 0;
        }

        let mut score = 0u32;

        if content.contains(self.phrase.as_str()) {
            score = score.saturating_add(weights.exact_phrase_bonus);
        }

        for token in &self.tokens {
            let hits = count_overlapping(content, token) as u32;
            score = score.saturating_add(hits.saturating_mul(weights.token_occurrence_weight));
        }

        for term in &self.domain_terms {
            if content.contains(term.as_str()) {
                score = score.saturating_add(weights.domain_term_bonus);
            }
        }

        score
    }
}

/// Occurrences of `needle` in `haystack`, counting overlapping matches.
pub fn count_overlapping(haystack: &str, needle: &str) -> usize {
    let Some(first) = needle.chars().next() else {
        return 0;
    };

    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        count += 1;
        from += pos + first.len_utf8();
    }
    count
}

/// Rank `index` against `query`.
///
/// Returns at most `top_k` results with score > 0, by descending score;
/// equal scores keep index order.
pub fn search(index: &Index, query: &str, weights: &ScoringWeights, top_k: usize) -> Vec<SearchResult> {
    let prepared = PreparedQuery::new(query, weights);
    if prepared.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = index
        .entries()
        .filter_map(|(chunk, lowered)| {
            let score = prepared.score(lowered, weights);
            (score > 0).then(|| SearchResult {
                chunk: chunk.clone(),
                score,
            })
        })
        .collect();

    // Stable: ties keep index order.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(top_k);

    tracing::debug!(
        "Retrieved {} chunks for {} tokens (generation {}, requested top-{})",
        results.len(),
        prepared.tokens.len(),
        index.generation(),
        top_k
    );

    results
}
