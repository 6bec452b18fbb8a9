//! Match Ranking
//!
//! Scores catalog search hits against the original query using normalized
//! Levenshtein similarity and reorders them best-first. Catalog relevance
//! ordering is unreliable for short OCR-derived queries, so the ranker
//! re-scores every hit locally.

use strsim::normalized_levenshtein;
use tracing::debug;

use crate::catalog::SearchResult;

const TITLE_WEIGHT: f64 = 0.6;
const AUTHOR_WEIGHT: f64 = 0.4;
// Flat author contribution when the query had no author to compare
const NO_AUTHOR_SCORE: f64 = 0.2;

/// Case-insensitive normalized Levenshtein similarity.
///
/// Computed over Unicode scalars; 1.0 for identical strings (including two
/// empty ones), 0.0 for entirely dissimilar ones.
pub fn title_similarity(a: &str, b: &str) -> f32 {
    let score = normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase());
    score.max(0.0) as f32
}

/// Assign `match_score` to every result and sort best-first.
///
/// Score is a weighted blend of title and author similarity against the
/// query. Ties keep the catalog's original order.
pub fn rank_results(query_title: &str, query_author: Option<&str>, results: &mut [SearchResult]) {
    for result in results.iter_mut() {
        let title_score = TITLE_WEIGHT * title_similarity(query_title, &result.title) as f64;
        let author_score = match query_author {
            Some(author) => AUTHOR_WEIGHT * title_similarity(author, &result.author) as f64,
            None => NO_AUTHOR_SCORE,
        };
        result.match_score = (title_score + author_score) as f32;
    }

    results.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(results = results.len(), "ranked catalog results");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, author: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            author: author.to_string(),
            isbn: None,
            cover_url: None,
            publish_year: None,
            match_score: 0.0,
        }
    }

    #[test]
    fn test_similarity_identity() {
        assert!((title_similarity("Dune", "Dune") - 1.0).abs() < 0.001);
        assert!((title_similarity("", "") - 1.0).abs() < 0.001);
        assert!((title_similarity("DUNE", "dune") - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_similarity_symmetric() {
        let ab = title_similarity("hobbit", "rabbit");
        let ba = title_similarity("rabbit", "hobbit");
        assert!((ab - ba).abs() < 0.001);
    }

    #[test]
    fn test_similarity_known_distance() {
        // one substitution over five characters
        assert!((title_similarity("hello", "hallo") - 0.8).abs() < 0.001);
        assert!(title_similarity("abc", "xyz") < 0.001);
    }

    #[test]
    fn test_exact_match_outranks_sequel() {
        let mut results = vec![
            result("Dune Messiah", "Frank Herbert"),
            result("Dune", "Frank Herbert"),
        ];

        rank_results("Dune", Some("Frank Herbert"), &mut results);
        assert_eq!(results[0].title, "Dune");
        assert!(results[0].match_score > results[1].match_score);
        assert!((results[0].match_score - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_missing_query_author_uses_flat_score() {
        let mut results = vec![result("Dune", "Frank Herbert")];
        rank_results("Dune", None, &mut results);
        assert!((results[0].match_score - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_ties_preserve_catalog_order() {
        let mut results = vec![
            result("Same Title", "Same Author"),
            result("Same Title", "Same Author"),
        ];
        results[0].publish_year = Some("1990".to_string());
        results[1].publish_year = Some("2005".to_string());

        rank_results("Same Title", Some("Same Author"), &mut results);
        assert_eq!(results[0].publish_year.as_deref(), Some("1990"));
    }
}
