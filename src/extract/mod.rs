//! Candidate Extraction
//!
//! Turns noise-filtered cover lines into ranked (title, author) guesses.
//! Three independent strategies each contribute at most one candidate;
//! duplicates are dropped by title and the best few survive to the catalog
//! search fallback.

pub mod names;
pub mod noise;
pub mod strategy;

pub use names::is_probable_author_name;
pub use noise::NoiseFilter;
pub use strategy::Strategy;

use tracing::debug;

use crate::config::ExtractConfig;
use crate::layout::LineElement;

/// A provisional (title, author) guess prior to catalog confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Guessed title text
    pub title: String,
    /// Guessed author, when one was found
    pub author: Option<String>,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Candidate extractor running the full strategy set
#[derive(Debug, Clone, Default)]
pub struct CandidateExtractor {
    config: ExtractConfig,
}

impl CandidateExtractor {
    /// Create an extractor with the given settings
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Extract ranked candidates from top-to-bottom ordered, filtered lines.
    ///
    /// Every strategy runs even if an earlier one produced nothing; a
    /// strategy that finds no candidate simply contributes none. Results
    /// are deduplicated by case-insensitive title (first occurrence wins),
    /// sorted by descending confidence, and capped.
    pub fn extract(&self, lines: &[LineElement]) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::new();

        for strategy in Strategy::ALL {
            let Some(candidate) = strategy.extract(lines, &self.config) else {
                continue;
            };
            let lowered = candidate.title.to_lowercase();
            let duplicate = candidates
                .iter()
                .any(|c| c.title.to_lowercase() == lowered);
            if !duplicate {
                candidates.push(candidate);
            }
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.config.max_candidates);

        debug!(count = candidates.len(), "extracted candidates");
        candidates
    }
}
