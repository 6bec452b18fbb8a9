//! Pipeline Orchestration
//!
//! Sequences a frame through clustering, ISBN resolution, candidate
//! extraction, and catalog queries. An ISBN, when present, is unambiguous
//! and short-circuits the heuristic title/author path; candidate searches
//! run one at a time in confidence order so the first usable result set
//! stops further network use.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogService, SearchResult};
use crate::config::PipelineConfig;
use crate::error::IdentifyError;
use crate::extract::{Candidate, CandidateExtractor, NoiseFilter};
use crate::isbn::{self, Isbn};
use crate::layout::cluster_lines;
use crate::matching::rank_results;
use crate::observation::{filter_region_of_interest, TextObservation};

/// Where the pipeline currently is; logged on every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ExtractingText,
    ResolvingIsbn,
    IsbnLookupSucceeded,
    FallingBackToCandidates,
    SearchingCatalog,
    ResultsFound,
    NoResultsFailure,
}

/// How the winning result set was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum MatchSource {
    /// A validated ISBN resolved directly against the catalog
    IsbnLookup(Isbn),
    /// A title/author candidate whose search returned results
    CandidateSearch(Candidate),
}

/// A successful identification
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    /// Result set, best match first
    pub results: Vec<SearchResult>,
    /// Provenance of the match
    pub source: MatchSource,
}

/// Book identification pipeline.
///
/// Invoked at most once per captured frame; a frame arriving while a
/// previous one is still being processed is rejected with
/// [`IdentifyError::PipelineBusy`] rather than queued.
pub struct BookIdentifier {
    config: PipelineConfig,
    filter: NoiseFilter,
    extractor: CandidateExtractor,
    catalog: Arc<dyn CatalogService>,
    in_flight: tokio::sync::Mutex<()>,
}

impl BookIdentifier {
    /// Create a pipeline with default settings
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self::with_config(catalog, PipelineConfig::default())
    }

    /// Create a pipeline with custom settings
    pub fn with_config(catalog: Arc<dyn CatalogService>, config: PipelineConfig) -> Self {
        Self {
            filter: NoiseFilter::new(&config.filter),
            extractor: CandidateExtractor::new(config.extract.clone()),
            config,
            catalog,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    fn advance(&self, stage: Stage) {
        debug!(stage = ?stage, "pipeline stage");
    }

    /// Identify the book on a captured frame.
    ///
    /// ISBN-priority policy: the raw clustered text is scanned for a
    /// checksum-valid ISBN before any heuristic extraction. A failed ISBN
    /// lookup falls back to candidate search and is never surfaced as a
    /// terminal error on its own.
    pub async fn identify_frame(
        &self,
        observations: &[TextObservation],
    ) -> Result<Identification, IdentifyError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| IdentifyError::PipelineBusy)?;
        let started = Instant::now();

        self.advance(Stage::ExtractingText);
        let in_roi = filter_region_of_interest(observations, &self.config.roi);
        if in_roi.is_empty() {
            self.advance(Stage::NoResultsFailure);
            return Err(IdentifyError::NoTextDetected);
        }

        let lines = cluster_lines(&in_roi, self.config.layout.vertical_tolerance);

        self.advance(Stage::ResolvingIsbn);
        let joined: String = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(found) = isbn::resolve_from_frame_text(&joined) {
            self.advance(Stage::SearchingCatalog);
            match self.catalog.lookup_by_isbn(found.normalized()).await {
                Ok(Some(record)) => {
                    self.advance(Stage::IsbnLookupSucceeded);
                    let mut result = SearchResult::from(record);
                    result.match_score = 1.0;
                    info!(
                        isbn = %found,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "identified via ISBN lookup"
                    );
                    self.advance(Stage::ResultsFound);
                    return Ok(Identification {
                        results: vec![result],
                        source: MatchSource::IsbnLookup(found),
                    });
                }
                Ok(None) => {
                    debug!(isbn = %found, "ISBN not in catalog, falling back to candidates");
                }
                Err(e) => {
                    warn!(isbn = %found, error = %e, "ISBN lookup failed, falling back to candidates");
                }
            }
        }

        self.advance(Stage::FallingBackToCandidates);
        let kept: Vec<_> = lines
            .into_iter()
            .filter(|l| !self.filter.is_noise(&l.text))
            .collect();
        let candidates = self.extractor.extract(&kept);
        if candidates.is_empty() {
            self.advance(Stage::NoResultsFailure);
            return Err(IdentifyError::NoTitleIdentified);
        }

        self.advance(Stage::SearchingCatalog);
        for candidate in candidates {
            let search = self
                .catalog
                .search_by_title_author(&candidate.title, candidate.author.as_deref())
                .await;
            match search {
                Ok(records) if !records.is_empty() => {
                    let mut results: Vec<SearchResult> =
                        records.into_iter().map(SearchResult::from).collect();
                    rank_results(&candidate.title, candidate.author.as_deref(), &mut results);
                    info!(
                        title = %candidate.title,
                        results = results.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "identified via candidate search"
                    );
                    self.advance(Stage::ResultsFound);
                    return Ok(Identification {
                        results,
                        source: MatchSource::CandidateSearch(candidate),
                    });
                }
                Ok(_) => {
                    debug!(title = %candidate.title, "candidate search returned nothing");
                }
                Err(e) => {
                    warn!(title = %candidate.title, error = %e, "candidate search failed, trying next");
                }
            }
        }

        self.advance(Stage::NoResultsFailure);
        Err(IdentifyError::NoMatchFound)
    }

    /// Resolve a manually entered ISBN string against the catalog.
    ///
    /// Independent of the frame pipeline and its single-flight guard. With
    /// `require_isbn_prefix` set, the text must carry an explicit "ISBN"
    /// marker and a Bookland prefix.
    pub async fn identify_manual_entry(
        &self,
        text: &str,
        require_isbn_prefix: bool,
    ) -> Result<Identification, IdentifyError> {
        let found = isbn::parse_manual_entry(text, require_isbn_prefix)?;

        match self.catalog.lookup_by_isbn(found.normalized()).await? {
            Some(record) => {
                let mut result = SearchResult::from(record);
                result.match_score = 1.0;
                Ok(Identification {
                    results: vec![result],
                    source: MatchSource::IsbnLookup(found),
                })
            }
            None => Err(IdentifyError::NoMatchFound),
        }
    }
}
