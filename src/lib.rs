//! bookscan - identify physical books from cover-photo OCR output
//!
//! Turns the noisy text fragments a recognition engine reads off a cover or
//! spine into a ranked list of catalog matches. The frame pipeline clusters
//! fragments into lines, resolves a printed ISBN when one is present, and
//! otherwise extracts title/author candidates and fuzzy-ranks catalog
//! search results against them.
//!
//! Camera capture, the recognition engine itself, persistence, and UI live
//! in the consuming application; this crate only needs [`TextObservation`]
//! values in and a [`CatalogService`] implementation out.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod isbn;
pub mod layout;
pub mod matching;
pub mod observation;
pub mod pipeline;

pub use catalog::{BookRecord, CatalogError, CatalogService, OpenLibraryClient, SearchResult};
pub use config::PipelineConfig;
pub use error::IdentifyError;
pub use extract::{Candidate, CandidateExtractor, NoiseFilter};
pub use isbn::{
    convert_isbn10_to_isbn13, is_valid_isbn10, is_valid_isbn13, parse_manual_entry, Isbn,
};
pub use layout::{cluster_lines, LineElement};
pub use matching::{rank_results, title_similarity};
pub use observation::{NormalizedRect, TextObservation};
pub use pipeline::{BookIdentifier, Identification, MatchSource, Stage};
