//! Catalog boundary
//!
//! The lookup/search contract the pipeline depends on. Implementations are
//! remote services: fallible, possibly empty, possibly slow. The pipeline
//! never hands an unvalidated ISBN or unfiltered noise text across this
//! boundary.

pub mod openlibrary;

pub use openlibrary::OpenLibraryClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure from the catalog collaborator
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport or HTTP failure
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// The service answered with data we could not decode
    #[error("catalog returned malformed data: {0}")]
    Malformed(String),
}

/// A catalog record for a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Title as cataloged
    pub title: String,
    /// Primary author as cataloged
    pub author: String,
    /// An ISBN for this edition, when the catalog has one
    pub isbn: Option<String>,
    /// Cover image URL
    pub cover_url: Option<String>,
    /// First publication year
    pub publish_year: Option<String>,
    /// Page count
    pub page_count: Option<u32>,
}

/// A catalog hit scored against the original query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title as cataloged
    pub title: String,
    /// Primary author as cataloged
    pub author: String,
    /// An ISBN for this edition, when known
    pub isbn: Option<String>,
    /// Cover image URL
    pub cover_url: Option<String>,
    /// First publication year
    pub publish_year: Option<String>,
    /// Similarity against the query (0.0 - 1.0); 1.0 for ISBN lookups
    pub match_score: f32,
}

impl From<BookRecord> for SearchResult {
    fn from(record: BookRecord) -> Self {
        Self {
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            cover_url: record.cover_url,
            publish_year: record.publish_year,
            match_score: 0.0,
        }
    }
}

/// Remote book catalog
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Look up the single record for a validated ISBN; `None` when the
    /// catalog has no such edition
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, CatalogError>;

    /// Search by title and optional author; may legitimately return an
    /// empty list
    async fn search_by_title_author(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> Result<Vec<BookRecord>, CatalogError>;
}
