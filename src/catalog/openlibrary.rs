//! Open Library client
//!
//! Catalog implementation backed by the public Open Library search API.
//! Both operations go through `search.json`, which returns author names
//! inline (the edition endpoints only return author keys and would need a
//! second round trip).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{BookRecord, CatalogError, CatalogService};

const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
const COVER_URL_BASE: &str = "https://covers.openlibrary.org/b/id";
const MAX_RESULTS: usize = 10;

/// Open Library catalog client
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    cover_i: Option<u64>,
    first_publish_year: Option<i64>,
    number_of_pages_median: Option<u32>,
}

impl SearchDoc {
    fn into_record(self) -> Option<BookRecord> {
        let title = self.title?;
        Some(BookRecord {
            title,
            author: self.author_name.into_iter().next().unwrap_or_default(),
            isbn: self.isbn.into_iter().next(),
            cover_url: self
                .cover_i
                .map(|id| format!("{COVER_URL_BASE}/{id}-M.jpg")),
            publish_year: self.first_publish_year.map(|y| y.to_string()),
            page_count: self.number_of_pages_median,
        })
    }
}

impl OpenLibraryClient {
    /// Create a client against the public Open Library service
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (test servers, mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, query: &[(&str, &str)]) -> Result<Vec<BookRecord>, CatalogError> {
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[(
                "fields",
                "title,author_name,isbn,cover_i,first_publish_year,number_of_pages_median",
            )])
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "catalog request failed");
            return Err(CatalogError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let records: Vec<BookRecord> = parsed
            .docs
            .into_iter()
            .filter_map(SearchDoc::into_record)
            .take(MAX_RESULTS)
            .collect();

        debug!(count = records.len(), "catalog returned records");
        Ok(records)
    }
}

impl Default for OpenLibraryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogService for OpenLibraryClient {
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, CatalogError> {
        let records = self.fetch(&[("isbn", isbn)]).await?;
        Ok(records.into_iter().next())
    }

    async fn search_by_title_author(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> Result<Vec<BookRecord>, CatalogError> {
        let mut query = vec![("title", title)];
        if let Some(author) = author {
            query.push(("author", author));
        }
        self.fetch(&query).await
    }
}
