use crate::models::book::Book;
use crate::models::storage::StoreError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Source of the live catalog for a genre.
#[async_trait]
pub trait CatalogProvider {
    async fn fetch_genre(&self, genre: &str) -> Result<Vec<Book>, StoreError>;
}

/// Client for the Open Library subjects API.
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn subject_url(&self, genre: &str) -> String {
        format!(
            "{}/subjects/{}.json",
            self.base_url,
            urlencoding::encode(genre)
        )
    }
}

#[async_trait]
impl CatalogProvider for OpenLibraryClient {
    async fn fetch_genre(&self, genre: &str) -> Result<Vec<Book>, StoreError> {
        let url = self.subject_url(genre);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(StoreError::UpstreamStatus(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(StoreError::Body)?;
        parse_works(&body)
    }
}

/// Parses a subjects payload into books.
///
/// The outer document must be a JSON object. Entries of `works` that are not
/// objects are skipped, and missing fields default to empty or zero.
pub fn parse_works(body: &[u8]) -> Result<Vec<Book>, StoreError> {
    let payload: Map<String, Value> = serde_json::from_slice(body)?;

    let books: Vec<Book> = payload
        .get("works")
        .and_then(Value::as_array)
        .map(|works| {
            works
                .iter()
                .filter_map(Value::as_object)
                .map(book_from_work)
                .collect()
        })
        .unwrap_or_default();

    Ok(books)
}

fn book_from_work(work: &Map<String, Value>) -> Book {
    let title = work
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let authors = work
        .get("authors")
        .and_then(Value::as_array)
        .map(|authors| {
            authors
                .iter()
                .filter_map(|author| author.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let edition_count = work
        .get("edition_count")
        .and_then(|count| count.as_i64().or_else(|| count.as_f64().map(|f| f as i64)))
        .unwrap_or(0);

    Book {
        title,
        authors,
        edition_count,
    }
}
