use crate::models::book::{Book, PickupSchedule};
use crate::services::provider::CatalogProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to fetch data from API: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API request failed with status code: {0}")]
    UpstreamStatus(u16),
    #[error("failed to read API response: {0}")]
    Body(reqwest::Error),
    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait CatalogRepository {
    async fn get_by_genre(
        &self,
        genre: &str,
    ) -> Result<(Vec<Book>, Vec<PickupSchedule>), StoreError>; // (fetched books, recorded schedules)
    async fn save_schedule(
        &self,
        schedule: PickupSchedule,
    ) -> Result<Vec<PickupSchedule>, StoreError>;
}

type Provider = Arc<dyn CatalogProvider + Send + Sync>;

#[derive(Debug, Default)]
struct GenreRecord {
    catalog: Vec<Book>,
    schedules: Vec<PickupSchedule>,
}

/// In-memory store of per-genre catalogs and pickup schedules.
///
/// The catalog of a genre is replaced on every successful fetch and is never
/// served back to readers; schedules are append-only.
pub struct CatalogStore {
    provider: Provider,
    records: RwLock<HashMap<String, GenreRecord>>,
}

impl CatalogStore {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Catalog stored by the last successful fetch for `genre`.
    pub fn cached_catalog(&self, genre: &str) -> Option<Vec<Book>> {
        self.read_records()
            .get(genre)
            .map(|record| record.catalog.clone())
    }

    // A panic while holding the lock cannot leave a record half-written,
    // so a poisoned map is still consistent.
    fn read_records(&self) -> RwLockReadGuard<'_, HashMap<String, GenreRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_records(&self) -> RwLockWriteGuard<'_, HashMap<String, GenreRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn get_by_genre(
        &self,
        genre: &str,
    ) -> Result<(Vec<Book>, Vec<PickupSchedule>), StoreError> {
        let schedules = self
            .read_records()
            .get(genre)
            .map(|record| record.schedules.clone())
            .unwrap_or_default();

        info!("Fetching catalog for genre {:?}", genre);
        let books = match self.provider.fetch_genre(genre).await {
            Ok(books) => books,
            Err(e) => {
                warn!("Catalog fetch for genre {:?} failed: {}", genre, e);
                return Err(e);
            }
        };

        self.write_records()
            .entry(genre.to_string())
            .or_default()
            .catalog = books.clone();

        debug!(
            "Genre {:?}: {} books fetched, {} schedules recorded",
            genre,
            books.len(),
            schedules.len()
        );
        Ok((books, schedules))
    }

    async fn save_schedule(
        &self,
        schedule: PickupSchedule,
    ) -> Result<Vec<PickupSchedule>, StoreError> {
        let mut records = self.write_records();
        let record = records.entry(schedule.genre.clone()).or_default();
        record.schedules.push(schedule);

        info!(
            "Recorded pickup schedule, genre now has {} schedules",
            record.schedules.len()
        );
        Ok(record.schedules.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        books: Vec<Book>,
        status: Option<u16>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn serving(books: Vec<Book>) -> Arc<Self> {
            Arc::new(Self {
                books,
                status: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                books: Vec::new(),
                status: Some(status),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CatalogProvider for FakeProvider {
        async fn fetch_genre(&self, _genre: &str) -> Result<Vec<Book>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(StoreError::UpstreamStatus(status)),
                None => Ok(self.books.clone()),
            }
        }
    }

    fn book(title: &str) -> Book {
        Book {
            title: title.to_string(),
            authors: vec!["authors".to_string()],
            edition_count: 1,
        }
    }

    fn schedule(genre: &str, title: &str) -> PickupSchedule {
        PickupSchedule {
            book: book(title),
            pickup_date: "2024-03-01".to_string(),
            genre: genre.to_string(),
        }
    }

    #[tokio::test]
    async fn read_without_schedules_returns_fetched_books() {
        let store = CatalogStore::new(FakeProvider::serving(vec![book("MockBook")]));

        let (books, schedules) = store.get_by_genre("fiction").await.unwrap();

        assert_eq!(books, vec![book("MockBook")]);
        assert!(schedules.is_empty());
    }

    #[tokio::test]
    async fn read_returns_recorded_schedules_and_always_fetches() {
        let provider = FakeProvider::serving(vec![book("MockBook")]);
        let store = CatalogStore::new(provider.clone());
        store.save_schedule(schedule("fiction", "Book Cache")).await.unwrap();

        let (books, schedules) = store.get_by_genre("fiction").await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(schedules, vec![schedule("fiction", "Book Cache")]);

        store.get_by_genre("fiction").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_schedules_untouched() {
        let store = CatalogStore::new(FakeProvider::failing(404));
        store.save_schedule(schedule("fiction", "Kept")).await.unwrap();

        let err = store.get_by_genre("fiction").await.unwrap_err();
        assert_eq!(err.to_string(), "API request failed with status code: 404");

        let schedules = store.save_schedule(schedule("fiction", "Next")).await.unwrap();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].book.title, "Kept");
    }

    #[tokio::test]
    async fn save_appends_in_order_per_genre() {
        let store = CatalogStore::new(FakeProvider::serving(Vec::new()));

        store.save_schedule(schedule("fiction", "S1")).await.unwrap();
        store.save_schedule(schedule("poetry", "Other")).await.unwrap();
        let schedules = store.save_schedule(schedule("fiction", "S2")).await.unwrap();

        let titles: Vec<_> = schedules.iter().map(|s| s.book.title.as_str()).collect();
        assert_eq!(titles, vec!["S1", "S2"]);
    }

    #[tokio::test]
    async fn genre_keys_are_case_sensitive() {
        let store = CatalogStore::new(FakeProvider::serving(Vec::new()));
        store.save_schedule(schedule("Fiction", "Upper")).await.unwrap();

        let (_, schedules) = store.get_by_genre("fiction").await.unwrap();
        assert!(schedules.is_empty());
    }

    #[tokio::test]
    async fn catalog_is_replaced_by_fetch_and_kept_by_save() {
        let store = CatalogStore::new(FakeProvider::serving(vec![book("A"), book("B")]));
        assert_eq!(store.cached_catalog("fiction"), None);

        store.save_schedule(schedule("fiction", "S1")).await.unwrap();
        assert_eq!(store.cached_catalog("fiction"), Some(Vec::new()));

        store.get_by_genre("fiction").await.unwrap();
        store.save_schedule(schedule("fiction", "S2")).await.unwrap();
        assert_eq!(
            store.cached_catalog("fiction"),
            Some(vec![book("A"), book("B")])
        );
    }

    #[tokio::test]
    async fn concurrent_saves_are_all_recorded() {
        let store = Arc::new(CatalogStore::new(FakeProvider::serving(Vec::new())));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let saved = store
                        .save_schedule(schedule("fiction", &format!("Book {}", i)))
                        .await;
                    saved.map(|schedules| schedules.len())
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let (_, schedules) = store.get_by_genre("fiction").await.unwrap();
        assert_eq!(schedules.len(), 32);
    }
}
