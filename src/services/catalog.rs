use crate::models::book::{Book, PickupSchedule};
use crate::models::responses::{PostResponse, Response, STATUS_CREATED, STATUS_OK};
use crate::models::storage::{CatalogRepository, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no pickup schedules stored for genre {genre:?} after save")]
    EmptySchedules { genre: String },
}

/// A failed operation: the failure envelope to hand back plus the cause.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct Failure<T> {
    pub envelope: T,
    pub source: ServiceError,
}

type Repository = Arc<dyn CatalogRepository + Send + Sync>;

pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Fetched books for `genre` followed by one book per recorded schedule.
    pub async fn get_books_by_genre(&self, genre: &str) -> Result<Response, Failure<Response>> {
        let (books, schedules) = match self.repository.get_by_genre(genre).await {
            Ok(found) => found,
            Err(e) => {
                error!("Failed to fetch books for genre {:?}: {}", genre, e);
                return Err(Failure {
                    envelope: Response::failure(format!("failed to fetch data books: {}", e)),
                    source: e.into(),
                });
            }
        };

        let mut data = books;
        data.extend(schedules.iter().map(Book::from));

        Ok(Response {
            status: STATUS_OK.to_string(),
            is_success: true,
            message: "fetch data books successfully!".to_string(),
            total_data: data.len(),
            data,
        })
    }

    /// Records `schedule` and reports the genre's first stored schedule along
    /// with the cumulative count.
    pub async fn submit_pickup_schedule(
        &self,
        schedule: PickupSchedule,
    ) -> Result<PostResponse, Failure<PostResponse>> {
        let genre = schedule.genre.clone();

        let schedules = self
            .repository
            .save_schedule(schedule)
            .await
            .map_err(ServiceError::from)
            .and_then(|schedules| {
                if schedules.is_empty() {
                    Err(ServiceError::EmptySchedules {
                        genre: genre.clone(),
                    })
                } else {
                    Ok(schedules)
                }
            });

        let mut schedules = match schedules {
            Ok(schedules) => schedules,
            Err(e) => {
                error!("Failed to save pickup schedule for genre {:?}: {}", genre, e);
                return Err(Failure {
                    envelope: PostResponse::failure(format!("failed to save new data books: {}", e)),
                    source: e,
                });
            }
        };

        let total_data = schedules.len();
        Ok(PostResponse {
            status: STATUS_CREATED.to_string(),
            is_success: true,
            message: "save new data books successfully!".to_string(),
            total_data,
            data: schedules.swap_remove(0),
        })
    }
}
