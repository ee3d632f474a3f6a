use crate::models::book::PickupSchedule;
use crate::models::responses::{PostResponse, Response};
use crate::services::catalog::CatalogService;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, warn};

pub type SharedService = Arc<CatalogService>;

pub async fn get_books_by_genre(
    Path(genre): Path<String>,
    State(service): State<SharedService>,
) -> Result<Json<Response>, (StatusCode, String)> {
    read_genre(&service, &genre).await
}

// `/books/schedule` is a static route, so the genre cannot come from `Path`.
pub async fn get_schedule_genre(
    State(service): State<SharedService>,
) -> Result<Json<Response>, (StatusCode, String)> {
    read_genre(&service, "schedule").await
}

async fn read_genre(
    service: &CatalogService,
    genre: &str,
) -> Result<Json<Response>, (StatusCode, String)> {
    match service.get_books_by_genre(genre).await {
        Ok(response) => Ok(Json(response)),
        Err(failure) => Err((StatusCode::INTERNAL_SERVER_ERROR, failure.to_string())),
    }
}

// Service failures still answer 200 with the failure envelope; only an
// undecodable body is rejected.
pub async fn submit_pickup_schedule(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Json<PostResponse>, (StatusCode, String)> {
    let schedule: PickupSchedule = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected pickup schedule body: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    match service.submit_pickup_schedule(schedule).await {
        Ok(response) => Ok(Json(response)),
        Err(failure) => {
            error!("Pickup schedule not saved: {}", failure);
            Ok(Json(failure.envelope))
        }
    }
}
