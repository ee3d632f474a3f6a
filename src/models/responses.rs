use crate::models::book::{Book, PickupSchedule};
use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "200 OK";
pub const STATUS_CREATED: &str = "201 CREATED";
pub const STATUS_INTERNAL_ERROR: &str = "500 Internal Server Error";

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

/// Envelope for `GET /books/:genre`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub is_success: bool,
    pub message: String,
    pub total_data: usize,
    pub data: Vec<Book>,
}

/// Envelope for `POST /books/schedule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub status: String,
    pub is_success: bool,
    pub message: String,
    pub total_data: usize,
    pub data: PickupSchedule,
}

impl Response {
    pub fn failure(message: String) -> Self {
        Self {
            status: STATUS_INTERNAL_ERROR.to_string(),
            is_success: false,
            message,
            total_data: 0,
            data: Vec::new(),
        }
    }
}

impl PostResponse {
    pub fn failure(message: String) -> Self {
        Self {
            status: STATUS_INTERNAL_ERROR.to_string(),
            is_success: false,
            message,
            total_data: 0,
            data: PickupSchedule::default(),
        }
    }
}
