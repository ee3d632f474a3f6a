use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub title: String,
    #[serde(rename = "author")]
    pub authors: Vec<String>,
    #[serde(rename = "edition_number")]
    pub edition_count: i64,
}

/// A request to pick up a book, recorded under its genre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupSchedule {
    #[serde(rename = "book_info")]
    pub book: Book,
    #[serde(rename = "pick_up_date")]
    pub pickup_date: String,
    pub genre: String,
}

impl From<&PickupSchedule> for Book {
    fn from(schedule: &PickupSchedule) -> Self {
        Book {
            title: schedule.book.title.clone(),
            authors: schedule.book.authors.clone(),
            edition_count: schedule.book.edition_count,
        }
    }
}
