use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Coll;

use super::errors::is_duplicate_key_error;

/// Name of the counter that allocates question IDs.
pub const QUESTION_ID_COUNTER: &str = "question_id";

/// A counter object used to implement auto-increment IDs.
/// Counters are keyed by name, so each ID sequence is a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub name: String,
    pub next: u32,
}

impl Counter {
    /// Create a new `Counter` with the given name, starting at the given value.
    pub fn new(name: &str, start: u32) -> Self {
        Self {
            name: name.to_string(),
            next: start,
        }
    }

    /// Atomically retrieve the next value of the counter with the given name.
    pub async fn next(counters: &Coll<Counter>, name: &str) -> Result<u32> {
        let filter = doc! {
            "_id": name,
        };
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options: FindOneAndUpdateOptions = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(filter, update, options)
            .await?
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    format!("Failed to find counter '{name}'"),
                )
            })?;
        Ok(counter.next)
    }
}

/// Ensure the question ID counter exists, starting at 1.
///
/// This operation is idempotent: a counter that already exists (including one
/// inserted concurrently) is left untouched.
pub async fn ensure_question_id_counter_exists(
    counters: &Coll<Counter>,
) -> std::result::Result<(), DbError> {
    match counters
        .insert_one(Counter::new(QUESTION_ID_COUNTER, 1), None)
        .await
    {
        Ok(_) => {
            debug!("Created counter '{QUESTION_ID_COUNTER}'");
            Ok(())
        }
        Err(e) if is_duplicate_key_error(&e) => Ok(()),
        Err(e) => Err(e),
    }
}
