//! Homework API: the polling source and the response shape it must have.
//!
//! A source returns the raw JSON body; [`validate`] turns it into a
//! [`ValidatedResponse`] or explains what is wrong with it.

pub mod client;

pub use client::PracticumClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{FetchError, ShapeError};

/// Something that can be asked for homework status changes since a cursor.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch status changes since `from_date` (Unix seconds).
    ///
    /// Returns the decoded JSON body of an HTTP 200 response. Does not retry.
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError>;
}

/// One reviewed-submission entry. Fields are kept optional here;
/// [`crate::verdict::translate`] decides whether they are usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub status: Option<String>,
    pub homework_name: Option<String>,
}

/// A response that passed structural validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedResponse {
    /// Records in the order the API returned them.
    pub homeworks: Vec<HomeworkRecord>,
    /// Server time of the response, used to advance the cursor.
    pub current_date: Option<i64>,
}

/// Check the structure of a poll response.
///
/// `homeworks` must be present and a list of objects. `current_date` may be
/// absent, but when present it must be an integer.
pub fn validate(response: &Value) -> Result<ValidatedResponse, ShapeError> {
    let object = response.as_object().ok_or(ShapeError::NotAnObject)?;

    let homeworks = object
        .get("homeworks")
        .ok_or(ShapeError::MissingHomeworks)?
        .as_array()
        .ok_or(ShapeError::HomeworksNotAList)?;

    let current_date = match object.get("current_date") {
        None => None,
        Some(value) => Some(value.as_i64().ok_or(ShapeError::CurrentDateNotAnInteger)?),
    };

    let homeworks = homeworks
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let record = item.as_object().ok_or(ShapeError::RecordNotAnObject(i))?;
            let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_owned);
            Ok(HomeworkRecord {
                status: text("status"),
                homework_name: text("homework_name"),
            })
        })
        .collect::<Result<Vec<_>, ShapeError>>()?;

    Ok(ValidatedResponse {
        homeworks,
        current_date,
    })
}
