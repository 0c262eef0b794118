// File: src/request.rs
//! Validation of the JSON bodies the request layer receives for the two
//! scoring operations.
use crate::core::types::{LeaderboardEntry, Score};
use crate::error::ValidationError;
use serde_json::Value;

/// A guess against one puzzle item. Resolving `image_id` to a target phrase
/// is the catalog's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRequest {
    pub image_id: String,
    pub user_guess: String,
}

impl GuessRequest {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        Ok(Self {
            image_id: string_field(body, "image_id")?.to_string(),
            user_guess: string_field(body, "user_guess")?.to_string(),
        })
    }
}

/// Parses `{"name": ..., "score": ...}` into a validated entry.
///
/// `score` must be a JSON number; strings, booleans and `null` are rejected
/// even when they look numeric.
pub fn parse_score_submission(body: &Value) -> Result<LeaderboardEntry, ValidationError> {
    let name = string_field(body, "name")?;
    let score = match body.get("score") {
        None => return Err(ValidationError::MissingField("score")),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => Score::Int(v),
            None => Score::Real(n.as_f64().ok_or(ValidationError::NonNumericScore)?),
        },
        Some(_) => return Err(ValidationError::NonNumericScore),
    };
    LeaderboardEntry::new(name, score)
}

fn string_field<'a>(body: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    match body.get(field) {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::InvalidField(field)),
    }
}
