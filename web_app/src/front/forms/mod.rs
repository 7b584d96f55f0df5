pub mod chat;
pub mod pet;
pub mod user;

use crate::front::errors::ApiError;
use serde::de::DeserializeOwned;

/// Decodes a JSON request body. Any body that does not decode, an empty one
/// included, is `InvalidInput`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid request body: {e}")))
}

/// Parses a numeric id taken from the url. An id that is not a number can not
/// name a record, so it answers with `not_found`.
pub fn parse_id(raw: &str, not_found: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::NotFound(not_found.to_string()))
}
