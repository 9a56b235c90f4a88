use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormatError;

/// One person's profile as served by the backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub city: String,
    /// Job title.
    pub pekerjaan: String,
    /// Hobby.
    pub hobi: String,
}

impl UserRecord {
    pub const FIELDS: [&'static str; 7] =
        ["id", "name", "email", "age", "city", "pekerjaan", "hobi"];

    /// Extract a record from a JSON value, reporting the first missing field by name.
    pub fn from_value(value: &Value) -> Result<Self, FormatError> {
        let object = value.as_object().ok_or_else(|| {
            FormatError::InvalidFormat(format!("expected a user object, got {value}"))
        })?;

        if let Some(missing) = Self::FIELDS.iter().find(|f| !object.contains_key(**f)) {
            return Err(FormatError::MissingField(*missing));
        }

        Self::deserialize(value).map_err(|e| FormatError::InvalidFormat(e.to_string()))
    }
}
