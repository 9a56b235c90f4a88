use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const STATUS_SUCCESS: &str = "success";

/// Envelope returned by every backend endpoint. All fields are optional, and a
/// field with an unexpected type is read as absent without affecting the rest.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub meta: Option<ListMeta>,
    #[serde(default, deserialize_with = "lenient")]
    pub data_info: Option<DataInfo>,
    #[serde(default, deserialize_with = "catalog")]
    pub endpoints: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "catalog")]
    pub usage_examples: Option<BTreeMap<String, String>>,
    /// The body exactly as received, for raw output.
    #[serde(skip)]
    pub raw: Value,
}

/// Summary attached to list responses: either a bare count or a descriptive object.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ListMeta {
    Count(u64),
    Details {
        total_users: Option<u64>,
        last_updated: Option<String>,
        data_source: Option<String>,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DataInfo {
    pub total_users: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Path-to-description maps. Descriptions that are not strings are kept as
/// compact JSON text.
fn catalog<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect(),
    ))
}

impl ApiResponse {
    /// Build a response from any JSON body.
    ///
    /// Bodies that are not objects yield an envelope with every field absent;
    /// the raw value is kept either way.
    pub fn from_json(raw: Value) -> Self {
        let mut response = if raw.is_object() {
            Self::deserialize(&raw).unwrap_or_default()
        } else {
            Self::default()
        };
        response.raw = raw;
        response
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// `data`, treating an explicit JSON null as absent.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref().filter(|v| !v.is_null())
    }
}

impl ListMeta {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Details { .. } => None,
        }
    }
}
