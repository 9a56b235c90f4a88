//! Decides how a response should be displayed, from the endpoint and the body shape.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::endpoint::EndpointShape;
use crate::error::FormatError;
use crate::types::{ApiResponse, ListMeta, UserRecord};

pub const NOT_AVAILABLE: &str = "N/A";
pub const USER_DETAIL_FAILED: &str = "Failed to load user detail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    UserList,
    SingleUser,
    Info,
    Error,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    UserList {
        users: Vec<UserRecord>,
        total: u64,
        meta: Option<ListMeta>,
    },
    SingleUser {
        user: UserRecord,
        message: Option<String>,
    },
    /// The server answered but reported a failure.
    Error { message: String },
    Info(InfoPayload),
}

/// Generic payload for endpoints that are neither a list nor a single user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoPayload {
    pub message: String,
    pub status: String,
    pub total_users: Option<u64>,
    pub endpoints: BTreeMap<String, String>,
    pub usage_examples: BTreeMap<String, String>,
    /// The body as received; JSON output prints this instead of the summary.
    #[serde(skip)]
    pub raw: Value,
}

impl Classification {
    pub fn mode(&self) -> DisplayMode {
        match self {
            Self::UserList { .. } => DisplayMode::UserList,
            Self::SingleUser { .. } => DisplayMode::SingleUser,
            Self::Error { .. } => DisplayMode::Error,
            Self::Info(_) => DisplayMode::Info,
        }
    }
}

pub fn classify(endpoint: &str, response: &ApiResponse) -> Result<Classification, FormatError> {
    match EndpointShape::of(endpoint) {
        EndpointShape::UserList => classify_list(response),
        EndpointShape::SingleUser(_) => classify_single(response),
        EndpointShape::Other => Ok(Classification::Info(InfoPayload::from(response))),
    }
}

fn classify_list(response: &ApiResponse) -> Result<Classification, FormatError> {
    let items = match response.data() {
        Some(data) if response.is_success() => data.as_array(),
        _ => None,
    }
    .ok_or_else(|| {
        FormatError::InvalidFormat("expected a successful response with a user array".to_string())
    })?;

    let users = items
        .iter()
        .map(UserRecord::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    let total = response
        .total
        .or(response.count)
        .or_else(|| response.meta.as_ref().and_then(ListMeta::as_count))
        .unwrap_or(users.len() as u64);

    Ok(Classification::UserList {
        users,
        total,
        meta: response.meta.clone(),
    })
}

fn classify_single(response: &ApiResponse) -> Result<Classification, FormatError> {
    match response.data() {
        Some(data) if response.is_success() => Ok(Classification::SingleUser {
            user: UserRecord::from_value(data)?,
            message: response.message.clone(),
        }),
        _ => Ok(Classification::Error {
            message: response
                .message
                .clone()
                .unwrap_or_else(|| USER_DETAIL_FAILED.to_string()),
        }),
    }
}

impl From<&ApiResponse> for InfoPayload {
    fn from(response: &ApiResponse) -> Self {
        Self {
            message: response
                .message
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status: response
                .status
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            total_users: response.data_info.as_ref().and_then(|info| info.total_users),
            endpoints: response.endpoints.clone().unwrap_or_default(),
            usage_examples: response.usage_examples.clone().unwrap_or_default(),
            raw: response.raw.clone(),
        }
    }
}
