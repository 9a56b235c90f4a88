//! Endpoint shapes and URL construction for the users API.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{AppError, Result};

pub const USERS_PATH: &str = "/api/users";
pub const HEALTH_PATH: &str = "/health";

static SINGLE_USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/api/users/(\d+)$").expect("valid regex"));

/// What an endpoint string asks for, judged from its text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointShape {
    /// The users collection or one of its filtered views.
    UserList,
    /// `/api/users/<id>`.
    SingleUser(u64),
    Other,
}

impl EndpointShape {
    pub fn of(endpoint: &str) -> Self {
        if let Some(caps) = SINGLE_USER.captures(endpoint) {
            // Ids too large for u64 still name a single item.
            let id = caps[1].parse().unwrap_or(u64::MAX);
            return Self::SingleUser(id);
        }
        if endpoint.contains(USERS_PATH) {
            Self::UserList
        } else {
            Self::Other
        }
    }
}

/// Canonical list views offered by the filter shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    City(String),
    Job(String),
}

impl UserFilter {
    pub fn from_args(city: Option<String>, job: Option<String>) -> Self {
        match (city, job) {
            (Some(city), _) => Self::City(city),
            (None, Some(job)) => Self::Job(job),
            (None, None) => Self::All,
        }
    }

    fn segments(&self) -> Vec<&str> {
        match self {
            Self::All => vec!["api", "users"],
            Self::City(city) => vec!["api", "users", "city", city],
            Self::Job(job) => vec!["api", "users", "job", job],
        }
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|_| AppError::InvalidUrl(base_url.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(AppError::InvalidUrl(base_url.to_string()));
    }
    Ok(url)
}

fn with_segments<'a>(base_url: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let mut url = parse_base(base_url)?;
    url.path_segments_mut()
        .map_err(|_| AppError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}

/// URL of a list view, with filter values percent-encoded.
pub fn users_url(base_url: &str, filter: &UserFilter) -> Result<String> {
    with_segments(base_url, filter.segments())
}

pub fn user_url(base_url: &str, id: u64) -> Result<String> {
    let id = id.to_string();
    with_segments(base_url, ["api", "users", id.as_str()])
}

pub fn health_url(base_url: &str) -> Result<String> {
    resolve(base_url, HEALTH_PATH)
}

/// Turn user input into a request URL.
///
/// Absolute URLs are used as-is; anything else is treated as a path under `base_url`.
pub fn resolve(base_url: &str, input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::EmptyEndpoint);
    }

    if let Ok(url) = Url::parse(input) {
        if matches!(url.scheme(), "http" | "https") {
            return Ok(url.to_string());
        }
    }

    parse_base(base_url)?;
    let joined = if input.starts_with('/') {
        format!("{}{input}", base_url.trim_end_matches('/'))
    } else {
        format!("{}/{input}", base_url.trim_end_matches('/'))
    };
    Url::parse(&joined)
        .map(|url| url.to_string())
        .map_err(|_| AppError::InvalidUrl(joined))
}

/// `scheme://host[:port]` of an endpoint, used to name the server in error messages.
pub fn origin_of(endpoint: &str) -> Option<String> {
    let url = Url::parse(endpoint).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}
