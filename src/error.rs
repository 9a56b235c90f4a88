use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while getting a JSON body from the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("HTTP {code}: {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("request timeout")]
    Timeout,

    #[error("invalid JSON response: {0}")]
    InvalidJson(String),
}

/// The response parsed as JSON but does not have the shape the endpoint implies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    #[error("user record is missing field `{0}`")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("API error: {message}")]
    Api { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Enter an API endpoint first")]
    EmptyEndpoint,

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Already posted to the user as an Error notification.
    #[error(transparent)]
    Reported(Box<AppError>),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn reported(err: AppError) -> Self {
        if err.is_reported() {
            err
        } else {
            Self::Reported(Box::new(err))
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }

    /// The underlying error, looking through [`AppError::Reported`].
    pub fn unreported(&self) -> &AppError {
        match self {
            Self::Reported(inner) => inner.unreported(),
            other => other,
        }
    }
}

impl TransportError {
    /// Message shown to the user, with hints for the common failure kinds.
    pub fn user_message(&self, base_url: &str) -> String {
        match self {
            Self::Network(_) => format!(
                "Connection failed: cannot reach the backend at {base_url}. \
                 Make sure the server is running and the endpoint URL is correct."
            ),
            Self::Timeout => "Request timeout: the server took too long to respond".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidJson(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_message_names_base_url() {
        let err = TransportError::Network("connection refused".into());
        let msg = err.user_message("http://localhost:5000");
        assert!(msg.contains("http://localhost:5000"), "{msg}");
    }

    #[test]
    fn http_status_message_keeps_code() {
        let err = TransportError::HttpStatus {
            code: 502,
            reason: "Bad Gateway".into(),
        };
        assert_eq!(err.user_message("http://x"), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn reported_wraps_once_and_keeps_message() {
        let err = AppError::reported(AppError::reported(AppError::EmptyEndpoint));
        assert!(err.is_reported());
        assert!(matches!(err.unreported(), AppError::EmptyEndpoint));
        assert_eq!(err.to_string(), "Enter an API endpoint first");
    }

    #[test]
    fn transport_errors_convert_into_app_error() {
        let err: AppError = TransportError::Timeout.into();
        assert!(matches!(err, AppError::Transport(TransportError::Timeout)));
        assert_eq!(err.to_string(), "request timeout");
    }
}
