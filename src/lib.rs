//! Client for a user-directory REST API: fetch an endpoint, classify the JSON
//! it returns, and render it as a user list, a user detail, or API info.

pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod notify;
pub mod output;
pub mod transport;
pub mod types;
pub mod view;

pub use classify::{classify, Classification, DisplayMode, InfoPayload};
pub use error::{AppError, FormatError, Result, TransportError};
pub use transport::{FetchStrategy, Transport};
pub use types::{ApiResponse, UserRecord};
pub use view::View;
