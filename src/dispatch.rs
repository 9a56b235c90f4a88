//! Runs a load end to end: fetch, classify, notify, and update the display slot.

use std::cell::RefCell;
use std::time::Instant;

use tracing::{debug, info};

use crate::classify::{classify, Classification, DisplayMode};
use crate::endpoint::{self, origin_of};
use crate::error::{AppError, Result};
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::transport::Transport;
use crate::types::{ApiResponse, UserRecord};
use crate::view::View;

/// Issued when a load starts. Only the newest ticket may update the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    endpoint: String,
}

/// The current endpoint and displayed data, fenced by request sequence number.
#[derive(Debug)]
pub struct Board {
    latest: u64,
    endpoint: Option<String>,
    view: View,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            latest: 0,
            endpoint: None,
            view: View::Empty,
        }
    }
}

impl Board {
    pub fn begin(&mut self, endpoint: &str) -> Ticket {
        self.latest += 1;
        self.endpoint = Some(endpoint.to_string());
        Ticket {
            seq: self.latest,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.latest
    }

    /// Show `view` if `ticket` is still the newest request. Returns whether it was applied.
    pub fn complete(&mut self, ticket: &Ticket, view: View) -> bool {
        if !self.is_latest(ticket) {
            debug!(seq = ticket.seq, latest = self.latest, endpoint = %ticket.endpoint, "discarding stale response");
            return false;
        }
        self.view = view;
        true
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn view(&self) -> &View {
        &self.view
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Applied(DisplayMode),
    /// A newer load started before this one finished; its result was dropped.
    Stale,
}

pub struct Dispatcher {
    transport: Transport,
    base_url: String,
    notifier: RefCell<Notifier>,
    board: RefCell<Board>,
}

impl Dispatcher {
    pub fn new(transport: Transport, base_url: String, notifier: Notifier) -> Self {
        Self {
            transport,
            base_url,
            notifier: RefCell::new(notifier),
            board: RefCell::new(Board::default()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn view(&self) -> View {
        self.board.borrow().view().clone()
    }

    pub fn current_endpoint(&self) -> Option<String> {
        self.board.borrow().endpoint().map(String::from)
    }

    pub fn notification(&self, now: Instant) -> Option<Notification> {
        self.notifier.borrow().current(now).cloned()
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        self.notifier.borrow_mut().notify(message, kind);
    }

    /// Load an endpoint (absolute URL or path under the base URL) and display it.
    ///
    /// Failures are posted as an Error notification and clear the display before
    /// being returned as [`AppError::Reported`].
    pub async fn load(&self, input: &str) -> Result<LoadStatus> {
        let url = match endpoint::resolve(&self.base_url, input) {
            Ok(url) => url,
            Err(err) => {
                self.notify(err.to_string(), NotificationKind::Error);
                return Err(AppError::reported(err));
            }
        };

        let ticket = self.board.borrow_mut().begin(&url);
        self.notify("Loading data...", NotificationKind::Loading);
        info!(endpoint = %url, "loading");

        let fetched = self.transport.fetch_json(&url).await;

        if !self.board.borrow().is_latest(&ticket) {
            debug!(endpoint = %url, "newer load in flight, dropping result");
            return Ok(LoadStatus::Stale);
        }

        let response = match fetched {
            Ok(response) => response,
            Err(err) => {
                let origin = origin_of(&url).unwrap_or_else(|| self.base_url.clone());
                return Err(self.fail(&ticket, err.user_message(&origin), err.into()));
            }
        };

        let classification = match classify(&url, &response) {
            Ok(classification) => classification,
            Err(err) => return Err(self.fail(&ticket, err.to_string(), err.into())),
        };
        let mode = classification.mode();

        match &classification {
            Classification::UserList { total, .. } => {
                self.notify(loaded_message(*total), NotificationKind::Success)
            }
            Classification::SingleUser { message, .. } => self.notify(
                message.clone().unwrap_or_else(|| "User loaded".to_string()),
                NotificationKind::Success,
            ),
            Classification::Info(_) => self.notify("Data loaded", NotificationKind::Success),
            Classification::Error { message } => {
                let message = message.clone();
                return Err(self.fail(
                    &ticket,
                    message.clone(),
                    AppError::Api { message },
                ));
            }
        }

        self.board.borrow_mut().complete(&ticket, View::from(classification));
        Ok(LoadStatus::Applied(mode))
    }

    fn fail(&self, ticket: &Ticket, message: String, err: AppError) -> AppError {
        self.notify(message, NotificationKind::Error);
        self.board.borrow_mut().complete(ticket, View::Empty);
        AppError::reported(err)
    }

    /// Load one user and hand back the record.
    pub async fn fetch_user(&self, id: u64) -> Result<UserRecord> {
        let url = endpoint::user_url(&self.base_url, id)?;
        self.load(&url).await?;
        match self.board.borrow().view() {
            View::SingleUser { user } => Ok(user.clone()),
            _ => Err(AppError::Api {
                message: format!("user {id} was not loaded"),
            }),
        }
    }

    /// Ping `<base>/health` without touching the display.
    pub async fn check_health(&self) -> Result<ApiResponse> {
        let url = endpoint::health_url(&self.base_url)?;
        self.notify(
            format!("Testing connection to backend server at {}...", self.base_url),
            NotificationKind::Loading,
        );

        match self.transport.fetch_json(&url).await {
            Ok(response) => {
                debug!(status = ?response.status, "health check passed");
                self.notify(
                    format!("Connected to backend server at {}", self.base_url),
                    NotificationKind::Success,
                );
                Ok(response)
            }
            Err(err) => {
                self.notify(
                    format!(
                        "Cannot connect to backend server at {}. Make sure the server is running and accessible.",
                        self.base_url
                    ),
                    NotificationKind::Error,
                );
                Err(AppError::reported(err.into()))
            }
        }
    }
}

fn loaded_message(total: u64) -> String {
    if total == 1 {
        "Loaded 1 user".to_string()
    } else {
        format!("Loaded {total} users")
    }
}
