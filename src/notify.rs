//! Single-slot status line with timed auto-clear.

use std::time::{Duration, Instant};

use colored::Colorize;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

/// How long each kind stays visible. `None` means until replaced.
#[derive(Debug, Clone, Copy)]
pub struct ClearPolicy {
    pub success: Duration,
    pub info: Duration,
}

impl ClearPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            success: config.success_clear(),
            info: config.info_clear(),
        }
    }

    fn delay(&self, kind: NotificationKind) -> Option<Duration> {
        match kind {
            NotificationKind::Success => Some(self.success),
            NotificationKind::Info => Some(self.info),
            NotificationKind::Error | NotificationKind::Loading => None,
        }
    }
}

/// Where notifications are shown as they are posted.
pub trait StatusSink {
    fn show(&self, notification: &Notification);
}

/// Writes notifications to stderr, colored by kind.
pub struct TerminalSink {
    quiet: bool,
}

impl TerminalSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl StatusSink for TerminalSink {
    fn show(&self, notification: &Notification) {
        // Errors are never silenced.
        if self.quiet && notification.kind != NotificationKind::Error {
            return;
        }
        let message = notification.message.as_str();
        let line = match notification.kind {
            NotificationKind::Success => format!("✓ {message}").green().to_string(),
            NotificationKind::Error => format!("✗ {message}").red().bold().to_string(),
            NotificationKind::Loading => format!("… {message}").bright_black().to_string(),
            NotificationKind::Info => format!("ℹ {message}").blue().to_string(),
        };
        eprintln!("{line}");
    }
}

pub struct Notifier {
    current: Option<Notification>,
    policy: ClearPolicy,
    sink: Box<dyn StatusSink>,
}

impl Notifier {
    pub fn new(policy: ClearPolicy, sink: Box<dyn StatusSink>) -> Self {
        Self {
            current: None,
            policy,
            sink,
        }
    }

    /// Replace the current notification.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notify_at(message, kind, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, kind: NotificationKind, at: Instant) {
        let notification = Notification {
            message: message.into(),
            kind,
            shown_at: at,
        };
        self.sink.show(&notification);
        self.current = Some(notification);
    }

    /// The notification still visible at `now`, if any.
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.current.as_ref().filter(|n| match self.policy.delay(n.kind) {
            Some(delay) => now.saturating_duration_since(n.shown_at) < delay,
            None => true,
        })
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
