//! User-facing notifications.
//!
//! The store reports the outcome of each remote call through a [`Notifier`].
//! Delivery is fire-and-forget: nothing is returned and a notifier that can no
//! longer deliver simply drops the message.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Severity class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Negative,
}

/// Where the host UI should display the notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Center,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::TopLeft => write!(f, "top-left"),
            Self::TopRight => write!(f, "top-right"),
            Self::Bottom => write!(f, "bottom"),
            Self::BottomLeft => write!(f, "bottom-left"),
            Self::BottomRight => write!(f, "bottom-right"),
            Self::Center => write!(f, "center"),
        }
    }
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub position: Position,
}

impl Notification {
    pub fn positive(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Positive,
            position,
        }
    }

    pub fn negative(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Negative,
            position,
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Useful for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Positive => tracing::info!(
                position = %notification.position,
                "{}",
                notification.message
            ),
            Severity::Negative => tracing::warn!(
                position = %notification.position,
                "{}",
                notification.message
            ),
        }
    }
}

/// Forwards notifications to a UI event loop over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification receiver closed, dropping message");
        }
    }
}
