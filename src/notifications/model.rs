//! Notification models and live-channel event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification record, owned by the server and mirrored in the
/// per-session cache
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    /// Free-form payload, e.g. `{"orderId": ...}` for order status changes
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Set iff `is_read`
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Order id carried by order-status-change notifications, used to
    /// navigate to the order's lifecycle rendering
    pub fn order_id(&self) -> Option<Uuid> {
        self.data
            .as_ref()
            .and_then(|data| data.get("orderId"))
            .and_then(|value| value.as_str())
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }
}

/// Notification categories
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    PaymentConfirmation,
    PaymentRejected,
    AccountApproved,
    AccountRejected,
    OrderStatusChange,
    Generic,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationType::PaymentConfirmation => "payment_confirmation",
            NotificationType::PaymentRejected => "payment_rejected",
            NotificationType::AccountApproved => "account_approved",
            NotificationType::AccountRejected => "account_rejected",
            NotificationType::OrderStatusChange => "order_status_change",
            NotificationType::Generic => "generic",
            NotificationType::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Notification priority, drives transient alert emphasis
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// Events pushed over the live channel
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    NewNotification { notification: Notification },
    NotificationRead { id: Uuid },
    AllNotificationsRead,
}

/// Backlog page returned by the notification list endpoint
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    /// Authoritative unread count, which may include notifications older
    /// than the fetched window
    pub unread_count: usize,
}
