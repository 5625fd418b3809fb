//! Transient alert derivation for pushed notifications
//!
//! A pushed notification surfaces as a short-lived alert whose visual kind
//! follows the notification type and whose display duration follows the
//! priority.

use std::time::Duration;

use serde::Serialize;

use super::model::{Notification, NotificationType, Priority};

/// Display duration for urgent and high priority alerts
const DURATION_EMPHASIZED: Duration = Duration::from_secs(6);

/// Display duration for everything else
const DURATION_DEFAULT: Duration = Duration::from_secs(4);

/// Visual treatment of an alert
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Success => "✓",
            AlertKind::Error => "✕",
            AlertKind::Info => "🔔",
        }
    }
}

/// A transient user-facing alert for a pushed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub duration: Duration,
}

impl Alert {
    /// Derive the alert for a notification
    pub fn for_notification(notification: &Notification) -> Self {
        let kind = match notification.kind {
            NotificationType::PaymentConfirmation
            | NotificationType::AccountApproved
            | NotificationType::OrderStatusChange => AlertKind::Success,
            NotificationType::PaymentRejected | NotificationType::AccountRejected => {
                AlertKind::Error
            }
            NotificationType::Generic | NotificationType::Unknown => AlertKind::Info,
        };

        let duration = match notification.priority {
            Priority::Urgent | Priority::High => DURATION_EMPHASIZED,
            Priority::Normal | Priority::Low => DURATION_DEFAULT,
        };

        Alert {
            kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn notification(kind: NotificationType, priority: Priority) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            kind,
            priority,
            title: "Payment verified".to_string(),
            message: "Your payment for OD-11 was verified".to_string(),
            data: None,
            is_read: false,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    #[test]
    fn test_kind_follows_notification_type() {
        let success = Alert::for_notification(&notification(
            NotificationType::PaymentConfirmation,
            Priority::Normal,
        ));
        assert_eq!(success.kind, AlertKind::Success);

        let error = Alert::for_notification(&notification(
            NotificationType::AccountRejected,
            Priority::Normal,
        ));
        assert_eq!(error.kind, AlertKind::Error);

        let info =
            Alert::for_notification(&notification(NotificationType::Generic, Priority::Normal));
        assert_eq!(info.kind, AlertKind::Info);
    }

    #[test]
    fn test_high_priority_shows_longer() {
        let urgent =
            Alert::for_notification(&notification(NotificationType::Generic, Priority::Urgent));
        let normal =
            Alert::for_notification(&notification(NotificationType::Generic, Priority::Normal));
        assert!(urgent.duration > normal.duration);

        let high =
            Alert::for_notification(&notification(NotificationType::Generic, Priority::High));
        assert_eq!(high.duration, urgent.duration);
    }
}
