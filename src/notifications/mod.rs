//! Notification domain module
//!
//! Contains the notification models, the per-session cache, the live
//! reconnecting channel, and transient alert derivation.

pub mod alerts;
pub mod cache;
pub mod channel;
pub mod model;

pub use alerts::{Alert, AlertKind};
pub use cache::NotificationCache;
pub use channel::{ConnectionState, NotificationChannel};
pub use model::{Notification, NotificationPage, NotificationType, Priority, ServerEvent};
