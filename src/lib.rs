//! OrderDesk Client Core
//!
//! Client-side core for the OrderDesk wholesale platform: the order lifecycle
//! presentation engine, the real-time notification channel, and the REST
//! client both are built on.

pub mod api;
pub mod config;
pub mod error;
pub mod notifications;
pub mod orders;

pub use error::{ClientError, ClientResult};
