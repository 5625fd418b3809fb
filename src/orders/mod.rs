//! Order domain module
//!
//! Contains the order snapshot model and the pure lifecycle engine that
//! derives presentation facts from it.

pub mod format;
pub mod lifecycle;
pub mod model;
pub mod timeline;

pub use lifecycle::{
    describe_payment_status, describe_status, next_customer_action, progress_percent,
    CustomerAction, MethodClass, NextAction, StatusPresentation,
};
pub use model::{Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
pub use timeline::{build_timeline, cancellation_banner, CancellationBanner, TimelineStep};
