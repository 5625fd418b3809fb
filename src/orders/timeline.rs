//! Method-dependent order timeline derivation
//!
//! Produces the fixed sequence of named steps a buyer sees on the order
//! detail page. Cash-on-delivery orders skip the upfront payment steps and
//! gain a payment-on-delivery step; prepaid orders track the proof-upload and
//! verification flow. Cancellation is rendered as a terminal banner outside
//! the step sequence, not as a step.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::model::{Order, OrderStatus, PaymentStatus};
use crate::orders::lifecycle::MethodClass;

/// Identity of a timeline step
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Placed,
    Confirmed,
    PaymentPending,
    PaymentConfirmed,
    Processing,
    Dispatched,
    PaymentOnDelivery,
    Delivered,
}

/// Carrier details attached to the dispatched step
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TrackingInfo {
    pub courier: Option<String>,
    pub tracking_number: String,
}

/// A rendered timeline step
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TimelineStep {
    pub kind: StepKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub completed: bool,
    /// The last completed step; at most one step is current
    pub current: bool,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingInfo>,
    /// Cash-on-delivery payment step gets visual emphasis
    pub highlight: bool,
    /// Prepaid payment step flagged while the order is blocked on payment
    pub warning: bool,
}

/// Terminal cancellation rendering, shown instead of timeline progress
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CancellationBanner {
    pub label: &'static str,
    pub message: &'static str,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Static description of a step before order state is applied
struct StepSpec {
    kind: StepKind,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
    /// Statuses at or after this step in the canonical progression
    completed_when: &'static [OrderStatus],
}

const ANY_ACTIVE: &[OrderStatus] = &[
    OrderStatus::PendingPayment,
    OrderStatus::Paid,
    OrderStatus::Dispatched,
    OrderStatus::Delivered,
];
const PAID_ONWARD: &[OrderStatus] = &[
    OrderStatus::Paid,
    OrderStatus::Dispatched,
    OrderStatus::Delivered,
];
const DISPATCHED_ONWARD: &[OrderStatus] = &[OrderStatus::Dispatched, OrderStatus::Delivered];
const DELIVERED_ONLY: &[OrderStatus] = &[OrderStatus::Delivered];

/// Cash on delivery: placed → confirmed → processing → dispatched →
/// payment-on-delivery → delivered
const COD_STEPS: &[StepSpec] = &[
    StepSpec {
        kind: StepKind::Placed,
        label: "Order Placed",
        icon: "📝",
        description: "Your order has been received",
        completed_when: ANY_ACTIVE,
    },
    StepSpec {
        kind: StepKind::Confirmed,
        label: "Order Confirmed",
        icon: "✓",
        description: "Order verified and ready for processing",
        completed_when: PAID_ONWARD,
    },
    StepSpec {
        kind: StepKind::Processing,
        label: "Processing",
        icon: "📦",
        description: "Preparing your order for shipment",
        completed_when: DISPATCHED_ONWARD,
    },
    StepSpec {
        kind: StepKind::Dispatched,
        label: "Dispatched",
        icon: "🚚",
        description: "Order is on its way",
        completed_when: DISPATCHED_ONWARD,
    },
    StepSpec {
        kind: StepKind::PaymentOnDelivery,
        label: "Payment on Delivery",
        icon: "💵",
        description: "Pay when you receive your order",
        completed_when: DELIVERED_ONLY,
    },
    StepSpec {
        kind: StepKind::Delivered,
        label: "Delivered",
        icon: "🎉",
        description: "Order successfully delivered",
        completed_when: DELIVERED_ONLY,
    },
];

/// Prepaid: placed → payment-pending → payment-confirmed → processing →
/// dispatched → delivered
const PREPAID_STEPS: &[StepSpec] = &[
    StepSpec {
        kind: StepKind::Placed,
        label: "Order Placed",
        icon: "📝",
        description: "Your order has been received",
        completed_when: ANY_ACTIVE,
    },
    StepSpec {
        kind: StepKind::PaymentPending,
        label: "Payment Pending",
        icon: "⏳",
        description: "Awaiting payment proof upload",
        completed_when: PAID_ONWARD,
    },
    StepSpec {
        kind: StepKind::PaymentConfirmed,
        label: "Payment Confirmed",
        icon: "💳",
        description: "Payment verified successfully",
        completed_when: PAID_ONWARD,
    },
    StepSpec {
        kind: StepKind::Processing,
        label: "Processing",
        icon: "📦",
        description: "Preparing your order for shipment",
        completed_when: DISPATCHED_ONWARD,
    },
    StepSpec {
        kind: StepKind::Dispatched,
        label: "Dispatched",
        icon: "🚚",
        description: "Order is on its way",
        completed_when: DISPATCHED_ONWARD,
    },
    StepSpec {
        kind: StepKind::Delivered,
        label: "Delivered",
        icon: "🎉",
        description: "Order successfully delivered",
        completed_when: DELIVERED_ONLY,
    },
];

/// Build the buyer-facing timeline for an order.
///
/// A step is completed iff the order's status is in its completion set; the
/// current step is the last completed one. Unknown statuses complete nothing
/// beyond the placed step's set, so the timeline degrades to "just placed".
pub fn build_timeline(order: &Order) -> Vec<TimelineStep> {
    let specs = match order.payment_method.classification() {
        MethodClass::CashOnDelivery => COD_STEPS,
        MethodClass::Prepaid => PREPAID_STEPS,
    };

    let completed: Vec<bool> = specs
        .iter()
        .map(|spec| spec.completed_when.contains(&order.status))
        .collect();

    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let next_completed = completed.get(i + 1).copied().unwrap_or(false);
            TimelineStep {
                kind: spec.kind,
                label: spec.label,
                icon: spec.icon,
                description: spec.description,
                completed: completed[i],
                current: completed[i] && !next_completed,
                timestamp: step_timestamp(spec.kind, order),
                tracking: step_tracking(spec.kind, order),
                highlight: spec.kind == StepKind::PaymentOnDelivery,
                warning: spec.kind == StepKind::PaymentPending
                    && order.status == OrderStatus::PendingPayment,
            }
        })
        .collect()
}

/// Terminal banner for cancelled orders
pub fn cancellation_banner(order: &Order) -> Option<CancellationBanner> {
    if order.status != OrderStatus::Cancelled {
        return None;
    }
    Some(CancellationBanner {
        label: "Order Cancelled",
        message: "This order has been cancelled",
        cancelled_at: order.cancelled_at,
    })
}

fn step_timestamp(kind: StepKind, order: &Order) -> Option<DateTime<Utc>> {
    match kind {
        StepKind::Placed => Some(order.created_at),
        // Confirmation of a COD order is implied by payment collection status
        StepKind::Confirmed => {
            if order.payment_status == PaymentStatus::Paid {
                order.payment_received_at
            } else {
                None
            }
        }
        StepKind::PaymentConfirmed => order.payment_received_at,
        StepKind::Dispatched => order.dispatched_at,
        StepKind::PaymentOnDelivery | StepKind::Delivered => order.delivered_at,
        StepKind::PaymentPending | StepKind::Processing => None,
    }
}

fn step_tracking(kind: StepKind, order: &Order) -> Option<TrackingInfo> {
    if kind != StepKind::Dispatched {
        return None;
    }
    order.tracking_number.as_ref().map(|number| TrackingInfo {
        courier: order.courier.clone(),
        tracking_number: number.clone(),
    })
}
