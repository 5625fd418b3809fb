//! Order models and wire-format types
//!
//! Orders are owned by the server; the client holds read-only snapshots
//! decoded from the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order snapshot as returned by the OrderDesk API
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    /// Human-facing order number, immutable once assigned
    pub order_number: String,
    pub status: OrderStatus,
    /// Fixed at order creation, never changes
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    /// Order total in paise
    pub total: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub courier: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dispatched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Order status progression
///
/// Monotonic except for `Cancelled`, which is absorbing and reachable from
/// any non-terminal state. Values outside the enumerated set decode as
/// `Unknown` and render as the earliest in-progress state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Dispatched,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Dispatched => "DISPATCHED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether no further status-affecting operation is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Payment method, fixed at order creation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CashOnDelivery,
    BankTransfer,
    Cheque,
    #[serde(other)]
    Unknown,
}

/// Payment status, an axis independent from the order status
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Order line item, immutable after placement
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    /// Unit price in paise
    pub unit_price: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}

impl Order {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Diagnostic check of the snapshot invariants the server is expected to
    /// uphold. Used by the API layer as a log-only check; the server owns
    /// enforcement.
    pub fn validate_snapshot(&self) -> Result<(), String> {
        if self.delivered_at.is_some() && self.cancelled_at.is_some() {
            return Err(format!(
                "Order {} has both deliveredAt and cancelledAt set",
                self.order_number
            ));
        }

        // Timestamps must be non-decreasing along the progression when present
        let mut last: Option<DateTime<Utc>> = Some(self.created_at);
        for (name, ts) in [
            ("paymentReceivedAt", self.payment_received_at),
            ("dispatchedAt", self.dispatched_at),
            ("deliveredAt", self.delivered_at),
        ] {
            if let Some(ts) = ts {
                if let Some(prev) = last {
                    if ts < prev {
                        return Err(format!(
                            "Order {} timestamp {} precedes an earlier lifecycle timestamp",
                            self.order_number, name
                        ));
                    }
                }
                last = Some(ts);
            }
        }

        Ok(())
    }
}
