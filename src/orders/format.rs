//! Shared presentation helpers for amounts, dates, and delivery estimates

use chrono::{DateTime, Duration, Utc};

use super::model::{Order, OrderStatus};

/// Days after dispatch for the earliest expected delivery
const DELIVERY_WINDOW_MIN_DAYS: i64 = 3;

/// Days after dispatch for the latest expected delivery
const DELIVERY_WINDOW_MAX_DAYS: i64 = 5;

/// Format an amount in paise as rupees with Indian digit grouping,
/// e.g. `12_34_56_789` paise renders as "₹12,34,567.89".
pub fn format_amount(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    let rupees = abs / 100;
    let fraction = abs % 100;
    format!("{}₹{}.{:02}", sign, group_indian(rupees), fraction)
}

/// Indian digit grouping: the last three digits form one group, every group
/// before that has two digits (1,23,45,678).
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let bytes = head.as_bytes();
    let mut end = bytes.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format a lifecycle timestamp for display, e.g. "5 Aug 2026, 14:03"
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%-d %b %Y, %H:%M").to_string()
}

/// Delivery expectation derived from the order's dispatch state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEstimate {
    /// Already delivered at this time
    Delivered(DateTime<Utc>),
    /// Expected within this window
    Window {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// Not dispatched yet
    PendingDispatch,
}

impl DeliveryEstimate {
    pub fn describe(&self) -> String {
        match self {
            DeliveryEstimate::Delivered(at) => format_timestamp(*at),
            DeliveryEstimate::Window { from, to } => format!(
                "{} - {}",
                from.format("%-d %b"),
                to.format("%-d %b %Y")
            ),
            DeliveryEstimate::PendingDispatch => "Will be updated after dispatch".to_string(),
        }
    }
}

/// Estimate delivery for an order: the actual time once delivered, a
/// 3-5 day window once dispatched, otherwise pending.
pub fn estimated_delivery(order: &Order) -> DeliveryEstimate {
    if order.status == OrderStatus::Delivered {
        if let Some(at) = order.delivered_at {
            return DeliveryEstimate::Delivered(at);
        }
    }

    if order.status == OrderStatus::Dispatched {
        if let Some(dispatched) = order.dispatched_at {
            return DeliveryEstimate::Window {
                from: dispatched + Duration::days(DELIVERY_WINDOW_MIN_DAYS),
                to: dispatched + Duration::days(DELIVERY_WINDOW_MAX_DAYS),
            };
        }
    }

    DeliveryEstimate::PendingDispatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::model::{PaymentMethod, PaymentStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: "OD-9".to_string(),
            status,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_status: PaymentStatus::Pending,
            payment_proof_url: None,
            total: 0,
            items: vec![],
            tracking_number: None,
            courier: None,
            created_at: Utc::now(),
            payment_received_at: None,
            dispatched_at: None,
            delivered_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_format_amount_indian_grouping() {
        assert_eq!(format_amount(0), "₹0.00");
        assert_eq!(format_amount(99_950), "₹999.50");
        assert_eq!(format_amount(100_000), "₹1,000.00");
        assert_eq!(format_amount(12_345_678), "₹1,23,456.78");
        assert_eq!(format_amount(1_234_567_800), "₹1,23,45,678.00");
        assert_eq!(format_amount(-250_000), "-₹2,500.00");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 5, 14, 3, 0).unwrap();
        assert_eq!(format_timestamp(ts), "5 Aug 2026, 14:03");
    }

    #[test]
    fn test_estimate_window_after_dispatch() {
        let mut o = order(OrderStatus::Dispatched);
        let dispatched = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        o.dispatched_at = Some(dispatched);

        match estimated_delivery(&o) {
            DeliveryEstimate::Window { from, to } => {
                assert_eq!(from, dispatched + Duration::days(3));
                assert_eq!(to, dispatched + Duration::days(5));
            }
            other => panic!("expected window, got {:?}", other),
        }
    }

    #[test]
    fn test_estimate_delivered_uses_actual_time() {
        let mut o = order(OrderStatus::Delivered);
        let delivered = Utc.with_ymd_and_hms(2026, 8, 4, 16, 30, 0).unwrap();
        o.delivered_at = Some(delivered);
        assert_eq!(
            estimated_delivery(&o),
            DeliveryEstimate::Delivered(delivered)
        );
    }

    #[test]
    fn test_estimate_pending_before_dispatch() {
        let o = order(OrderStatus::PendingPayment);
        assert_eq!(estimated_delivery(&o), DeliveryEstimate::PendingDispatch);
        assert_eq!(
            estimated_delivery(&o).describe(),
            "Will be updated after dispatch"
        );
    }
}
