//! Order Lifecycle Engine Tests
//!
//! These tests validate the payment-method-aware lifecycle derivations with
//! full-domain sweeps and the buyer-visible scenarios from the storefront.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use orderdesk_client::orders::{
    build_timeline, cancellation_banner, describe_status, next_customer_action, progress_percent,
    CustomerAction, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
};

const ALL_STATUSES: [OrderStatus; 6] = [
    OrderStatus::PendingPayment,
    OrderStatus::Paid,
    OrderStatus::Dispatched,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Unknown,
];

const ALL_METHODS: [PaymentMethod; 4] = [
    PaymentMethod::CashOnDelivery,
    PaymentMethod::BankTransfer,
    PaymentMethod::Cheque,
    PaymentMethod::Unknown,
];

fn order(status: OrderStatus, method: PaymentMethod) -> Order {
    Order {
        id: Uuid::new_v4(),
        order_number: "OD-2025-0117".to_string(),
        status,
        payment_method: method,
        payment_status: PaymentStatus::Pending,
        payment_proof_url: None,
        total: 1_875_000,
        items: vec![OrderItem {
            product_id: Uuid::new_v4(),
            name: "Packing tape (carton of 72)".to_string(),
            quantity: 25,
            unit_price: 75_000,
        }],
        tracking_number: None,
        courier: None,
        created_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
        payment_received_at: None,
        dispatched_at: None,
        delivered_at: None,
        cancelled_at: None,
    }
}

fn with_proof(mut order: Order) -> Order {
    order.payment_proof_url = Some("https://cdn.orderdesk.example/proofs/117.jpg".to_string());
    order
}

// ============================================================================
// Status Description Tests
// ============================================================================

#[test]
fn test_cod_pending_payment_never_mentions_payment() {
    let rendered = describe_status(OrderStatus::PendingPayment, PaymentMethod::CashOnDelivery);
    let text = format!("{} {}", rendered.label, rendered.description).to_lowercase();
    assert!(!text.contains("pending payment"));
    assert!(!text.contains("awaiting payment"));
}

#[test]
fn test_prepaid_pending_payment_mentions_payment() {
    for method in [PaymentMethod::BankTransfer, PaymentMethod::Cheque] {
        let rendered = describe_status(OrderStatus::PendingPayment, method);
        let text = format!("{} {}", rendered.label, rendered.description).to_lowercase();
        assert!(text.contains("payment"), "{:?} should read as unpaid", method);
    }
}

#[test]
fn test_every_status_renders_for_every_method() {
    for status in ALL_STATUSES {
        for method in ALL_METHODS {
            let rendered = describe_status(status, method);
            assert!(!rendered.label.is_empty());
            assert!(!rendered.description.is_empty());
            assert!(!rendered.color_class.is_empty());
        }
    }
}

// ============================================================================
// Timeline Tests
// ============================================================================

#[test]
fn test_one_current_step_unless_cancelled() {
    for method in ALL_METHODS {
        for status in [
            OrderStatus::PendingPayment,
            OrderStatus::Paid,
            OrderStatus::Dispatched,
            OrderStatus::Delivered,
        ] {
            let steps = build_timeline(&order(status, method));
            assert_eq!(
                steps.iter().filter(|s| s.current).count(),
                1,
                "{:?}/{:?}",
                status,
                method
            );
        }

        let steps = build_timeline(&order(OrderStatus::Cancelled, method));
        assert_eq!(steps.iter().filter(|s| s.current).count(), 0);
        assert_eq!(steps.iter().filter(|s| s.completed).count(), 0);
    }
}

#[test]
fn test_timeline_timestamps_follow_order_fields() {
    let mut o = order(OrderStatus::Dispatched, PaymentMethod::BankTransfer);
    o.payment_status = PaymentStatus::Paid;
    o.payment_received_at = Some(o.created_at + Duration::hours(4));
    o.dispatched_at = Some(o.created_at + Duration::days(1));
    o.tracking_number = Some("AWB-778899".to_string());

    let steps = build_timeline(&o);
    let placed = &steps[0];
    assert_eq!(placed.timestamp, Some(o.created_at));

    let dispatched = steps
        .iter()
        .find(|s| s.timestamp == o.dispatched_at)
        .expect("dispatched step carries its timestamp");
    assert!(dispatched.tracking.is_some());
}

#[test]
fn test_cancelled_order_gets_banner_not_step() {
    let mut o = order(OrderStatus::Cancelled, PaymentMethod::Cheque);
    o.cancelled_at = Some(o.created_at + Duration::days(2));

    let banner = cancellation_banner(&o).expect("cancelled orders render a banner");
    assert_eq!(banner.cancelled_at, o.cancelled_at);

    assert!(cancellation_banner(&order(OrderStatus::Paid, PaymentMethod::Cheque)).is_none());
}

// ============================================================================
// Next Action Tests
// ============================================================================

#[test]
fn test_cod_pending_payment_waits_without_upload_prompt() {
    let action = next_customer_action(&order(
        OrderStatus::PendingPayment,
        PaymentMethod::CashOnDelivery,
    ));
    assert_eq!(action.action, Some(CustomerAction::Wait));
    assert!(!action.urgent);
    assert!(!action.message.to_lowercase().contains("upload"));
}

#[test]
fn test_prepaid_pending_payment_without_proof_demands_upload() {
    let action = next_customer_action(&order(
        OrderStatus::PendingPayment,
        PaymentMethod::BankTransfer,
    ));
    assert_eq!(action.action, Some(CustomerAction::UploadProof));
    assert!(action.urgent);
}

#[test]
fn test_prepaid_pending_payment_with_proof_awaits_verification() {
    let action = next_customer_action(&with_proof(order(
        OrderStatus::PendingPayment,
        PaymentMethod::BankTransfer,
    )));
    assert_eq!(action.action, Some(CustomerAction::Wait));
}

#[test]
fn test_dispatched_splits_on_method() {
    let cod = next_customer_action(&order(
        OrderStatus::Dispatched,
        PaymentMethod::CashOnDelivery,
    ));
    assert_eq!(cod.action, Some(CustomerAction::PreparePayment));
    assert_eq!(cod.amount, Some(1_875_000));

    let prepaid = next_customer_action(&order(OrderStatus::Dispatched, PaymentMethod::Cheque));
    assert_eq!(prepaid.action, Some(CustomerAction::Track));
    assert_eq!(prepaid.amount, None);
}

#[test]
fn test_next_action_is_total() {
    for status in ALL_STATUSES {
        for method in ALL_METHODS {
            for proof in [false, true] {
                let mut o = order(status, method);
                if proof {
                    o = with_proof(o);
                }
                // Every combination produces a result without panicking
                let _ = next_customer_action(&o);
            }
        }
    }
}

// ============================================================================
// Progress Tests
// ============================================================================

#[test]
fn test_progress_monotone_along_progression() {
    for method in ALL_METHODS {
        let progression = [
            OrderStatus::PendingPayment,
            OrderStatus::Paid,
            OrderStatus::Dispatched,
            OrderStatus::Delivered,
        ];
        let mut last = 0u8;
        for status in progression {
            let p = progress_percent(&order(status, method));
            assert!(p <= 100);
            assert!(p >= last, "{:?}/{:?} regressed", status, method);
            last = p;
        }
        assert_eq!(last, 100, "{:?} must reach 100 at delivery", method);
    }
}

#[test]
fn test_progress_terminal_values() {
    assert_eq!(
        progress_percent(&order(OrderStatus::Cancelled, PaymentMethod::BankTransfer)),
        0
    );
    assert_eq!(
        progress_percent(&order(OrderStatus::Delivered, PaymentMethod::CashOnDelivery)),
        100
    );
}

#[test]
fn test_proof_upload_advances_prepaid_progress() {
    let without = progress_percent(&order(
        OrderStatus::PendingPayment,
        PaymentMethod::BankTransfer,
    ));
    let with = progress_percent(&with_proof(order(
        OrderStatus::PendingPayment,
        PaymentMethod::BankTransfer,
    )));
    assert!(with > without);
}
