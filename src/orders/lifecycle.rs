//! Order Lifecycle Engine
//!
//! Pure, synchronous derivation of UI-ready facts from an order snapshot:
//! payment-method classification, status presentation, the customer's next
//! action, and progress percentage. The same raw status means different
//! things depending on whether the buyer pays on delivery or prepays, so
//! every derivation here is keyed on `(OrderStatus, MethodClass)`.
//!
//! The engine is total over the enumerated domain: unrecognized values from
//! the server fall back to the earliest in-progress rendering rather than
//! failing, since this is presentation code downstream of a trusted but
//! evolving contract.

use serde::Serialize;

use super::model::{Order, OrderStatus, PaymentMethod, PaymentStatus};

// ============================================================================
// Progress Milestones
// ============================================================================

/// Progress for a cash-on-delivery order: placed → confirmed → dispatched
const COD_PROGRESS_CONFIRMED: u8 = 40;
const COD_PROGRESS_DISPATCHED: u8 = 70;

/// Progress for a prepaid order: placed → proof uploaded → verified → dispatched
const PREPAID_PROGRESS_PLACED: u8 = 20;
const PREPAID_PROGRESS_PROOF_UPLOADED: u8 = 30;
const PREPAID_PROGRESS_PAYMENT_CONFIRMED: u8 = 50;
const PREPAID_PROGRESS_DISPATCHED: u8 = 75;

/// Fallback for unrecognized states
const PROGRESS_FALLBACK: u8 = 20;

const PROGRESS_COMPLETE: u8 = 100;

// ============================================================================
// Payment Method Classification
// ============================================================================

/// Payment methods split into two mutually exclusive classes that drive all
/// lifecycle presentation
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MethodClass {
    CashOnDelivery,
    Prepaid,
}

impl PaymentMethod {
    /// Classify the method. Unrecognized methods are treated as prepaid,
    /// which is the stricter rendering (payment must be evidenced).
    pub fn classification(&self) -> MethodClass {
        match self {
            PaymentMethod::CashOnDelivery => MethodClass::CashOnDelivery,
            PaymentMethod::BankTransfer | PaymentMethod::Cheque | PaymentMethod::Unknown => {
                MethodClass::Prepaid
            }
        }
    }

    pub fn is_cash_on_delivery(&self) -> bool {
        self.classification() == MethodClass::CashOnDelivery
    }

    pub fn is_prepaid(&self) -> bool {
        self.classification() == MethodClass::Prepaid
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cheque => "Cheque Payment",
            PaymentMethod::Unknown => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "💵",
            PaymentMethod::BankTransfer => "🏦",
            PaymentMethod::Cheque => "📝",
            PaymentMethod::Unknown => "💳",
        }
    }
}

// ============================================================================
// Status Presentation
// ============================================================================

/// UI-ready rendering of a status value
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub label: &'static str,
    pub color_class: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// Prompt shown when the buyer must act to move the order forward
    pub action_hint: Option<&'static str>,
}

/// Describe an order status for display.
///
/// `PENDING_PAYMENT` and `PAID` read differently per method class: a
/// cash-on-delivery order needs no upfront payment, so "pending payment" is
/// really "confirmed", while a prepaid order is blocked on the buyer's proof
/// upload.
pub fn describe_status(status: OrderStatus, method: PaymentMethod) -> StatusPresentation {
    match (status, method.classification()) {
        (OrderStatus::PendingPayment, MethodClass::CashOnDelivery) => StatusPresentation {
            label: "Order Confirmed",
            color_class: "bg-blue-100 text-blue-800 border-blue-300",
            icon: "✓",
            description: "Order confirmed and ready for processing",
            action_hint: None,
        },
        (OrderStatus::PendingPayment, MethodClass::Prepaid) => StatusPresentation {
            label: "Pending Payment",
            color_class: "bg-yellow-100 text-yellow-800 border-yellow-300",
            icon: "⏳",
            description: "Awaiting payment confirmation",
            action_hint: Some("Upload payment proof to proceed"),
        },
        (OrderStatus::Paid, MethodClass::CashOnDelivery) => StatusPresentation {
            label: "Processing",
            color_class: "bg-green-100 text-green-800 border-green-300",
            icon: "📦",
            description: "Order being prepared for shipment",
            action_hint: None,
        },
        (OrderStatus::Paid, MethodClass::Prepaid) => StatusPresentation {
            label: "Payment Confirmed",
            color_class: "bg-green-100 text-green-800 border-green-300",
            icon: "💳",
            description: "Payment verified, preparing for shipment",
            action_hint: None,
        },
        (OrderStatus::Dispatched, MethodClass::CashOnDelivery) => StatusPresentation {
            label: "Dispatched",
            color_class: "bg-purple-100 text-purple-800 border-purple-300",
            icon: "🚚",
            description: "On the way - Payment due on delivery",
            action_hint: None,
        },
        (OrderStatus::Dispatched, MethodClass::Prepaid) => StatusPresentation {
            label: "Dispatched",
            color_class: "bg-purple-100 text-purple-800 border-purple-300",
            icon: "🚚",
            description: "Order shipped and on its way",
            action_hint: None,
        },
        (OrderStatus::Delivered, _) => StatusPresentation {
            label: "Delivered",
            color_class: "bg-green-100 text-green-800 border-green-300",
            icon: "✓",
            description: "Order delivered successfully",
            action_hint: None,
        },
        (OrderStatus::Cancelled, _) => StatusPresentation {
            label: "Cancelled",
            color_class: "bg-red-100 text-red-800 border-red-300",
            icon: "✕",
            description: "Order has been cancelled",
            action_hint: None,
        },
        // Unknown status renders as the earliest in-progress state
        (OrderStatus::Unknown, class) => {
            let fallback_method = match class {
                MethodClass::CashOnDelivery => PaymentMethod::CashOnDelivery,
                MethodClass::Prepaid => PaymentMethod::BankTransfer,
            };
            describe_status(OrderStatus::PendingPayment, fallback_method)
        }
    }
}

/// Describe the payment status axis for display. Cash-on-delivery orders
/// collect payment at the door, so "pending" is the expected state there,
/// not a warning.
pub fn describe_payment_status(
    payment_status: PaymentStatus,
    method: PaymentMethod,
) -> StatusPresentation {
    match (payment_status, method.classification()) {
        (PaymentStatus::Pending, MethodClass::CashOnDelivery) => StatusPresentation {
            label: "Pay on Delivery",
            color_class: "bg-orange-100 text-orange-800 border-orange-300",
            icon: "💵",
            description: "Payment will be collected upon delivery",
            action_hint: None,
        },
        (PaymentStatus::Paid, MethodClass::CashOnDelivery) => StatusPresentation {
            label: "Payment Collected",
            color_class: "bg-green-100 text-green-800 border-green-300",
            icon: "✓",
            description: "Payment received on delivery",
            action_hint: None,
        },
        (PaymentStatus::Failed, MethodClass::CashOnDelivery) => StatusPresentation {
            label: "Payment Failed",
            color_class: "bg-red-100 text-red-800 border-red-300",
            icon: "✕",
            description: "Payment not collected",
            action_hint: None,
        },
        (PaymentStatus::Pending, MethodClass::Prepaid) => StatusPresentation {
            label: "Payment Pending",
            color_class: "bg-yellow-100 text-yellow-800 border-yellow-300",
            icon: "⏳",
            description: "Awaiting payment proof upload",
            action_hint: Some("Upload payment proof to proceed"),
        },
        (PaymentStatus::Paid, MethodClass::Prepaid) => StatusPresentation {
            label: "Payment Verified",
            color_class: "bg-green-100 text-green-800 border-green-300",
            icon: "✓",
            description: "Payment confirmed by admin",
            action_hint: None,
        },
        (PaymentStatus::Failed, MethodClass::Prepaid) => StatusPresentation {
            label: "Payment Verification Failed",
            color_class: "bg-red-100 text-red-800 border-red-300",
            icon: "✕",
            description: "Payment proof rejected",
            action_hint: None,
        },
        (PaymentStatus::Unknown, _) => describe_payment_status(PaymentStatus::Pending, method),
    }
}

// ============================================================================
// Next Customer Action
// ============================================================================

/// What the buyer can do next for a given order
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomerAction {
    Reorder,
    PreparePayment,
    Track,
    Wait,
    UploadProof,
}

impl CustomerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerAction::Reorder => "reorder",
            CustomerAction::PreparePayment => "prepare_payment",
            CustomerAction::Track => "track",
            CustomerAction::Wait => "wait",
            CustomerAction::UploadProof => "upload_proof",
        }
    }
}

/// The next action prompt for the buyer
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NextAction {
    pub action: Option<CustomerAction>,
    pub message: &'static str,
    pub urgent: bool,
    /// Amount to keep ready, attached for cash-on-delivery dispatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

impl NextAction {
    fn none(message: &'static str) -> Self {
        Self {
            action: None,
            message,
            urgent: false,
            amount: None,
        }
    }

    fn new(action: CustomerAction, message: &'static str) -> Self {
        Self {
            action: Some(action),
            message,
            urgent: false,
            amount: None,
        }
    }
}

/// Derive the buyer's next action. Terminal states take precedence, then
/// dispatch, then the payment-method split on pending payment. Total over
/// the declared domain; unmatched combinations return no action.
pub fn next_customer_action(order: &Order) -> NextAction {
    let class = order.payment_method.classification();

    match order.status {
        OrderStatus::Cancelled => NextAction::none("Order has been cancelled"),
        OrderStatus::Delivered => NextAction::new(
            CustomerAction::Reorder,
            "Order completed. Want to order again?",
        ),
        OrderStatus::Dispatched => match class {
            MethodClass::CashOnDelivery => NextAction {
                action: Some(CustomerAction::PreparePayment),
                message: "Keep exact amount ready for delivery",
                urgent: false,
                amount: Some(order.total),
            },
            MethodClass::Prepaid => {
                NextAction::new(CustomerAction::Track, "Track your order delivery")
            }
        },
        OrderStatus::Paid => NextAction::new(
            CustomerAction::Wait,
            "Order is being prepared for shipment",
        ),
        OrderStatus::PendingPayment => match class {
            MethodClass::CashOnDelivery => NextAction::new(
                CustomerAction::Wait,
                "Order confirmed. We will dispatch soon",
            ),
            MethodClass::Prepaid => {
                if order.payment_proof_url.is_none() {
                    NextAction {
                        action: Some(CustomerAction::UploadProof),
                        message: "Upload payment proof to proceed",
                        urgent: true,
                        amount: None,
                    }
                } else {
                    NextAction::new(
                        CustomerAction::Wait,
                        "Payment proof uploaded. Awaiting verification",
                    )
                }
            }
        },
        OrderStatus::Unknown => NextAction::none(""),
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Progress through the order lifecycle as a percentage in [0, 100].
///
/// Monotone along each method's canonical progression; the exact weights are
/// a presentation choice.
pub fn progress_percent(order: &Order) -> u8 {
    match order.status {
        OrderStatus::Cancelled => return 0,
        OrderStatus::Delivered => return PROGRESS_COMPLETE,
        _ => {}
    }

    match order.payment_method.classification() {
        MethodClass::CashOnDelivery => match order.status {
            // No upfront payment: a pending-payment COD order is already confirmed
            OrderStatus::PendingPayment | OrderStatus::Paid => COD_PROGRESS_CONFIRMED,
            OrderStatus::Dispatched => COD_PROGRESS_DISPATCHED,
            _ => PROGRESS_FALLBACK,
        },
        MethodClass::Prepaid => match order.status {
            OrderStatus::PendingPayment => {
                if order.payment_proof_url.is_some() {
                    PREPAID_PROGRESS_PROOF_UPLOADED
                } else {
                    PREPAID_PROGRESS_PLACED
                }
            }
            OrderStatus::Paid => PREPAID_PROGRESS_PAYMENT_CONFIRMED,
            OrderStatus::Dispatched => PREPAID_PROGRESS_DISPATCHED,
            _ => PROGRESS_FALLBACK,
        },
    }
}
