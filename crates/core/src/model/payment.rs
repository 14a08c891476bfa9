use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::OrderId;

/// A payment order opened for joining a paid quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: OrderId,
    /// Amount due, in whole rupees.
    pub amount: u32,
}

/// UPI collect details for an open order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQr {
    pub qr_data_url: String,
    pub upi_uri: String,
}

/// Verification status of a payment, as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Verified => write!(f, "verified"),
            PaymentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A payment awaiting admin review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    pub id: String,
    pub order_id: OrderId,
    pub amount: u32,
    pub utr: Option<String>,
    pub status: PaymentStatus,
}

/// Admin decision on a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    Approve,
    Reject,
}

impl PaymentAction {
    /// The action keyword the verify endpoint expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentAction::Approve => "approve",
            PaymentAction::Reject => "reject",
        }
    }
}

/// An uploaded payment-proof screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
