use std::sync::Arc;

use api::PaymentsApi;
use quiz_core::model::{
    FieldId, OrderId, OrderQr, PaymentAction, PaymentOrder, PendingPayment, Screenshot,
};

use crate::error::PaymentError;

/// The join-quiz payment flow and the admin review queue.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentsApi>,
}

impl PaymentService {
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentsApi>) -> Self {
        Self { payments }
    }

    /// Opens an order for a field and fetches its UPI QR in one go.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Api` on backend failure.
    pub async fn open_order(
        &self,
        field: &FieldId,
    ) -> Result<(PaymentOrder, OrderQr), PaymentError> {
        let order = self.payments.create_order(field).await?;
        let qr = self.payments.order_qr(&order.order_id).await?;
        Ok((order, qr))
    }

    /// Submits the bank UTR reference and optional proof screenshot.
    /// Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::EmptyUtr` for a blank reference and
    /// `PaymentError::Api` on backend failure.
    pub async fn submit_utr(
        &self,
        order: &OrderId,
        utr: &str,
        screenshot: Option<Screenshot>,
    ) -> Result<String, PaymentError> {
        let utr = utr.trim();
        if utr.is_empty() {
            return Err(PaymentError::EmptyUtr);
        }
        Ok(self.payments.submit_utr(order, utr, screenshot).await?)
    }

    /// Payments awaiting admin review.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Api` on backend failure.
    pub async fn pending(&self) -> Result<Vec<PendingPayment>, PaymentError> {
        Ok(self.payments.pending_payments().await?)
    }

    /// Approves or rejects a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Api` on backend failure.
    pub async fn review(&self, payment: &str, action: PaymentAction) -> Result<(), PaymentError> {
        Ok(self.payments.review_payment(payment, action).await?)
    }
}
