use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    FieldId, OrderId, OrderQr, PaymentAction, PaymentOrder, PaymentStatus, PendingPayment,
    Screenshot,
};

use crate::backend::PaymentsApi;
use crate::client::ApiError;
use crate::http::HttpBackend;

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

// The payments routes predate the rest of the backend and use snake_case
// keys; keep them as-is rather than normalizing.

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    quiz_id: &'a FieldId,
}

#[derive(Debug, Deserialize)]
struct OrderDto {
    order_id: String,
    amount: u32,
}

impl TryFrom<OrderDto> for PaymentOrder {
    type Error = ApiError;

    fn try_from(dto: OrderDto) -> Result<Self, Self::Error> {
        Ok(PaymentOrder {
            order_id: OrderId::new(dto.order_id).map_err(ApiError::decode)?,
            amount: dto.amount,
        })
    }
}

#[derive(Debug, Deserialize)]
struct QrDto {
    qr_data_url: String,
    upi_uri: String,
}

#[derive(Debug, Deserialize)]
struct UtrAckDto {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct PendingPaymentDto {
    #[serde(rename = "_id")]
    id: String,
    order_id: String,
    amount: u32,
    #[serde(default)]
    utr: Option<String>,
    status: PaymentStatus,
}

impl TryFrom<PendingPaymentDto> for PendingPayment {
    type Error = ApiError;

    fn try_from(dto: PendingPaymentDto) -> Result<Self, Self::Error> {
        Ok(PendingPayment {
            id: dto.id,
            order_id: OrderId::new(dto.order_id).map_err(ApiError::decode)?,
            amount: dto.amount,
            utr: dto.utr,
            status: dto.status,
        })
    }
}

#[derive(Debug, Serialize)]
struct ReviewBody {
    action: &'static str,
}

//
// ─── API ───────────────────────────────────────────────────────────────────────
//

#[async_trait]
impl PaymentsApi for HttpBackend {
    async fn create_order(&self, field: &FieldId) -> Result<PaymentOrder, ApiError> {
        let dto: OrderDto = self
            .client()
            .post_json("/payments/order", &CreateOrderBody { quiz_id: field })
            .await?;
        dto.try_into()
    }

    async fn order_qr(&self, order: &OrderId) -> Result<OrderQr, ApiError> {
        let dto: QrDto = self
            .client()
            .get_json(&format!("/payments/{order}/qr"))
            .await?;
        Ok(OrderQr {
            qr_data_url: dto.qr_data_url,
            upi_uri: dto.upi_uri,
        })
    }

    async fn submit_utr(
        &self,
        order: &OrderId,
        utr: &str,
        screenshot: Option<Screenshot>,
    ) -> Result<String, ApiError> {
        let mut form = Form::new().text("utr", utr.to_string());
        if let Some(screenshot) = screenshot {
            form = form.part(
                "screenshot",
                Part::bytes(screenshot.bytes).file_name(screenshot.file_name),
            );
        }
        let ack: UtrAckDto = self
            .client()
            .post_multipart(&format!("/payments/{order}/utr"), form)
            .await?;
        Ok(ack.message)
    }

    async fn pending_payments(&self) -> Result<Vec<PendingPayment>, ApiError> {
        let dtos: Vec<PendingPaymentDto> =
            self.client().get_json("/admin/payments/pending").await?;
        dtos.into_iter().map(PendingPayment::try_from).collect()
    }

    async fn review_payment(&self, payment: &str, action: PaymentAction) -> Result<(), ApiError> {
        self.client()
            .post_unit(
                &format!("/admin/payments/{payment}/verify"),
                &ReviewBody {
                    action: action.as_str(),
                },
            )
            .await
    }
}
