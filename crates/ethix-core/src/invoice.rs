//! # Invoice Types
//!
//! Responses from the payment-creation and result-lookup endpoints.

use serde::{Deserialize, Serialize};

/// Invoice status reported once the payment has settled
pub const PAID_STATUS: &str = "PAID";

/// Key used to poll for an invoice's status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceHandle {
    #[serde(rename = "id")]
    pub invoice_id: String,
}

impl InvoiceHandle {
    pub fn new(invoice_id: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
        }
    }
}

impl std::fmt::Display for InvoiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.invoice_id)
    }
}

/// Response of `POST <createPaymentUrl>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequestResponse {
    pub order_id: String,
    pub invoice_id: String,
    #[serde(default)]
    pub invoice_amount: Option<String>,
    #[serde(default)]
    pub invoice_currency: Option<String>,
}

impl PaymentRequestResponse {
    pub fn invoice(&self) -> InvoiceHandle {
        InvoiceHandle::new(&self.invoice_id)
    }
}

/// Remote invoice record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_fees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees_paid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_remaining: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == PAID_STATUS
    }
}

/// Order the invoice belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub fulfillment_game_user_id: serde_json::Value,
    #[serde(default)]
    pub fulfillment_entity_id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_entity_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_fees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Response of `POST <paymentResultUrl>`; the success callback receives it whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetailsResponse {
    pub invoice: Invoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

impl PaymentDetailsResponse {
    pub fn is_paid(&self) -> bool {
        self.invoice.is_paid()
    }
}
