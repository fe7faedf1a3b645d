//! # Payment API Transport
//!
//! The two remote calls the orchestrator makes, behind a trait so the
//! submitter and poller can be driven by a scripted fake in tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             PaymentApi (trait)              │
//! │  ├── create_payment()   POST create         │
//! │  └── invoice_details()  POST result lookup  │
//! └─────────────────────────────────────────────┘
//!                      ▲
//!             ┌────────┴───────┐
//!             │ HttpPaymentApi │
//!             └────────────────┘
//! ```

use crate::config::EthixConfig;
use async_trait::async_trait;
use ethix_core::{
    Endpoints, InvoiceHandle, PaymentDetailsResponse, PaymentRequest, PaymentRequestResponse,
    PollError, SubmissionError,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Create a payment and obtain its order and invoice identifiers
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentRequestResponse, SubmissionError>;

    /// Look up the current status of an invoice
    async fn invoice_details(
        &self,
        invoice: &InvoiceHandle,
    ) -> Result<PaymentDetailsResponse, PollError>;
}

/// Type alias for a shared payment API (dynamic dispatch)
pub type SharedPaymentApi = Arc<dyn PaymentApi>;

/// reqwest-backed implementation of the payment API
pub struct HttpPaymentApi {
    client: Client,
    endpoints: Endpoints,
    api_key: String,
}

impl HttpPaymentApi {
    /// Create a transport for the config's active environment
    pub fn new(config: &EthixConfig) -> Result<Self, ethix_core::EthixError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                ethix_core::EthixError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoints: config.endpoints(),
            api_key: config.api_key().to_string(),
        })
    }
}

#[async_trait]
impl PaymentApi for HttpPaymentApi {
    #[instrument(skip(self, request), fields(rail = %request.rail, amount = %request.amount))]
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentRequestResponse, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoints.create_payment_url)
            .header("X-Api-Key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("Payment API error: status={}, body={}", status, body);
            return Err(SubmissionError::HttpStatus(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Unexpected payment creation response: {}", body);
            SubmissionError::Parse(e.to_string())
        })
    }

    #[instrument(skip(self), fields(invoice_id = %invoice.invoice_id))]
    async fn invoice_details(
        &self,
        invoice: &InvoiceHandle,
    ) -> Result<PaymentDetailsResponse, PollError> {
        let response = self
            .client
            .post(&self.endpoints.payment_result_url)
            .json(invoice)
            .send()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("Invoice lookup error: status={}, body={}", status, body);
            return Err(PollError::HttpStatus(status.as_u16()));
        }

        let details: PaymentDetailsResponse =
            serde_json::from_str(&body).map_err(|e| PollError::Parse(e.to_string()))?;
        debug!(status = %details.invoice.status, "Invoice details received");
        Ok(details)
    }
}
