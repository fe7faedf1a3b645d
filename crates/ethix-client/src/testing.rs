//! Scripted doubles shared by the unit tests.

use crate::api::PaymentApi;
use crate::clock::Clock;
use async_trait::async_trait;
use ethix_core::{
    Completion, InvoiceHandle, PaymentDetailsResponse, PaymentOutcome, PaymentRequest,
    PaymentRequestResponse, PollError, SubmissionError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn details(status: &str) -> PaymentDetailsResponse {
    serde_json::from_value(serde_json::json!({
        "invoice": {"id": "inv_1", "status": status},
        "order": {"id": "ord_1"}
    }))
    .unwrap()
}

pub fn paid() -> PaymentDetailsResponse {
    details("PAID")
}

pub fn pending() -> PaymentDetailsResponse {
    details("PENDING")
}

pub fn created(invoice_id: &str) -> PaymentRequestResponse {
    PaymentRequestResponse {
        order_id: "ord_1".to_string(),
        invoice_id: invoice_id.to_string(),
        invoice_amount: None,
        invoice_currency: None,
    }
}

/// Completion that records every delivered outcome
pub fn recording_completion() -> (Completion, Arc<Mutex<Vec<PaymentOutcome>>>) {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let (ok, err) = (outcomes.clone(), outcomes.clone());
    let completion = Completion::new()
        .on_success(move |d| ok.lock().unwrap().push(PaymentOutcome::Paid(Box::new(d))))
        .on_failure(move |e| err.lock().unwrap().push(PaymentOutcome::Failed(e)));
    (completion, outcomes)
}

/// Payment API answering from queued responses. Once the detail queue is
/// drained every lookup reports a pending invoice.
#[derive(Default)]
pub struct ScriptedApi {
    created: Mutex<VecDeque<Result<PaymentRequestResponse, SubmissionError>>>,
    details: Mutex<VecDeque<Result<PaymentDetailsResponse, PollError>>>,
    requests: Mutex<Vec<PaymentRequest>>,
    detail_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(self, response: Result<PaymentRequestResponse, SubmissionError>) -> Self {
        self.created.lock().unwrap().push_back(response);
        self
    }

    pub fn details(self, responses: Vec<Result<PaymentDetailsResponse, PollError>>) -> Self {
        self.details.lock().unwrap().extend(responses);
        self
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentApi for ScriptedApi {
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentRequestResponse, SubmissionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.created
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(created("inv_1")))
    }

    async fn invoice_details(
        &self,
        _invoice: &InvoiceHandle,
    ) -> Result<PaymentDetailsResponse, PollError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(pending()))
    }
}

/// Clock that returns immediately and records requested sleeps
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}
