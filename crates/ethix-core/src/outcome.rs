//! # Payment Outcomes
//!
//! The terminal result of a submission and the caller's completion callbacks.
//! A [`Completion`] is consumed when an outcome is delivered, so a submission
//! can reach its callbacks at most once.

use crate::invoice::PaymentDetailsResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, caller-facing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Payment creation failed (HTTP status, malformed response, or transport)
    FetchFailed,
    /// An invoice status lookup failed
    PollFailed,
    /// The display surface was closed before the invoice was paid
    WebviewClosed,
    /// The attempt budget ran out; only reported when timeouts are configured
    /// to notify
    PollTimedOut,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::PollFailed => "POLL_FAILED",
            ErrorCode::WebviewClosed => "WEBVIEW_CLOSED",
            ErrorCode::PollTimedOut => "POLL_TIMED_OUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload handed to the failure callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code,
        }
    }

    pub fn webview_closed() -> Self {
        Self::new(
            ErrorCode::WebviewClosed,
            "WebView closed or payment not completed.",
        )
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code, self.message)
    }
}

/// Exactly one of these is produced per submission that reaches a callback
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Paid(Box<PaymentDetailsResponse>),
    Failed(ErrorResponse),
}

pub type SuccessCallback = Box<dyn FnOnce(PaymentDetailsResponse) + Send + 'static>;
pub type FailureCallback = Box<dyn FnOnce(ErrorResponse) + Send + 'static>;

/// Caller-supplied success/failure callbacks. Both are optional.
#[derive(Default)]
pub struct Completion {
    on_success: Option<SuccessCallback>,
    on_failure: Option<FailureCallback>,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the success callback
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PaymentDetailsResponse) + Send + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Builder: set the failure callback
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ErrorResponse) + Send + 'static,
    {
        self.on_failure = Some(Box::new(f));
        self
    }

    /// Invoke the callback matching `outcome` and drop the other one
    pub fn deliver(self, outcome: PaymentOutcome) {
        match outcome {
            PaymentOutcome::Paid(details) => {
                if let Some(f) = self.on_success {
                    f(*details);
                }
            }
            PaymentOutcome::Failed(error) => {
                if let Some(f) = self.on_failure {
                    f(error);
                }
            }
        }
    }

    pub fn succeed(self, details: PaymentDetailsResponse) {
        self.deliver(PaymentOutcome::Paid(Box::new(details)));
    }

    pub fn fail(self, error: ErrorResponse) {
        self.deliver(PaymentOutcome::Failed(error));
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::Invoice;
    use std::sync::{Arc, Mutex};

    fn paid_details() -> PaymentDetailsResponse {
        serde_json::from_value(serde_json::json!({
            "invoice": {"id": "inv", "status": "PAID"}
        }))
        .unwrap()
    }

    #[test]
    fn test_error_code_wire_names() {
        let response = ErrorResponse::new(ErrorCode::FetchFailed, "HTTP Error: 500");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"message": "HTTP Error: 500", "error_code": "FETCH_FAILED"})
        );
        assert_eq!(ErrorCode::WebviewClosed.to_string(), "WEBVIEW_CLOSED");
    }

    #[test]
    fn test_deliver_success_only_calls_success() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (ok_log, err_log) = (log.clone(), log.clone());

        Completion::new()
            .on_success(move |d| ok_log.lock().unwrap().push(format!("ok:{}", d.invoice.id)))
            .on_failure(move |e| err_log.lock().unwrap().push(format!("err:{}", e.error_code)))
            .succeed(paid_details());

        assert_eq!(*log.lock().unwrap(), vec!["ok:inv".to_string()]);
    }

    #[test]
    fn test_deliver_failure_only_calls_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (ok_log, err_log) = (log.clone(), log.clone());

        Completion::new()
            .on_success(move |_: PaymentDetailsResponse| ok_log.lock().unwrap().push("ok".to_string()))
            .on_failure(move |e| err_log.lock().unwrap().push(e.error_code.to_string()))
            .fail(ErrorResponse::webview_closed());

        assert_eq!(*log.lock().unwrap(), vec!["WEBVIEW_CLOSED".to_string()]);
    }

    #[test]
    fn test_missing_callbacks_are_ignored() {
        Completion::new().fail(ErrorResponse::new(ErrorCode::PollFailed, "boom"));
        Completion::new().deliver(PaymentOutcome::Paid(Box::new(PaymentDetailsResponse {
            invoice: Invoice {
                id: "x".into(),
                status: "PAID".into(),
                order_id: None,
                issuer_entity_id: None,
                currency: None,
                amount: None,
                remaining_amount: None,
                amount_paid: None,
                fees: None,
                remaining_fees: None,
                fees_paid: None,
                total: None,
                total_remaining: None,
                created_at: None,
            },
            order: None,
        })));
    }
}
