//! # Result Poller
//!
//! Drives one invoice to a single terminal outcome.
//!
//! ```text
//!                 ┌─────────┐  invoice.status == PAID      ┌───────────┐
//!        ┌───────►│ Polling │─────────────────────────────►│   Paid    │
//!        │        └────┬────┘                              └───────────┘
//!  sleep(interval)     │  surface hidden, not paid         ┌───────────┐
//!        │             ├──────────────────────────────────►│ Cancelled │
//!        │             │  lookup error / non-2xx           ┌───────────────┐
//!        │             ├──────────────────────────────────►│ NetworkFailed │
//!        │             │  attempts exhausted               ┌───────────┐
//!        └─────────────┴──────────────────────────────────►│ TimedOut  │
//!                                                          └───────────┘
//! ```
//!
//! Each call to [`ResultPoller::step`] performs at most one lookup, so the
//! machine can be advanced tick by tick; [`ResultPoller::run`] interleaves
//! steps with the injected [`Clock`](crate::clock::Clock).

use crate::api::SharedPaymentApi;
use crate::clock::SharedClock;
use crate::config::{PollPolicy, TimeoutBehavior};
use ethix_core::{
    Completion, ErrorCode, ErrorResponse, InvoiceHandle, PaymentOutcome, SharedSurface,
};
use tracing::{debug, error, info, instrument, warn};

/// Poller lifecycle. Every state except `Polling` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Polling,
    Paid,
    Cancelled,
    NetworkFailed,
    TimedOut,
}

impl PollerState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollerState::Polling)
    }
}

pub struct ResultPoller {
    api: SharedPaymentApi,
    surface: SharedSurface,
    clock: SharedClock,
    invoice: InvoiceHandle,
    policy: PollPolicy,
    state: PollerState,
    attempts: u32,
    completion: Option<Completion>,
}

impl ResultPoller {
    pub fn new(
        api: SharedPaymentApi,
        surface: SharedSurface,
        clock: SharedClock,
        invoice: InvoiceHandle,
        policy: PollPolicy,
        completion: Completion,
    ) -> Self {
        Self {
            api,
            surface,
            clock,
            invoice,
            policy,
            state: PollerState::Polling,
            attempts: 0,
            completion: Some(completion),
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Lookups performed so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn invoice(&self) -> &InvoiceHandle {
        &self.invoice
    }

    /// Advance the machine by one tick. A terminal poller is left untouched.
    #[instrument(skip(self), fields(invoice_id = %self.invoice.invoice_id, attempt = self.attempts + 1))]
    pub async fn step(&mut self) -> PollerState {
        if self.state.is_terminal() {
            return self.state;
        }

        if self.attempts >= self.policy.max_attempts {
            self.time_out();
            return self.state;
        }

        self.attempts += 1;
        debug!("Polling invoice status");

        match self.api.invoice_details(&self.invoice).await {
            Err(e) => {
                error!("Polling failed: {}", e);
                self.finish(
                    PollerState::NetworkFailed,
                    PaymentOutcome::Failed(ErrorResponse::new(ErrorCode::PollFailed, e.to_string())),
                );
            }
            Ok(details) if details.is_paid() => {
                info!("Payment completed: {}", details.invoice.id);
                if self.surface.is_visible() {
                    self.surface.set_visible(false);
                }
                self.finish(PollerState::Paid, PaymentOutcome::Paid(Box::new(details)));
            }
            Ok(_) if !self.surface.is_visible() => {
                info!("Surface closed before payment completed");
                self.finish(
                    PollerState::Cancelled,
                    PaymentOutcome::Failed(ErrorResponse::webview_closed()),
                );
            }
            Ok(details) => {
                debug!(status = %details.invoice.status, "Invoice not settled yet");
            }
        }

        self.state
    }

    /// Step until a terminal state, sleeping `policy.interval` between attempts
    pub async fn run(mut self) -> PollerState {
        loop {
            let state = self.step().await;
            if state.is_terminal() {
                return state;
            }
            self.clock.sleep(self.policy.interval).await;
        }
    }

    fn time_out(&mut self) {
        warn!(
            invoice_id = %self.invoice.invoice_id,
            attempts = self.attempts,
            "Gave up polling without a terminal invoice status"
        );
        self.state = PollerState::TimedOut;
        let completion = self.completion.take();
        if let (TimeoutBehavior::NotifyFailure, Some(completion)) = (self.policy.on_timeout, completion) {
            completion.fail(ErrorResponse::new(
                ErrorCode::PollTimedOut,
                format!("Payment not completed after {} attempts", self.attempts),
            ));
        }
    }

    fn finish(&mut self, state: PollerState, outcome: PaymentOutcome) {
        self.state = state;
        if let Some(completion) = self.completion.take() {
            completion.deliver(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{recording_completion, pending, paid, RecordingClock, ScriptedApi};
    use ethix_core::{DisplaySurface, HeadlessSurface, PollError};
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        api: Arc<ScriptedApi>,
        surface: Arc<HeadlessSurface>,
        clock: Arc<RecordingClock>,
    }

    impl Harness {
        fn new(api: ScriptedApi) -> Self {
            let surface = Arc::new(HeadlessSurface::new());
            surface.set_visible(true);
            Self {
                api: Arc::new(api),
                surface,
                clock: Arc::new(RecordingClock::default()),
            }
        }

        fn poller(&self, policy: PollPolicy, completion: Completion) -> ResultPoller {
            ResultPoller::new(
                self.api.clone(),
                self.surface.clone(),
                self.clock.clone(),
                InvoiceHandle::new("inv_1"),
                policy,
                completion,
            )
        }
    }

    #[tokio::test]
    async fn test_paid_on_third_attempt() {
        let h = Harness::new(ScriptedApi::new().details(vec![Ok(pending()), Ok(pending()), Ok(paid())]));
        let (completion, outcomes) = recording_completion();

        let state = h.poller(PollPolicy::default(), completion).run().await;

        assert_eq!(state, PollerState::Paid);
        assert_eq!(h.api.detail_calls(), 3);
        assert_eq!(h.clock.sleeps(), vec![Duration::from_secs(5); 2]);
        let outcomes = outcomes.lock().unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(&outcomes[0], PaymentOutcome::Paid(d) if d.invoice.id == "inv_1"));
        // surface hidden once paid
        assert!(!h.surface.is_visible());
    }

    #[tokio::test]
    async fn test_surface_closed_cancels() {
        let h = Harness::new(ScriptedApi::new().details(vec![Ok(pending()), Ok(pending())]));
        let (completion, outcomes) = recording_completion();
        let mut poller = h.poller(PollPolicy::default(), completion);

        assert_eq!(poller.step().await, PollerState::Polling);
        h.surface.close();
        assert_eq!(poller.step().await, PollerState::Cancelled);
        // terminal: further ticks do nothing
        assert_eq!(poller.step().await, PollerState::Cancelled);

        assert_eq!(h.api.detail_calls(), 2);
        let outcomes = outcomes.lock().unwrap();
        assert_eq!(
            *outcomes,
            vec![PaymentOutcome::Failed(ErrorResponse::webview_closed())]
        );
    }

    #[tokio::test]
    async fn test_paid_wins_over_closed_surface() {
        let h = Harness::new(ScriptedApi::new().details(vec![Ok(paid())]));
        h.surface.close();
        let (completion, outcomes) = recording_completion();

        let state = h.poller(PollPolicy::default(), completion).run().await;

        assert_eq!(state, PollerState::Paid);
        assert!(matches!(outcomes.lock().unwrap()[0], PaymentOutcome::Paid(_)));
    }

    #[tokio::test]
    async fn test_single_lookup_failure_aborts() {
        let h = Harness::new(ScriptedApi::new().details(vec![
            Ok(pending()),
            Err(PollError::HttpStatus(502)),
            Ok(paid()),
        ]));
        let (completion, outcomes) = recording_completion();

        let state = h.poller(PollPolicy::default(), completion).run().await;

        assert_eq!(state, PollerState::NetworkFailed);
        assert_eq!(h.api.detail_calls(), 2);
        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![PaymentOutcome::Failed(ErrorResponse::new(
                ErrorCode::PollFailed,
                "Poll Error: 502"
            ))]
        );
    }

    #[tokio::test]
    async fn test_timeout_is_silent_by_default() {
        let h = Harness::new(ScriptedApi::new());
        let (completion, outcomes) = recording_completion();

        let state = h.poller(PollPolicy::default(), completion).run().await;

        assert_eq!(state, PollerState::TimedOut);
        assert_eq!(h.api.detail_calls(), 36);
        assert_eq!(h.clock.sleeps().len(), 36);
        assert!(outcomes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_can_notify() {
        let h = Harness::new(ScriptedApi::new());
        let (completion, outcomes) = recording_completion();
        let policy = PollPolicy {
            interval: Duration::from_millis(10),
            max_attempts: 3,
            on_timeout: TimeoutBehavior::NotifyFailure,
        };

        let state = h.poller(policy, completion).run().await;

        assert_eq!(state, PollerState::TimedOut);
        assert_eq!(h.api.detail_calls(), 3);
        let outcomes = outcomes.lock().unwrap();
        assert!(matches!(
            &outcomes[..],
            [PaymentOutcome::Failed(e)] if e.error_code == ErrorCode::PollTimedOut
        ));
    }
}
