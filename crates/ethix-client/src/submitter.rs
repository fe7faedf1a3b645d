//! # Payment Submitter
//!
//! Posts the cart as a payment request, shows the hosted pay page and hands
//! the invoice to a background [`ResultPoller`].
//!
//! The cart is emptied before the network call, so a failed submission
//! loses its items. This matches the established client behavior.

use crate::api::SharedPaymentApi;
use crate::clock::SharedClock;
use crate::config::PollPolicy;
use crate::poller::{PollerState, ResultPoller};
use ethix_core::{
    Cart, Completion, Currency, Endpoints, ErrorCode, ErrorResponse, EthixError, InvoiceHandle,
    PaymentRequest, Rail, SharedSurface, SubmissionError,
};
use std::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info, instrument, Span};
use uuid::Uuid;

/// A submission that reached the poll stage
#[derive(Debug)]
pub struct PollTicket {
    /// Local correlation id, also recorded on the submission's log span
    pub submission_id: Uuid,
    pub order_id: String,
    pub invoice: InvoiceHandle,
    /// Hosted pay page shown on the surface
    pub pay_url: String,
    handle: JoinHandle<PollerState>,
}

impl PollTicket {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Wait for the poller to reach its terminal state
    pub async fn wait(self) -> Result<PollerState, EthixError> {
        self.handle
            .await
            .map_err(|e| EthixError::Internal(format!("poll task failed: {e}")))
    }
}

pub struct PaymentSubmitter {
    api: SharedPaymentApi,
    surface: SharedSurface,
    clock: SharedClock,
    endpoints: Endpoints,
    policy: PollPolicy,
}

impl PaymentSubmitter {
    pub fn new(
        api: SharedPaymentApi,
        surface: SharedSurface,
        clock: SharedClock,
        endpoints: Endpoints,
        policy: PollPolicy,
    ) -> Self {
        Self {
            api,
            surface,
            clock,
            endpoints,
            policy,
        }
    }

    /// Submit the cart and start polling. Resolves once the pay page is shown
    /// and the poller is spawned; the outcome arrives through `completion`.
    ///
    /// On error the failure callback has already been invoked with
    /// `FETCH_FAILED` and no poller was started.
    #[instrument(skip(self, cart, completion), fields(submission_id = tracing::field::Empty))]
    pub async fn submit(
        &self,
        cart: &Mutex<Cart>,
        rail: Rail,
        currency: Currency,
        completion: Completion,
    ) -> Result<PollTicket, SubmissionError> {
        let submission_id = Uuid::new_v4();
        Span::current().record("submission_id", tracing::field::display(submission_id));

        let request = {
            let mut cart = cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let request = PaymentRequest::build(rail, currency, &cart);
            cart.clear();
            request
        };

        info!(
            rail = %request.rail,
            currency = %request.currency,
            amount = %request.amount,
            items = request.cart.len(),
            "Creating payment request"
        );

        let response = match self.api.create_payment(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Payment creation failed: {}", e);
                completion.fail(ErrorResponse::new(ErrorCode::FetchFailed, e.to_string()));
                return Err(e);
            }
        };

        let invoice = response.invoice();
        let pay_url = self.endpoints.pay_page_for(&invoice);
        info!(order_id = %response.order_id, invoice_id = %invoice, "Payment created");

        self.surface.set_visible(true);
        self.surface.navigate_to(&pay_url);

        let poller = ResultPoller::new(
            self.api.clone(),
            self.surface.clone(),
            self.clock.clone(),
            invoice.clone(),
            self.policy,
            completion,
        );
        let handle = tokio::spawn(poller.run());

        Ok(PollTicket {
            submission_id,
            order_id: response.order_id,
            invoice,
            pay_url,
            handle,
        })
    }
}
