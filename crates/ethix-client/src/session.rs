//! # Checkout Session
//!
//! The object a host application constructs once and shares with every call
//! site. It owns the cart, the login state, and the submitter.

use crate::api::{HttpPaymentApi, SharedPaymentApi};
use crate::clock::{SharedClock, TokioClock};
use crate::config::EthixConfig;
use crate::login::{LoginChannel, LoginSession};
use crate::submitter::{PaymentSubmitter, PollTicket};
use ethix_core::{
    Cart, CartError, Completion, Currency, EthixResult, Rail, SessionToken, SharedSurface,
};
use std::sync::{Arc, Mutex};
use tokio::task::AbortHandle;
use tracing::{info, instrument, warn};

pub struct EthixSession {
    config: EthixConfig,
    cart: Mutex<Cart>,
    submitter: PaymentSubmitter,
    login: LoginSession,
    last_poll: Mutex<Option<AbortHandle>>,
}

impl EthixSession {
    /// Session talking to the real payment API for the configured environment
    pub fn new(config: EthixConfig, surface: SharedSurface) -> EthixResult<Self> {
        let api = Arc::new(HttpPaymentApi::new(&config)?);
        Ok(Self::with_parts(config, api, surface, Arc::new(TokioClock)))
    }

    /// Session with injected transport and clock
    pub fn with_parts(
        config: EthixConfig,
        api: SharedPaymentApi,
        surface: SharedSurface,
        clock: SharedClock,
    ) -> Self {
        let endpoints = config.endpoints();
        info!(
            environment = %config.environment,
            third_party_id = %config.third_party_id,
            sdk_version = ethix_core::SDK_VERSION,
            "Checkout session created"
        );

        Self {
            login: LoginSession::new(surface.clone(), endpoints.login_url.clone()),
            submitter: PaymentSubmitter::new(api, surface, clock, endpoints, config.poll),
            cart: Mutex::new(Cart::new()),
            last_poll: Mutex::new(None),
            config,
        }
    }

    pub fn config(&self) -> &EthixConfig {
        &self.config
    }

    /// Append a product; `price` is the unit price as a decimal string
    pub fn add_product_to_cart(
        &self,
        name: impl Into<String>,
        quantity: u32,
        price: impl Into<String>,
    ) -> Result<(), CartError> {
        self.lock_cart().add(name, quantity, price)
    }

    pub fn clear_cart(&self) {
        self.lock_cart().clear();
    }

    /// Copy of the current cart
    pub fn cart(&self) -> Cart {
        self.lock_cart().clone()
    }

    /// Current cart total, formatted to two decimals
    pub fn cart_total(&self) -> String {
        self.lock_cart().compute_total()
    }

    /// Submit the cart and start polling for the result.
    ///
    /// Failures are reported only through `completion`; `None` means the
    /// failure callback already ran with `FETCH_FAILED`. The cart is cleared
    /// either way.
    #[instrument(skip(self, completion))]
    pub async fn create_payment(
        &self,
        rail: Rail,
        currency: Currency,
        completion: Completion,
    ) -> Option<PollTicket> {
        if self.poll_in_flight() {
            warn!("A previous payment is still being polled; both pollers will share the surface");
        }

        let ticket = self
            .submitter
            .submit(&self.cart, rail, currency, completion)
            .await
            .ok()?;

        *self
            .last_poll
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(ticket.abort_handle());
        Some(ticket)
    }

    /// Show the login page and start capturing the player token
    pub fn do_login(&self) -> LoginChannel {
        self.login.login()
    }

    /// Most recently captured player token
    pub fn player_token(&self) -> Option<String> {
        self.login.token().map(|token| token.value)
    }

    /// The current player token, or the next one to arrive
    pub async fn wait_for_token(&self) -> Option<SessionToken> {
        self.login.wait_for_token().await
    }

    /// Remove the login listeners
    pub fn teardown(&self) {
        self.login.teardown();
    }

    fn poll_in_flight(&self) -> bool {
        self.last_poll
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|poll| !poll.is_finished())
    }

    fn lock_cart(&self) -> std::sync::MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
