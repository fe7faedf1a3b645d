//! # ethix-client
//!
//! Async checkout orchestrator for the hosted payment processor.
//!
//! The lifecycle of one payment:
//!
//! ```text
//! login ──► cart ──► PaymentRequest ──► POST create ──► pay page on surface
//!                                                          │
//!                                   ResultPoller ◄─────────┘
//!                                        │
//!                     Paid / Cancelled / NetworkFailed / TimedOut
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ethix_client::{EthixConfig, EthixSession};
//! use ethix_core::{Completion, Currency, HeadlessSurface, Rail};
//! use std::sync::Arc;
//!
//! let session = EthixSession::new(EthixConfig::from_env()?, Arc::new(HeadlessSurface::new()))?;
//!
//! session.add_product_to_cart("Gold Pack", 1, "4.99")?;
//!
//! let completion = Completion::new()
//!     .on_success(|details| println!("paid invoice {}", details.invoice.id))
//!     .on_failure(|err| eprintln!("payment failed: {err}"));
//!
//! if let Some(ticket) = session.create_payment(Rail::AvaxC, Currency::USD, completion).await {
//!     println!("pay at {}", ticket.pay_url);
//! }
//! ```

pub mod api;
pub mod clock;
pub mod config;
pub mod login;
pub mod poller;
pub mod session;
pub mod submitter;

#[cfg(test)]
mod testing;

// Re-exports
pub use api::{HttpPaymentApi, PaymentApi, SharedPaymentApi};
pub use clock::{Clock, SharedClock, TokioClock};
pub use config::{EthixConfig, PollPolicy, TimeoutBehavior};
pub use login::{LoginChannel, LoginSession};
pub use poller::{PollerState, ResultPoller};
pub use session::EthixSession;
pub use submitter::{PaymentSubmitter, PollTicket};
