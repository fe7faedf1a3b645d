//! # ethix-core
//!
//! Core types and traits for the ethix-checkout payment orchestrator.
//!
//! This crate provides:
//! - `Cart` and `CartItem` for line item accumulation
//! - `Rail` and `Currency` with their wire tags
//! - `PaymentRequest` built from a cart snapshot
//! - Invoice response types and `InvoiceHandle`
//! - `PaymentOutcome`, `ErrorResponse` and `Completion` callbacks
//! - `Environment` / `Endpoints` for sandbox and production
//! - `DisplaySurface` trait for the host's page renderer
//! - Typed errors
//!
//! No I/O happens here; see `ethix-client` for the async orchestrator.
//!
//! ## Example
//!
//! ```rust
//! use ethix_core::{Cart, Currency, PaymentRequest, Rail};
//!
//! let mut cart = Cart::new();
//! cart.add("Widget", 2, "10.00").unwrap();
//!
//! let request = PaymentRequest::build(Rail::AvaxC, Currency::USD, &cart);
//! assert_eq!(request.amount, "20.00");
//! ```

pub mod cart;
pub mod environment;
pub mod error;
pub mod invoice;
pub mod outcome;
pub mod rail;
pub mod request;
pub mod surface;

/// Version of the checkout SDK contract
pub const SDK_VERSION: &str = "1.0.0";

// Re-exports for convenience
pub use cart::{format_amount, Cart, CartItem};
pub use environment::{Endpoints, Environment};
pub use error::{CartError, EthixError, EthixResult, PollError, SubmissionError};
pub use invoice::{
    Invoice, InvoiceHandle, Order, PaymentDetailsResponse, PaymentRequestResponse, PAID_STATUS,
};
pub use outcome::{
    Completion, ErrorCode, ErrorResponse, FailureCallback, PaymentOutcome, SuccessCallback,
};
pub use rail::{Currency, Rail};
pub use request::PaymentRequest;
pub use surface::{
    DisplaySurface, HeadlessSurface, MessageData, MessageEvent, SessionToken, SharedSurface,
    SurfaceEvent,
};
