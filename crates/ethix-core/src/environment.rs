//! # Environments
//!
//! Sandbox and production share the same wire contract and differ only in
//! base URLs and API key.

use crate::invoice::InvoiceHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Active payment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    /// Default endpoints for this environment
    pub fn endpoints(&self) -> Endpoints {
        match self {
            Environment::Sandbox => Endpoints {
                login_url: "https://sandbox-login.3thix.com/".to_string(),
                create_payment_url: "https://sandbox-api.3thix.com/order/payment/create"
                    .to_string(),
                pay_page_url: "https://sandbox-pay.3thix.com/?invoiceId=".to_string(),
                payment_result_url: "https://sandbox-api.3thix.com/invoice/details/get"
                    .to_string(),
            },
            Environment::Production => Endpoints {
                login_url: "https://login.3thix.com/".to_string(),
                create_payment_url: "https://api.3thix.com/order/payment/create".to_string(),
                pay_page_url: "https://pay.3thix.com/?invoiceId=".to_string(),
                payment_result_url: "https://api.3thix.com/invoice/details/get".to_string(),
            },
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Sandbox
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// URLs of the hosted pages and API endpoints for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Hosted login page
    pub login_url: String,
    /// `POST` target for payment creation
    pub create_payment_url: String,
    /// Hosted pay page prefix; the invoice id is appended verbatim
    pub pay_page_url: String,
    /// `POST` target for invoice status lookup
    pub payment_result_url: String,
}

impl Endpoints {
    /// Endpoints rooted at a single base URL (mock servers, proxies)
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            login_url: format!("{base}/login/"),
            create_payment_url: format!("{base}/order/payment/create"),
            pay_page_url: format!("{base}/pay/?invoiceId="),
            payment_result_url: format!("{base}/invoice/details/get"),
        }
    }

    /// Hosted pay page for an invoice
    pub fn pay_page_for(&self, invoice: &InvoiceHandle) -> String {
        format!("{}{}", self.pay_page_url, invoice.invoice_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Environment::default().endpoints()
    }
}
