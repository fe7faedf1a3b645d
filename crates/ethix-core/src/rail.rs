//! # Rails and Currencies
//!
//! Payment networks and settlement currencies accepted by the payment API.
//! The wire tags are part of the external contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment network/channel selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rail {
    CreditCard,
    Ach,
    Kakaopay,
    Ethereum,
    Polygon,
    /// Avalanche C-chain; the only rail whose wire tag is hyphenated
    #[serde(rename = "AVAX-C")]
    AvaxC,
    Telos,
    Arbitrum,
    BnbChain,
    Skale,
    Paytm,
    Paynow,
    Konbini,
    Aupay,
    Sei,
    Solana,
}

impl Rail {
    pub const ALL: [Rail; 16] = [
        Rail::CreditCard,
        Rail::Ach,
        Rail::Kakaopay,
        Rail::Ethereum,
        Rail::Polygon,
        Rail::AvaxC,
        Rail::Telos,
        Rail::Arbitrum,
        Rail::BnbChain,
        Rail::Skale,
        Rail::Paytm,
        Rail::Paynow,
        Rail::Konbini,
        Rail::Aupay,
        Rail::Sei,
        Rail::Solana,
    ];

    /// Canonical wire-format tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Rail::CreditCard => "CREDIT_CARD",
            Rail::Ach => "ACH",
            Rail::Kakaopay => "KAKAOPAY",
            Rail::Ethereum => "ETHEREUM",
            Rail::Polygon => "POLYGON",
            Rail::AvaxC => "AVAX-C",
            Rail::Telos => "TELOS",
            Rail::Arbitrum => "ARBITRUM",
            Rail::BnbChain => "BNB_CHAIN",
            Rail::Skale => "SKALE",
            Rail::Paytm => "PAYTM",
            Rail::Paynow => "PAYNOW",
            Rail::Konbini => "KONBINI",
            Rail::Aupay => "AUPAY",
            Rail::Sei => "SEI",
            Rail::Solana => "SOLANA",
        }
    }
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rail {
    type Err = String;

    /// Accepts the wire tag or the symbolic name (`AVAX_C`), case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Rail::ALL
            .into_iter()
            .find(|rail| rail.as_str().replace('-', "_") == normalized)
            .ok_or_else(|| format!("unknown rail: {s}"))
    }
}

/// Settlement currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    BRL,
    CAD,
    CNY,
    EUR,
    SOL,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::USD,
        Currency::BRL,
        Currency::CAD,
        Currency::CNY,
        Currency::EUR,
        Currency::SOL,
    ];

    /// Wire-format tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::BRL => "BRL",
            Currency::CAD => "CAD",
            Currency::CNY => "CNY",
            Currency::EUR => "EUR",
            Currency::SOL => "SOL",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.as_str() == normalized)
            .ok_or_else(|| format!("unknown currency: {s}"))
    }
}
