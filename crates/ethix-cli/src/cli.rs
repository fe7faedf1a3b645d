//! # Command Line
//!
//! Argument definitions for the `ethix-checkout` binary.

use clap::{Parser, Subcommand};
use ethix_core::{Currency, Rail};

#[derive(Debug, Parser)]
#[command(name = "ethix-checkout", version, about = "Headless checkout driver")]
pub struct Cli {
    /// Use production endpoints and key instead of the sandbox
    #[arg(long, global = true)]
    pub production: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a payment and wait for its outcome
    Pay {
        /// Cart line as name:quantity:price (repeatable)
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<ItemArg>,

        /// Payment rail, e.g. CREDIT_CARD or AVAX-C
        #[arg(long, default_value = "CREDIT_CARD")]
        rail: Rail,

        #[arg(long, default_value = "USD")]
        currency: Currency,
    },
    /// Open the login page and read posted messages from stdin until a token
    /// arrives
    Login,
}

/// One `--item` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemArg {
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

/// Parse `name:quantity:price`. The name may itself contain colons.
pub fn parse_item(raw: &str) -> Result<ItemArg, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected name:quantity:price, got {raw}"));
    };

    let quantity = quantity
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| format!("quantity must be a positive integer, got {quantity}"))?;

    if name.is_empty() {
        return Err("item name must not be empty".to_string());
    }

    Ok(ItemArg {
        name: name.to_string(),
        quantity,
        price: price.to_string(),
    })
}
