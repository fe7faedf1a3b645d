//! # ethix-checkout
//!
//! Headless driver for the checkout orchestrator.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ETHIX_SANDBOX_API_KEY=...
//! export ETHIX_THIRD_PARTY_ID=...
//!
//! # Pay for two widgets on the Avalanche C-chain
//! ethix-checkout pay --item Widget:2:10.00 --rail AVAX-C
//!
//! # Capture a player token; paste the login page's posted message on stdin
//! ethix-checkout login
//! ```
//!
//! Pressing Ctrl-C while a payment is pending closes the surface, which the
//! poller reports as `WEBVIEW_CLOSED`.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, ItemArg};
use ethix_client::{EthixConfig, EthixSession};
use ethix_core::{Completion, Currency, Environment, HeadlessSurface, Rail};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.json);

    let environment = args.production.then_some(Environment::Production);
    let config = EthixConfig::from_env_with(environment)?;

    info!("Environment: {}", config.environment);

    let surface = Arc::new(HeadlessSurface::new());
    let session = EthixSession::new(config, surface.clone())?;

    match args.command {
        Command::Pay {
            items,
            rail,
            currency,
        } => pay(&session, surface, items, rail, currency).await,
        Command::Login => login(&session).await,
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn pay(
    session: &EthixSession,
    surface: Arc<HeadlessSurface>,
    items: Vec<ItemArg>,
    rail: Rail,
    currency: Currency,
) -> anyhow::Result<()> {
    for item in items {
        session.add_product_to_cart(item.name, item.quantity, item.price)?;
    }
    info!("Cart total: {}", session.cart_total());

    let completion = Completion::new()
        .on_success(|details| {
            println!("✅ Payment completed: invoice {}", details.invoice.id);
        })
        .on_failure(|err| {
            eprintln!("❌ Payment failed: {err}");
        });

    let Some(ticket) = session.create_payment(rail, currency, completion).await else {
        anyhow::bail!("payment could not be created");
    };

    println!("💳 Pay here: {}", ticket.pay_url);

    let closer = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, closing payment page");
            surface.close();
        }
    });

    let state = ticket.wait().await?;
    closer.abort();
    info!("Polling finished: {:?}", state);
    Ok(())
}

async fn login(session: &EthixSession) -> anyhow::Result<()> {
    let channel = session.do_login();
    println!("🔑 Login page opened: {}", session.config().endpoints().login_url);
    println!("Paste posted messages as JSON, e.g. {{\"data\": {{\"token\": \"...\"}}}}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = channel.post_message(&line) {
            warn!("Not a message event: {}", e);
            continue;
        }
        if let Ok(Some(token)) =
            tokio::time::timeout(std::time::Duration::from_millis(200), session.wait_for_token()).await
        {
            println!("🎉 Player token: {}", token.as_str());
            break;
        }
    }

    session.teardown();
    Ok(())
}
