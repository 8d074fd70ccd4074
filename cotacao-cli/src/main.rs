//! Cotacao CLI
//!
//! Requests the current USD-BRL quote from the relay under one root deadline
//! and writes `Dólar: <bid>` to a local file. On any failure the file is left
//! untouched and a diagnostic is printed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use cotacao_client::{CotacaoClient, DEFAULT_OUTPUT};
use cotacao_types::{CLIENT_BUDGET, Deadline};

#[derive(Parser)]
#[command(name = "cotacao")]
#[command(author, version, about = "Saves the current USD-BRL quote to a file", long_about = None)]
struct Cli {
    /// Base URL of the quote relay
    #[arg(
        long,
        env = "COTACAO_SERVER_URL",
        default_value = "http://localhost:8080"
    )]
    server_url: String,

    /// File to overwrite with the quote
    #[arg(long, short, env = "COTACAO_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Budget for the whole run, in milliseconds
    #[arg(long, env = "COTACAO_TIMEOUT_MS", default_value_t = CLIENT_BUDGET.as_millis() as u64)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let deadline = Deadline::after(Duration::from_millis(cli.timeout_ms));
    let client = CotacaoClient::new(&cli.server_url);

    let quote = client
        .save_quote(&deadline, &cli.output)
        .await
        .with_context(|| format!("failed to save quote from {}", cli.server_url))?;

    println!("✓ Quote saved to {}: {}", cli.output.display(), quote);
    Ok(())
}
