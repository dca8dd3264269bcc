//! Caption download gateway function
//!
//! One invocation, one event: reads a gateway event (from `--event <file>` or
//! stdin), runs it through the shared caption service and prints the gateway
//! response on stdout. Logs go to stderr.

mod config;
mod error;
mod gateway;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ytsubs_lib::CaptionExtractor;

use crate::config::{Config, LogFormat};
use crate::error::{FunctionError, Result};
use crate::gateway::{handle_event, parse_event};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate().map_err(FunctionError::Config)?;

    init_logging(&config);

    let raw = match &config.event {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    let response = match parse_event(&raw) {
        Ok(event) => {
            let extractor = CaptionExtractor::with_http(config.fetch_config())?;
            let response = handle_event(&event, &extractor).await;
            info!(
                "{} -> {} ({} bytes)",
                event.http_method,
                response.status_code,
                response.body.len()
            );
            response
        }
        Err(response) => response,
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Initialize logging on stderr
fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "ytsubs_function={level},ytsubs_lib={level}",
            level = config.log_level
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
