//! Terminal dashboard for a running room monitor service.
//!
//! Usage:
//!   cargo run --bin sensor_dashboard -- --url http://localhost:3000
//!   cargo run --bin sensor_dashboard -- --watch 30 --retries 5
//!
//! Without `--watch` the readings are fetched once. Ctrl+C cancels.

use std::{env, time::Duration};

use anyhow::{Context, Result};
use tokio::{signal, time};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use room_monitor_service::dashboard::{
    client::{DashboardClient, RetryPolicy},
    render_text, DashboardView,
};

const DEFAULT_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let url = flag_value(&args, "--url").unwrap_or(DEFAULT_URL);
    let watch = flag_value(&args, "--watch")
        .map(|v| v.parse::<u64>())
        .transpose()
        .context("--watch must be a number of seconds")?
        .map(Duration::from_secs);
    let attempts = flag_value(&args, "--retries")
        .map(|v| v.parse::<u32>())
        .transpose()
        .context("--retries must be a positive integer")?;

    let client = DashboardClient::new(url);
    let policy = match attempts {
        Some(attempts) => RetryPolicy {
            attempts,
            ..RetryPolicy::default()
        },
        None => RetryPolicy::default(),
    };

    loop {
        let result = tokio::select! {
            result = client.fetch_with_retry(policy) => result,
            _ = signal::ctrl_c() => {
                info!("Cancelled");
                return Ok(());
            }
        };

        match result {
            Ok(readings) => print!("{}", render_text(&DashboardView::from_readings(&readings))),
            Err(e) => {
                error!(url = %client.base_url(), error = %format!("{e:#}"), "Failed to fetch sensor data");
                print!("{}", render_text(&DashboardView::from_readings(&[])));
                if watch.is_none() {
                    return Err(e);
                }
            }
        }

        let Some(interval) = watch else {
            return Ok(());
        };

        tokio::select! {
            _ = time::sleep(interval) => println!(),
            _ = signal::ctrl_c() => {
                info!("Cancelled");
                return Ok(());
            }
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
