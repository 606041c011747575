//! Tracing setup: env-filtered subscriber writing to stdout plus
//! daily-rolling files, JSON-formatted in production.

pub mod middleware;

use std::io;

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "portfolio_api={default_level},tower_http=debug,axum=debug"
        ))
    })
}

/// Initialize the logging system.
///
/// The returned guards MUST be held for the programme's lifetime; dropping
/// them early shuts down the background log-writer threads and loses
/// buffered lines.
pub fn init() -> Vec<WorkerGuard> {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let is_production = environment == "production";

    std::fs::create_dir_all("logs").ok();
    let (file_writer, file_guard) = non_blocking(rolling::daily("logs", "app.log"));
    let (error_writer, error_guard) = non_blocking(rolling::daily("logs", "error.log"));
    let (console_writer, console_guard) = non_blocking(io::stdout());

    let default_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| if is_production { "info" } else { "debug" }.to_string());

    let subscriber = tracing_subscriber::registry().with(env_filter(&default_level));

    if is_production {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(error_writer)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::ERROR),
            )
            .with(fmt::layer().json().with_writer(console_writer).with_target(false))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
            .with(fmt::layer().with_writer(console_writer).with_target(true).pretty())
            .init();
    }

    tracing::info!("Logging initialized for {} environment", environment);

    vec![file_guard, error_guard, console_guard]
}
