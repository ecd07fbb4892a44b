// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
pub mod config;
mod data;
mod element;
mod error;
mod garden;
mod output;
pub mod progress;
mod resources;

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use cli::commands::{Session, configure};
use cli::{Args, Command};
use garden::GardenClient;
use progress::{create_progress_handle, create_spinner};

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // Rotate daily or at 10MB, keep 5 files
    let log_path = log_dir.join("gex.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024);

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, guard) = file_appender.get_non_blocking_appender();
    // Keep the background writer alive for the whole process
    std::mem::forget(guard);

    let filter = if verbose { "gex=debug" } else { "gex=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // kube and rustls may both bring a provider; pick one explicitly
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();
    init_logging(args.verbose);

    let config_path = config::Config::config_path()?;
    let mut config = config::Config::load_from(&config_path)?;

    if let Command::Config { action } = &args.command {
        return configure(
            action.as_ref(),
            &mut config,
            &config_path,
            args.garden.as_deref(),
        );
    }

    let context = args.garden.clone().or_else(|| config.garden_context.clone());
    let client = connect(context.as_deref()).await?;
    tracing::debug!(garden = %client.context(), "Using garden");

    let mut session = Session::new(Arc::new(client), config, config_path, &args);
    session.run(&args.command).await
}

/// Connect to the garden, showing a spinner on interactive terminals
async fn connect(context: Option<&str>) -> Result<GardenClient> {
    let progress = create_progress_handle();

    if !std::io::stderr().is_terminal() {
        return GardenClient::connect(context, progress).await;
    }

    let spinner = create_spinner("Connecting to garden...");
    let mut progress_rx = progress.subscribe();

    let result = {
        let mut connect_handle = Box::pin(GardenClient::connect(context, Arc::clone(&progress)));

        loop {
            tokio::select! {
                biased;
                update = progress_rx.recv() => {
                    if let Ok(update) = update {
                        spinner.set_message(update.message());
                    }
                }
                result = &mut connect_handle => {
                    break result;
                }
            }
        }
    };

    spinner.finish_and_clear();
    result
}
