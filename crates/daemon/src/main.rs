// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kanped: presenter remote bridge daemon

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kanpe_daemon::{env, logging, Backend, Config};
use tracing::info;

#[derive(Parser)]
#[command(name = "kanped", version, about = "Bridge a wireless presenter remote to a slide show")]
struct Args {
    /// Config file (default: $KANPE_CONFIG or <config_dir>/kanpe/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Peripheral address, overriding the config
    #[arg(long, value_name = "MAC")]
    address: Option<String>,

    /// Drive an in-process simulated deck instead of the helper program
    #[arg(long)]
    simulate: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.link.address = address;
    }
    if args.simulate {
        config.automation.backend = Backend::Simulated;
    }
    config.validate()?;

    if args.check_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let state_dir = env::state_dir()?;
    let _guard = logging::init(&state_dir)
        .with_context(|| format!("failed to initialize logging in {}", state_dir.display()))?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.link.address,
        backend = %config.automation.backend,
        log = %logging::log_path(&state_dir).display(),
        "starting kanped"
    );

    serve(&config).await
}

#[cfg(feature = "ble")]
async fn serve(config: &Config) -> anyhow::Result<()> {
    let transport = kanpe_adapters::BleTransport::new(config.link.scan_timeout());
    kanpe_daemon::run_until(
        &config.timing(),
        config.target(),
        transport,
        config.automation.build(),
        shutdown_signal(),
    )
    .await?;
    info!("kanped stopped");
    Ok(())
}

#[cfg(not(feature = "ble"))]
async fn serve(_config: &Config) -> anyhow::Result<()> {
    anyhow::bail!("kanped was built without bluetooth support (enable the `ble` feature)")
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
#[cfg(feature = "ble")]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}
