// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::Parser;
use dcap_relay::report::{parse_seed, ServiceKeyPair, SEED_LEN};
use dcap_relay::service::{self, Relay, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, long_about = None,
    about = "Verify SGX DCAP quotes and co-sign the verified identity with an \
    sr25519 key")]
struct Cli {
    /// Address to listen on
    #[arg(short = 't', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 1234)]
    port: u16,

    /// sr25519 seed (mini secret key) as 64 hex characters
    #[arg(short, long, value_parser = parse_seed)]
    seed: [u8; SEED_LEN],

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[cfg(feature = "dcap")]
fn build_relay(keypair: ServiceKeyPair) -> anyhow::Result<Relay> {
    Ok(Relay::new(
        keypair,
        dcap_relay::quote::DcapQuoteVerifier::new(),
    ))
}

#[cfg(not(feature = "dcap"))]
fn build_relay(_keypair: ServiceKeyPair) -> anyhow::Result<Relay> {
    anyhow::bail!("no quote verification backend available, rebuild with `--features dcap`")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let keypair = ServiceKeyPair::from_seed(&cli.seed).context("deriving sr25519 key pair")?;

    tracing::info!(public = %keypair.public_hex(), "relay sr25519 public key");

    let relay = Arc::new(build_relay(keypair)?);

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };

    service::run(relay, &config)
        .await
        .with_context(|| format!("serving on {}:{}", config.host, config.port))
}
