// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// xcpctl: command-line client for OpenSRS XCP domain operations
//
// Credentials come from the environment (or a .env file):
//   XCP_USERNAME, XCP_PRIVATE_KEY, optionally XCP_ENDPOINT, XCP_TIMEOUT_SECS
// The private key is read from the environment only, never from a flag.
//
// Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};
use xcp::{ClientConfig, DsRecord, XcpClient};

#[derive(Parser)]
#[command(name = "xcpctl", about = "OpenSRS XCP domain operations")]
struct Args {
    /// Registrar endpoint (overrides XCP_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Reseller username (overrides XCP_USERNAME)
    #[arg(long)]
    username: Option<String>,

    /// HTTP timeout in seconds (overrides XCP_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// DNSSEC DS records held at the registry
    Ds {
        #[command(subcommand)]
        action: DsAction,
    },
    /// Registration details (expiry date)
    Info { domain: String },
    /// Registrar transfer lock
    Lock {
        #[command(subcommand)]
        action: LockAction,
    },
}

#[derive(Subcommand)]
enum DsAction {
    /// Print the DS records for a domain
    Get { domain: String },
    /// Replace the DS records for a domain (no --record clears them)
    Set {
        domain: String,
        /// "<key tag> <algorithm> <digest type> <digest>", repeatable
        #[arg(long = "record")]
        records: Vec<String>,
    },
}

#[derive(Subcommand)]
enum LockAction {
    /// Print whether a domain is locked
    Get { domain: String },
    /// Lock or unlock a domain
    Set { domain: String, state: LockState },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LockState {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded environment file");
    }

    let config = load_config(&args)?;
    info!(endpoint = %config.endpoint, username = %config.username, "using XCP endpoint");
    let client = XcpClient::new(config)?;

    let output = match args.command {
        Command::Ds { action: DsAction::Get { domain } } => {
            let records = client.get_ds_records(&domain).await?;
            json!({ "domain": domain, "dnssec": records })
        }
        Command::Ds {
            action: DsAction::Set { domain, records },
        } => {
            let records = records
                .iter()
                .map(String::as_str)
                .map(parse_ds_record)
                .collect::<anyhow::Result<Vec<_>>>()?;
            client.set_ds_records(&domain, &records).await?;
            json!({ "domain": domain, "dnssec": records })
        }
        Command::Info { domain } => {
            let info = client.get_info(&domain).await?;
            json!({ "domain": domain, "expiry": info.expiry })
        }
        Command::Lock {
            action: LockAction::Get { domain },
        } => {
            let locked = client.get_lock_state(&domain).await?;
            json!({ "domain": domain, "locked": locked })
        }
        Command::Lock {
            action: LockAction::Set { domain, state },
        } => {
            let locked = matches!(state, LockState::On);
            client.set_lock_state(&domain, locked).await?;
            json!({ "domain": domain, "locked": locked })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Environment first, then command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env_partial().context("loading XCP_* configuration")?;
    if let Some(ref endpoint) = args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(ref username) = args.username {
        config.username = username.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config.validate()?;
    Ok(config)
}

/// Parse `"<key tag> <algorithm> <digest type> <digest>"` (zone-file DS rdata).
fn parse_ds_record(text: &str) -> anyhow::Result<DsRecord> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [key_tag, algorithm, digest_type, digest] = fields.as_slice() else {
        bail!(
            "DS record needs 4 fields (key tag, algorithm, digest type, digest), got {:?}",
            text
        );
    };
    if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("DS digest is not hex: {:?}", digest);
    }
    Ok(DsRecord {
        key_tag: key_tag.parse::<u16>().context("key tag")?,
        algorithm: algorithm.parse::<u8>().context("algorithm")?,
        digest_type: digest_type.parse::<u8>().context("digest type")?,
        digest: digest.to_uppercase(),
    })
}
