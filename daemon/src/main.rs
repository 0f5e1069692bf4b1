//! oism: command-line tooling for the optimistic verification module.

mod replay;

use anyhow::Context;
use clap::Parser;
use oism_ism::{IsmConfig, IsmSnapshot};
use oism_messages::{Message, MessageDecoder, PackedMessageDecoder};
use oism_utils::{init_logging, LogFormat};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "oism", about = "Optimistic verification module tooling")]
struct Cli {
    /// Log format: "human" or "json". Defaults to the config file's value.
    #[arg(long, env = "OISM_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value.
    #[arg(long, env = "OISM_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Module configuration files.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect encoded messages.
    Message {
        #[command(subcommand)]
        action: MessageAction,
    },
    /// Run a JSON scenario script against a module built from a config file.
    Replay {
        /// Path to the TOML module configuration.
        #[arg(long, env = "OISM_CONFIG")]
        config: PathBuf,

        /// Path to the JSON scenario script.
        #[arg(long)]
        script: PathBuf,

        /// Write the final module state here.
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },
    /// Inspect saved module state.
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Validate a configuration file and print it with defaults filled in.
    Check {
        #[arg(long, env = "OISM_CONFIG")]
        config: PathBuf,
    },
}

#[derive(clap::Subcommand)]
enum MessageAction {
    /// Print the identifier and origin of a hex-encoded message.
    Id {
        /// Message bytes as hex, with or without a 0x prefix.
        #[arg(value_name = "HEX")]
        encoded: String,
    },
}

#[derive(clap::Subcommand)]
enum SnapshotAction {
    /// Print a snapshot file as JSON.
    Inspect {
        #[arg(long)]
        file: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Config {
                action: ConfigAction::Check { config },
            }
            | Self::Replay { config, .. } => Some(config.as_path()),
            _ => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cli
        .command
        .config_path()
        .map(|path| {
            IsmConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))
        })
        .transpose()?;

    let format = cli
        .log_format
        .as_deref()
        .or(config.as_ref().map(|c| c.log_format.as_str()))
        .unwrap_or("human")
        .parse::<LogFormat>()?;
    let level = cli
        .log_level
        .as_deref()
        .or(config.as_ref().map(|c| c.log_level.as_str()))
        .unwrap_or("info");
    init_logging(format, level)?;

    match (cli.command, config) {
        (Command::Config { .. }, Some(config)) => {
            config.validate()?;
            tracing::info!(
                watchers = config.watchers.len(),
                threshold = config.threshold,
                routes = config.routes.len(),
                "configuration is valid"
            );
            print!("{}", config.to_toml_string()?);
        }
        (
            Command::Replay {
                script,
                snapshot_out,
                ..
            },
            Some(config),
        ) => {
            let contents = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let script: replay::Script =
                serde_json::from_str(&contents).context("parsing script")?;
            let (report, snapshot) = replay::run(&config, script)?;
            if let Some(path) = snapshot_out {
                std::fs::write(&path, snapshot.to_bytes()?)
                    .with_context(|| format!("writing snapshot {}", path.display()))?;
                tracing::info!(path = %path.display(), "snapshot written");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        (
            Command::Message {
                action: MessageAction::Id { encoded },
            },
            _,
        ) => {
            let bytes = hex::decode(encoded.trim_start_matches("0x")).context("decoding hex")?;
            let decoder = PackedMessageDecoder;
            let mut out = json!({
                "id": decoder.message_id(&bytes),
                "origin": decoder.origin(&bytes)?,
                "len": bytes.len(),
            });
            match Message::decode(&bytes) {
                Ok(message) => out["message"] = serde_json::to_value(message)?,
                Err(err) => tracing::warn!("full decode failed: {err}"),
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (
            Command::Snapshot {
                action: SnapshotAction::Inspect { file },
            },
            _,
        ) => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading snapshot {}", file.display()))?;
            let snapshot = IsmSnapshot::from_bytes(&bytes)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        (Command::Config { .. } | Command::Replay { .. }, None) => {
            anyhow::bail!("command requires a configuration file");
        }
    }

    Ok(())
}
