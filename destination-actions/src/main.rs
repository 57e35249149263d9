use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use destination_actions::registry::{find_action, get_all_actions};
use eventmap::config::{init_logging, load_config, MapperConfig};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// Map analytics events into partner payloads.
#[derive(Parser, Debug)]
#[command(name = "eventmap", version)]
struct Cli {
    /// TOML config file (defaults plus EVENTMAP_* env vars when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available actions
    List,
    /// Run an action over one JSON event
    Run {
        /// Action name, e.g. trackPurchase
        action: String,
        /// Event file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
        /// Print compact JSON regardless of config
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?.with_env_overrides(),
        None => MapperConfig::from_env(),
    };
    init_logging(&config.logging);

    match cli.command {
        Command::List => {
            for action in get_all_actions() {
                println!("{}", action.name());
            }
        }
        Command::Run {
            action,
            file,
            compact,
        } => {
            let action = find_action(&action)
                .with_context(|| format!("Unknown action '{}' (see `eventmap list`)", action))?;

            let input = read_input(file.as_ref())?;
            let event: Value =
                serde_json::from_str(&input).context("Event is not valid JSON")?;
            debug!(action = %action.name(), bytes = input.len(), "Event loaded");

            let track = action.perform(&event)?;
            info!(action = %action.name(), event = %track.event, "Event mapped");

            let rendered = if config.output.pretty && !compact {
                serde_json::to_string_pretty(&track)?
            } else {
                serde_json::to_string(&track)?
            };
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read event from stdin")?;
            if input.trim().is_empty() {
                bail!("No event on stdin");
            }
            Ok(input)
        }
    }
}
