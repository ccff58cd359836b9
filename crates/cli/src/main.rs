mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use roketo_client::ClientConfig;
use roketo_core::StreamSnapshot;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Which side of an account's streams to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ListSide {
    Incoming,
    Outgoing,
}

/// Roketo payment-stream toolkit.
#[derive(Parser)]
#[command(name = "roketo", version, about = "Roketo payment-stream toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML config file (rpc_url, roketo_contract_name, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute progress of a stream snapshot
    Progress {
        /// Path to a stream snapshot JSON file (as returned by get_stream)
        snapshot: PathBuf,
        /// Evaluation time in milliseconds since the epoch (default: now)
        #[arg(long)]
        at: Option<i64>,
        /// Ignore accrual since the last on-chain action
        #[arg(long)]
        frozen: bool,
    },

    /// Show which actions an account may take on a stream
    Permissions {
        /// Path to a stream snapshot JSON file
        snapshot: PathBuf,
        /// Viewing account (default: account_id from config)
        #[arg(long)]
        account: Option<String>,
        /// Evaluation time in milliseconds since the epoch (default: now)
        #[arg(long)]
        at: Option<i64>,
    },

    /// Fetch a stream from the chain and show its progress
    Fetch {
        /// Stream id
        stream_id: String,
    },

    /// List an account's streams
    List {
        /// Incoming or outgoing streams
        #[arg(value_enum)]
        side: ListSide,
        /// Account to list (default: account_id from config)
        #[arg(long)]
        account: Option<String>,
        /// Index of the first stream
        #[arg(long, default_value = "0")]
        from: u32,
        /// Maximum number of streams
        #[arg(long, default_value = "100")]
        limit: u32,
    },

    /// Print the transaction a stream action would send
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum TxCommands {
    /// Start (or resume) a stream
    Start { stream_id: String },
    /// Pause a stream
    Pause { stream_id: String },
    /// Stop a stream for good
    Stop { stream_id: String },
    /// Withdraw from one or more incoming streams
    Withdraw {
        #[arg(required = true)]
        stream_ids: Vec<String>,
    },
    /// Top up a stream
    AddFunds {
        stream_id: String,
        /// Token contract of the stream
        #[arg(long)]
        token: String,
        /// Amount in the token's smallest unit
        #[arg(long)]
        amount: String,
        /// Wallet redirect after signing
        #[arg(long)]
        callback_url: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    match cli.command {
        Commands::Progress {
            snapshot,
            at,
            frozen,
        } => {
            commands::progress::cmd_progress(&snapshot, at, frozen, cli.output, cli.quiet);
        }
        Commands::Permissions {
            snapshot,
            account,
            at,
        } => {
            let account = account.unwrap_or_else(|| {
                config_account(cli.config.as_deref(), cli.output, cli.quiet)
            });
            commands::permissions::cmd_permissions(&snapshot, &account, at, cli.output, cli.quiet);
        }
        Commands::Fetch { stream_id } => {
            let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);
            commands::fetch::cmd_fetch(config, &stream_id, cli.output, cli.quiet);
        }
        Commands::List {
            side,
            account,
            from,
            limit,
        } => {
            let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);
            let account = match account.or_else(|| config.account_id.clone()) {
                Some(a) => a,
                None => {
                    report_error(
                        "error: --account is required when no account_id is configured",
                        cli.output,
                        cli.quiet,
                    );
                    process::exit(1);
                }
            };
            commands::list::cmd_list(config, side, &account, from, limit, cli.output, cli.quiet);
        }
        Commands::Tx { command } => {
            let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);
            commands::tx::cmd_tx(config, command, cli.output, cli.quiet);
        }
    }
}

/// Resolve configuration (defaults, file, environment) or exit.
fn load_config(path: Option<&Path>, output: OutputFormat, quiet: bool) -> ClientConfig {
    match ClientConfig::load(path) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

fn config_account(path: Option<&Path>, output: OutputFormat, quiet: bool) -> String {
    match load_config(path, output, quiet).account_id {
        Some(a) => a,
        None => {
            report_error(
                "error: --account is required when no account_id is configured",
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

/// Read and validate a snapshot file or exit.
pub(crate) fn load_snapshot(path: &Path, output: OutputFormat, quiet: bool) -> StreamSnapshot {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: snapshot file not found: {}", path.display());
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match StreamSnapshot::from_json_str(&source) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error: invalid snapshot in {}: {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn runtime(output: OutputFormat, quiet: bool) -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("error: failed to create tokio runtime: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
