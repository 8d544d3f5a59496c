//! Clap derive structures for the `tikgate` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tikgate -- chat-style command gateway for MikroTik RouterOS
#[derive(Debug, Parser)]
#[command(
    name = "tikgate",
    version,
    about = "Chat-style command gateway for MikroTik RouterOS",
    long_about = "Runs short text commands (speed, devices, top5, block <ip>, ...)\n\
        against a RouterOS device over its API and prints the reply a chat\n\
        transport would send back.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "TIKGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Router address (overrides config)
    #[arg(long, short = 'H', env = "TIKGATE_HOST", global = true)]
    pub host: Option<String>,

    /// Router API port (overrides config)
    #[arg(long, env = "TIKGATE_PORT", global = true)]
    pub port: Option<u16>,

    /// Router API user (overrides config)
    #[arg(long, short = 'u', env = "TIKGATE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long, env = "TIKGATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TIKGATE_OUTPUT",
        default_value = "text",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Reply text only (default)
    Text,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON (one reply per line)
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one command and print the reply
    Exec(ExecArgs),

    /// Read commands from stdin, one per line, and print each reply
    Console(ConsoleArgs),

    /// Connect, log in and read /system/resource
    Check,

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Caller id the command is attributed to
    #[arg(long, short = 'c', env = "TIKGATE_CALLER", allow_negative_numbers = true)]
    pub caller: i64,

    /// Command text, e.g. `top5` or `block 192.168.1.100`
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConsoleArgs {
    /// Caller id every line is attributed to
    #[arg(long, short = 'c', env = "TIKGATE_CALLER", allow_negative_numbers = true)]
    pub caller: i64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Write a starter config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
