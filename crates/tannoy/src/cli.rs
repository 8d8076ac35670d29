//! Clap derive structures for the `tannoy` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tannoy -- control Dahua PoE network speakers from the command line
#[derive(Debug, Parser)]
#[command(
    name = "tannoy",
    version,
    about = "Control Dahua PoE network speakers from the command line",
    long_about = "Upload MP3s to a Dahua PoE speaker, start playback, and manage\n\
        its volume over the speaker's local HTTP API.",
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
    /// Speaker profile to use
    #[arg(long, short = 'p', env = "TANNOY_SPEAKER", global = true)]
    pub speaker: Option<String>,

    /// Speaker host, optionally host:port (overrides profile)
    #[arg(long, short = 'H', env = "TANNOY_HOST", global = true)]
    pub host: Option<String>,

    /// Login account on the speaker
    #[arg(long, short = 'u', env = "TANNOY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (prefer the keyring or TANNOY_PASSWORD)
    #[arg(long, env = "TANNOY_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TANNOY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (default 5)
    #[arg(long, env = "TANNOY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show device identity and firmware info
    Info,

    /// Show availability and playback state
    #[command(alias = "st")]
    Status,

    /// List audio files stored on the speaker
    #[command(alias = "ls")]
    Files,

    /// Get or set the output volume (0-10)
    #[command(alias = "vol")]
    Volume {
        /// New volume level; prints the current one when omitted
        level: Option<u8>,
    },

    /// Upload an MP3 to the speaker without playing it
    Upload {
        /// Local MP3 file
        path: PathBuf,

        /// Name to store the file under (defaults to the base name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Play media: a local MP3, an http(s) URL, or the name of a file
    /// already on the speaker
    Play {
        /// Path, URL, or speaker-side file name
        target: String,

        /// Name to store uploaded media under (defaults to the base name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage configuration and speaker profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Config subcommands ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a speaker profile interactively
    Init {
        /// Profile name
        #[arg(default_value = "default")]
        name: String,
    },

    /// Print the resolved configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
