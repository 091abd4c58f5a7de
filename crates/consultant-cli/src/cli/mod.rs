//! CLI command definitions for the `consult` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod session;
pub mod upload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with the college consultant agent from your terminal.
#[derive(Parser)]
#[command(name = "consult", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the agent backend.
    #[arg(long, global = true, env = "CONSULTANT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Directory holding config.toml (default: ~/.consultant).
    #[arg(long, global = true, env = "CONSULTANT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat,

    /// Ask a single question and print the reply.
    Ask {
        /// The question to send.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Upload a document for the agent to ingest.
    Upload {
        /// Path of the file to upload.
        file: PathBuf,
    },

    /// Manage backend sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Create a new session and print its identifiers.
    New,

    /// Show the backend's stored state for a session.
    Show {
        /// Session id to look up.
        id: String,
    },
}
