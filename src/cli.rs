//! Command-line interface definition for studiochat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot sends and model
//! listing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// studiochat - game studio assistant chat client
///
/// Talk to the planning, asset generation and development backends from
/// the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "studiochat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend base URL from config
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for studiochat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Module to talk to (planning, assets, development)
        #[arg(short, long)]
        module: Option<String>,

        /// Model to select before the first message
        #[arg(long)]
        model: Option<String>,
    },

    /// Send one message and print the conversation
    Send {
        /// Text to send
        text: String,

        /// Module to talk to (planning, assets, development)
        #[arg(short, long)]
        module: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Image to attach (repeatable)
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,

        /// Document to attach (repeatable)
        #[arg(long = "doc", value_name = "PATH")]
        documents: Vec<PathBuf>,

        /// Print the conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// List selectable models
    Models {
        /// Only list the models of this module's context
        #[arg(short, long)]
        module: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
