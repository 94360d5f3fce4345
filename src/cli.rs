//! CLI definitions for mocbot-ci
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_ENVIRONMENT;
use crate::domain::Secret;

#[derive(Parser)]
#[command(
    name = "mocbot-ci",
    version,
    about = "CI pipeline orchestrator for the MOCBOT Discord bot",
    long_about = "Wires the bot's lint and container build/publish steps.\nEach operation assembles inputs and delegates to an external collaborator."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Source code directory
    #[arg(long, global = true, default_value = ".")]
    pub source: String,

    /// Infisical client secret, passed through to the image build
    #[arg(
        long,
        global = true,
        env = "INFISICAL_CLIENT_SECRET",
        hide_env_values = true
    )]
    pub infisical_client_secret: Option<Secret>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the complete CI pipeline (lint checks)
    Ci,

    /// Build and push the Docker image to the container registry
    BuildAndPush {
        /// Environment to build the image for
        #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
        env: String,
    },
}
