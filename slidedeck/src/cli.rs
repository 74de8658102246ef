//! Command-line interface definitions for slidedeck

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the slidedeck application
#[derive(Parser)]
#[command(name = "slidedeck")]
#[command(version)]
#[command(about = "Turn a folder of markdown documents into a slide deck", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for slidedeck
#[derive(Subcommand)]
pub enum Commands {
    /// Build a standalone HTML slide deck
    Build {
        /// Input directory (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Output HTML file
        #[arg(short, long, default_value = "deck.html")]
        output: PathBuf,

        /// Deck title (overrides slidedeck.toml)
        #[arg(short, long)]
        title: Option<String>,

        /// Sort documents by name instead of directory walk order
        #[arg(long)]
        sort: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print one line per slide
    Outline {
        /// Input directory (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report image references that do not resolve to an asset
    Check {
        /// Input directory (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}
