//! slidedeck - markdown slide deck builder
//!
//! A CLI tool that collects markdown documents and images from a directory
//! and turns them into a single self-contained HTML presentation.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use slidedeck::acquisition;
use slidedeck::html_exporter;
use slidedeck::{Deck, DeckConfig, SlideKind};
use std::path::Path;

/// Main entry point for the slidedeck CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            title,
            sort,
            verbose,
        } => {
            init_logging(verbose);
            handle_build_command(&input, &output, title, sort)?;
        }

        Commands::Outline { input, verbose } => {
            init_logging(verbose);
            handle_outline_command(&input)?;
        }

        Commands::Check { input, verbose } => {
            init_logging(verbose);
            handle_check_command(&input)?;
        }
    }

    Ok(())
}

/// Initialize logging; `--verbose` raises the default level to info
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Load configuration and acquire every document and image under `input`
fn load_deck(input: &Path, title: Option<String>, sort: bool) -> Result<(Deck, DeckConfig)> {
    let config = DeckConfig::load_from_dir(input)
        .with_context(|| format!("Failed to load configuration from {}", input.display()))?;

    let acquired = acquisition::acquire_directory(input, &config.acquisition_options())
        .with_context(|| format!("Failed to read sources from {}", input.display()))?;

    if !acquired.skipped.is_empty() {
        println!("Skipped {} unreadable files", acquired.skipped.len());
    }

    let title = title
        .or_else(|| config.title.clone())
        .unwrap_or_else(|| default_title(input));

    let mut deck = Deck::new(title, &config);
    deck.load(acquired);
    if sort {
        deck.sort_documents();
    }

    Ok((deck, config))
}

/// Directory name of the input, or a generic fallback
fn default_title(input: &Path) -> String {
    input
        .canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Slides".to_string())
}

/// Handle the build command
fn handle_build_command(
    input: &Path,
    output: &Path,
    title: Option<String>,
    sort: bool,
) -> Result<()> {
    println!("Building slide deck...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    let (deck, config) = load_deck(input, title, sort)?;

    println!(
        "✓ Loaded {} documents and {} images",
        deck.documents().len(),
        deck.assets().len()
    );

    if deck.slides().is_empty() {
        anyhow::bail!("No slides found in {}", input.display());
    }

    let stats = html_exporter::to_html(&deck, &config.viewer, output)
        .with_context(|| format!("Failed to export HTML to {}", output.display()))?;

    println!("✓ Rendered {} slides", stats.slides);
    if stats.unresolved_images > 0 {
        println!(
            "Warning: {} image references could not be resolved (run 'slidedeck check')",
            stats.unresolved_images
        );
    }
    println!("✓ Successfully wrote: {}", output.display());

    Ok(())
}

/// Handle the outline command
fn handle_outline_command(input: &Path) -> Result<()> {
    let (deck, _) = load_deck(input, None, false)?;

    println!("{} ({} slides)\n", deck.title(), deck.slides().len());
    for slide in deck.slides() {
        let marker = match slide.kind() {
            SlideKind::Title => "T",
            SlideKind::Content => " ",
        };
        let label = slide
            .heading()
            .map(str::to_string)
            .or_else(|| slide.content.lines().next().map(str::to_string))
            .unwrap_or_default();
        println!("{:>4} {} {}", slide.index + 1, marker, label);
    }

    Ok(())
}

/// Handle the check command
fn handle_check_command(input: &Path) -> Result<()> {
    let (deck, _) = load_deck(input, None, false)?;

    let mut missing = 0;
    for slide in deck.slides() {
        let Some(rendered) = deck.render_slide(slide.index) else {
            continue;
        };
        for key in &rendered.unresolved {
            println!("slide {}: missing image '{}'", slide.index + 1, key);
            missing += 1;
        }
    }

    if missing > 0 {
        anyhow::bail!("{} image references could not be resolved", missing);
    }

    println!(
        "✓ All image references resolve ({} slides, {} assets)",
        deck.slides().len(),
        deck.assets().len()
    );
    Ok(())
}
