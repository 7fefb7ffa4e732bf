//! Libris - console library manager
//!
//! Menu-driven front end over `libris-core`. State is loaded once at start
//! and saved after every change.

mod app;
mod menu;
mod prompt;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use libris_core::{LibrisConfig, LibraryStorage};

use app::App;

/// Manage a small library's books, members, and loans
#[derive(Debug, Parser)]
#[command(name = "libris", version, about)]
struct Cli {
    /// Config file (default: ./libris.toml, then ~/.libris/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Library data file, overriding the config and LIBRIS_DATA
    #[arg(short, long)]
    data: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = LibrisConfig::load_standard(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.storage.path = data;
        config.validate()?;
    }

    // Setup logging; stderr keeps log lines out of the menu
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let storage = LibraryStorage::from_config(&config.storage);
    let library = storage.load_or_create();

    let stdin = io::stdin();
    let mut app = App::new(library, storage, stdin.lock(), io::stdout());
    app.run()?;
    Ok(())
}
