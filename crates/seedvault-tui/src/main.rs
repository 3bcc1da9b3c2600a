//! Seedvault - Recovery phrase viewer
//!
//! `seedvault show` unlocks the keystore with a PIN and displays the
//! recovery phrase on demand. `seedvault import` seals a phrase into a new
//! keystore.
//!
//! # Security Notice
//! The phrase is only decrypted while it is on screen. Logs never contain
//! any part of it.

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Read};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use seedvault_core::{ClipboardSink, KeystoreWallet, NullClipboard, Osc52Clipboard};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zeroize::Zeroizing;

use seedvault_tui::app::{ClipboardMode, ConfigError};
use seedvault_tui::prompt::read_hidden;
use seedvault_tui::{App, AppConfig};

/// Default log filter
const LOG_DIRECTIVE: &str = "seedvault=info";

#[derive(Parser)]
#[command(name = "seedvault")]
#[command(
    about = "View and copy a wallet recovery phrase from an encrypted keystore",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keystore file (overrides the configured path)
    #[arg(long, global = true)]
    keystore: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Unlock the keystore and show the recovery phrase (default)
    Show,

    /// Read a recovery phrase from stdin and seal it into a new keystore
    Import,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(AppConfig::config_file_path);
    // Reported after logging is initialised
    let (mut config, config_error) = match config_path.as_deref().map(AppConfig::load_from) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (AppConfig::default(), Some(e)),
        None => (AppConfig::default(), None),
    };
    if let Some(keystore) = &cli.keystore {
        config.keystore_path = keystore.clone();
    }

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => show(&config, config_error).await,
        Commands::Import => {
            let save_to = cli.keystore.is_some().then_some(config_path).flatten();
            import(&config, config_error, save_to.as_deref())
        }
    }
}

/// Run the terminal interface
async fn show(config: &AppConfig, config_error: Option<ConfigError>) -> Result<()> {
    init_file_logging(&config.log_file)?;
    warn_config_fallback(config_error);

    let wallet = Arc::new(KeystoreWallet::open(&config.keystore_path));
    if !wallet.exists() {
        bail!(
            "No keystore at {} - run 'seedvault import' first",
            config.keystore_path.display()
        );
    }

    let clipboard: Arc<dyn ClipboardSink> = match config.clipboard {
        ClipboardMode::Osc52 => Arc::new(Osc52Clipboard::stdout()),
        ClipboardMode::Disabled => Arc::new(NullClipboard),
    };

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    info!("Starting seedvault, keystore {:?}", config.keystore_path);
    let result = run_app(config, wallet, clipboard).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Terminal setup, event loop and teardown
async fn run_app(
    config: &AppConfig,
    wallet: Arc<KeystoreWallet>,
    clipboard: Arc<dyn ClipboardSink>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, wallet, clipboard);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(|e| anyhow::anyhow!("{}", e))
}

/// Seal a phrase read from stdin into a new keystore
fn import(
    config: &AppConfig,
    config_error: Option<ConfigError>,
    save_config_to: Option<&Path>,
) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(LOG_DIRECTIVE.parse()?))
        .init();
    warn_config_fallback(config_error);

    let phrase = if io::stdin().is_terminal() {
        read_hidden("Recovery phrase: ")?
    } else {
        let mut input = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut input)?;
        input
    };

    let pin = read_hidden("New PIN (6-12 digits): ")?;
    let confirm = read_hidden("Confirm PIN: ")?;
    if pin.as_str() != confirm.as_str() {
        bail!("PINs do not match");
    }

    let wallet = KeystoreWallet::create(&config.keystore_path, &phrase, &pin)
        .context("Failed to create keystore")?;

    if let Some(path) = save_config_to {
        config.save_to(path)?;
        info!("Saved keystore location to {:?}", path);
    }

    println!("Keystore created at {}", wallet.path().display());
    Ok(())
}

fn warn_config_fallback(error: Option<ConfigError>) {
    if let Some(e) = error {
        warn!("Using default configuration: {}", e);
    }
}

/// Send logs to a file so they do not corrupt the alternate screen
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::from_default_env().add_directive(LOG_DIRECTIVE.parse()?))
        .init();

    Ok(())
}
