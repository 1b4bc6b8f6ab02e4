//! ops-slip — operations slip reader.
//!
//! This is the crate root that wires the domains together. No business
//! logic lives here, only module declarations, startup and command
//! dispatch.
//!
//! Domains:
//!   - capture    — image sources (file, data URL) → decoded bitmap
//!   - ocr        — engine boundary + name/code field extraction
//!   - status     — single-pixel status classifier
//!   - result     — result text composition + recipient annotation
//!   - pipeline   — per-session orchestration and in-flight guard
//!   - clipboard  — system clipboard in/out
//!   - settings   — persisted theme preference

pub mod capture;
mod cli;
pub mod clipboard;
mod commands;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod result;
pub mod settings;
pub mod status;

pub use error::{Error, Result};

use clap::Parser;
use cli::{Cli, Command, ThemeAction};
use settings::SettingsStore;
use std::process::ExitCode;

/// Entry point — called by the `ops-slip` binary.
pub fn run() -> ExitCode {
    'env_load: for env_file in [".env.local", ".env"] {
        let path = std::path::Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break 'env_load;
        }
    }

    env_logger::init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(dispatch(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Command) -> Result<()> {
    let mut settings = SettingsStore::open_default()?;
    log::info!(
        "ops-slip starting up (theme={}, settings={})",
        settings.theme(),
        settings.path().display()
    );

    match command {
        Command::Extract {
            image,
            paste,
            recipients,
            copy,
        } => commands::extract(image, paste, &recipients, copy).await,
        Command::Classify { image } => commands::classify(image).await,
        Command::Theme { action } => {
            commands::theme(&mut settings, matches!(action, Some(ThemeAction::Toggle)))
        }
    }
}
