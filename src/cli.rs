//! Command-line surface.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ops-slip", version, about = "Read an operations slip: OCR, status color, copyable result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// OCR a slip image and print the composed result.
    Extract {
        /// Image path or `data:image/...;base64,...` URL.
        #[arg(required_unless_present = "paste", conflicts_with = "paste")]
        image: Option<String>,

        /// Read the image from the clipboard instead.
        #[arg(long)]
        paste: bool,

        /// Append a recipient/delegate line. Repeat to append several.
        #[arg(long = "recipient", value_name = "TEXT")]
        recipients: Vec<String>,

        /// Copy the final text to the clipboard.
        #[arg(long)]
        copy: bool,
    },

    /// Print the status label sampled from a slip image.
    Classify {
        /// Image path or `data:` URL.
        image: String,
    },

    /// Show or toggle the color theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    /// Switch between light and dark and save the choice.
    Toggle,
}
