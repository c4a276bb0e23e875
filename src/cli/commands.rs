use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `plantsnap` - identify plants from a photo.
#[derive(Parser, Debug)]
#[command(name = "plantsnap")]
#[command(version = "0.1.0")]
#[command(about = "Identify a plant from a photo with a multimodal model.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate and store your OpenAI API key
    Login {
        /// API key (read from stdin when omitted, keeping it out of shell history)
        key: Option<String>,
    },

    /// Remove the stored API key
    Logout,

    /// Show whether an API key is stored
    Status,

    /// Identify the plant in an image
    Identify {
        /// Path to a JPEG, PNG or WebP photo
        image: PathBuf,

        /// Return a fixed sample result without calling the API
        #[arg(long)]
        demo: bool,
    },
}
