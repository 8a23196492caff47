use std::path::PathBuf;

use clap::Parser;

use crate::client::{Language, VisualizationKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "sviz", about = "Terminal client for the script visualization service", version)]
pub struct Cli {
    /// Script file to preload into the editor.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Script language.
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Visualization type to request.
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: Option<VisualizationKind>,

    /// Visualization service base address (overrides VIZ_BACKEND_URL).
    #[arg(long = "backend-url")]
    pub backend_url: Option<String>,

    /// Request timeout in seconds (overrides VIZ_REQUEST_TIMEOUT).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Check service health and exit.
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
