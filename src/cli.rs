//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "smokeguard")]
#[command(author = "black-dragon")]
#[command(version)]
#[command(about = "Vehicle emission violation detection using AI image analysis")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vision model name override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single vehicle frame for an emission violation
    Detect {
        /// Path to image file
        image: PathBuf,

        /// Skip cache lookup (overrides config)
        #[arg(long)]
        no_cache: bool,

        /// Specify license plate manually, skipping OCR extraction
        #[arg(long, short = 'p')]
        plate: Option<String>,

        /// Monitoring zone override (e.g. "Zone B - Ring Road")
        #[arg(long, short = 'z')]
        zone: Option<String>,

        /// Confidence threshold override (50-99)
        #[arg(long, short = 't')]
        threshold: Option<f64>,
    },

    /// Batch detect over all images in a folder
    Batch {
        /// Path to folder containing images
        folder: PathBuf,

        /// Output file for the run summary (JSON)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Skip cache lookup (overrides config)
        #[arg(long)]
        no_cache: bool,

        /// Number of parallel detections. 0 = auto (CPU count). Uses 4 if not specified.
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// Show the violation log, newest first
    History {
        /// Limit to the most recent N records
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Mark a pending violation as sent to the owner
    Send {
        /// Violation id (e.g. VIO-1A2B3C4D)
        violation_id: String,
    },

    /// Export the violation log to CSV
    Export {
        /// Output CSV file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set vision model
        #[arg(long)]
        set_model: Option<String>,

        /// Set confidence threshold (50-99)
        #[arg(long)]
        set_threshold: Option<f64>,

        /// Set active monitoring zone name
        #[arg(long)]
        set_zone: Option<String>,

        /// Set OCR engine selector
        #[arg(long)]
        set_ocr_engine: Option<u32>,

        /// Enable/disable cache
        #[arg(long)]
        set_cache: Option<bool>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage the provider-result cache
    Cache {
        /// Clear all cached results
        #[arg(long)]
        clear: bool,

        /// Show cache statistics
        #[arg(long)]
        stats: bool,
    },
}
