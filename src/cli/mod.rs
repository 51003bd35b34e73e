pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docsight")]
#[command(author = "DocSight Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract text from PDFs and images and analyze it for content insights", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the upload-and-analyze web server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Extract text from local PDF or image files and analyze it
    Extract {
        /// Paths to files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Skip AI-generated captions, hashtags and suggestions
        #[arg(long, default_value = "false")]
        no_insights: bool,

        /// Keep the original line layout instead of reflowing paragraphs
        #[arg(long)]
        preserve_layout: Option<bool>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Check system health and diagnose common problems
    Doctor,
}
