use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::suggest::DEFAULT_MODEL;

#[derive(Parser)]
#[command(name = "splitpdf")]
#[command(about = "Split PDFs by page range, per page, or into named groups, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (primary mode)
    Mcp,

    /// Display file name, size, and page count
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Extract a page range to a new PDF
    #[command(alias = "extract")]
    Range {
        /// PDF file to split
        path: PathBuf,

        /// Page range expression (e.g., "1-3, 5, 8-10")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split into one PDF per page
    #[command(alias = "burst")]
    Every {
        /// PDF file to split
        path: PathBuf,

        /// Write loose files into this directory instead of an archive
        #[arg(short, long, conflicts_with = "zip")]
        output_dir: Option<PathBuf>,

        /// Output archive (defaults to <stem>_all_pages.zip)
        #[arg(long)]
        zip: Option<PathBuf>,
    },

    /// Split into named groups, packaged as a ZIP archive
    Groups {
        /// PDF file to split
        path: PathBuf,

        /// Group as NAME=RANGE (e.g., "Chapter 1=1-5"); repeatable
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// JSON file of [{"name", "range"}] groups (the `suggest` output shape)
        #[arg(long)]
        groups_file: Option<PathBuf>,

        /// Permit pages claimed by more than one group
        #[arg(long)]
        allow_overlaps: bool,

        /// Output archive (defaults to <stem>_groups.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest chapter groups from document text using a generative model
    Suggest {
        /// PDF file to analyze
        path: PathBuf,

        /// Model to query
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// API key (defaults to the GEMINI_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,

        /// Write the suggested groups to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
