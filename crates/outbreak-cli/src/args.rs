//! Command-line argument definitions for the Outbreak CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the network source, the organism filter,
//! output paths, configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Outbreak transmission-network tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON network snapshot
    #[arg(help = "Path to a JSON network snapshot", conflicts_with = "api")]
    pub input: Option<String>,

    /// Base URL of the surveillance REST API to fetch the network from
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,

    /// Organism to show the transmission network for
    #[arg(long, value_name = "NAME")]
    pub organism: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "network.svg")]
    pub output: String,

    /// Also write the computed positions as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub positions: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
