//! CLI logic for the Outbreak transmission-network tool.
//!
//! Loads a network from a JSON snapshot or the surveillance REST API, lays
//! it out, and writes the SVG rendering (and optionally the positions).

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use outbreak::{
    NetworkRenderer, OutbreakError,
    config::AppConfig,
    fetch::{FileNetworkSource, HttpNetworkSource, NetworkSource},
};

/// Pick the network source: the input snapshot, then `--api`, then the
/// configured API base URL.
fn network_source(args: &Args, config: &AppConfig) -> Result<Box<dyn NetworkSource>, OutbreakError> {
    if let Some(input) = &args.input {
        return Ok(Box::new(FileNetworkSource::new(input)));
    }

    let base_url = args
        .api
        .as_deref()
        .or_else(|| config.source().api_base_url())
        .ok_or_else(|| {
            OutbreakError::Config(
                "no network source: pass a snapshot path, --api <URL>, or set source.api_base_url"
                    .to_string(),
            )
        })?;

    Ok(Box::new(HttpNetworkSource::with_config(
        base_url,
        config.source(),
    )))
}

/// Run the Outbreak CLI application
///
/// # Errors
///
/// Returns `OutbreakError` for:
/// - Configuration loading errors or a missing network source
/// - File I/O errors
/// - Network fetch and JSON decoding errors
/// - Rendering errors
pub async fn run(args: &Args) -> Result<(), OutbreakError> {
    info!(
        input:? = args.input,
        api:? = args.api,
        organism:? = args.organism,
        output_path = args.output;
        "Processing transmission network"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = network_source(args, &app_config)?;
    let network = source.fetch(args.organism.as_deref()).await?;

    let renderer = NetworkRenderer::new(app_config);
    let positions = renderer.layout(&network);
    let svg = renderer.render_svg_with(&network, &positions)?;

    fs::write(&args.output, svg)?;
    info!(output_file = args.output; "SVG exported successfully");

    if let Some(path) = &args.positions {
        fs::write(path, renderer.positions_json(&positions)?)?;
        info!(positions_file = path.as_str(); "Positions exported successfully");
    }

    Ok(())
}
