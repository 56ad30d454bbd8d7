//! Outbreak - radial layout and rendering of hospital transmission networks.
//!
//! Loads suspected pathogen-transmission networks from a surveillance REST
//! API or a JSON snapshot, places the cases on concentric rings around the
//! index cases, and renders the result to SVG.

pub mod config;
pub mod export;
pub mod fetch;
pub mod generation;
pub mod layout;
pub mod view;

mod error;

pub use outbreak_core::{color, geometry, identifier, network};

pub use error::OutbreakError;

use log::{debug, info, trace, warn};

use config::AppConfig;
use export::svg::Svg;
use layout::Positions;
use network::{IntegrityIssue, Network};

/// Builder for loading, laying out and rendering transmission networks.
///
/// # Examples
///
/// ```rust
/// use outbreak::{NetworkRenderer, config::AppConfig};
///
/// let source = r#"{
///     "nodes": [{
///         "id": "p1", "patientName": "Patient 1", "ward": "ICU",
///         "organism": "MRSA", "detectedAt": "2024-03-01", "nodeType": "Index"
///     }],
///     "links": [],
///     "organism": "MRSA",
///     "totalCases": 1
/// }"#;
///
/// let renderer = NetworkRenderer::new(AppConfig::default());
/// let network = renderer.parse(source, None).expect("Failed to parse");
///
/// let svg = renderer.render_svg(&network).expect("Failed to render");
/// assert!(svg.contains("Patient 1"));
/// ```
#[derive(Debug, Default)]
pub struct NetworkRenderer {
    config: AppConfig,
}

impl NetworkRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON network snapshot.
    ///
    /// See [`fetch::parse_snapshot`] for the accepted shapes.
    ///
    /// # Errors
    ///
    /// Returns `OutbreakError` for malformed JSON or when no network in the
    /// snapshot matches `organism`.
    pub fn parse(&self, source: &str, organism: Option<&str>) -> Result<Network, OutbreakError> {
        info!("Parsing network snapshot");
        let network = fetch::parse_snapshot(source, organism)?;

        debug!(
            organism = network.organism(),
            nodes = network.node_count(),
            links = network.link_count();
            "Network parsed successfully"
        );
        trace!(network:?; "Parsed network");

        Ok(network)
    }

    /// Compute node positions, reporting data-integrity problems as warnings.
    ///
    /// Dangling link endpoints are reported by [`layout::layout`] itself.
    pub fn layout(&self, network: &Network) -> Positions {
        for issue in Self::unreported_issues(network) {
            warn!(organism = network.organism(); "{issue}");
        }
        layout::layout(network.nodes(), network.links())
    }

    /// Integrity issues the layout does not log on its own.
    fn unreported_issues(network: &Network) -> Vec<IntegrityIssue> {
        network
            .integrity_issues()
            .into_iter()
            .filter(|issue| !matches!(issue, IntegrityIssue::DanglingEndpoint { .. }))
            .collect()
    }

    /// Lay out and render a network to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `OutbreakError` when the configured style is invalid.
    pub fn render_svg(&self, network: &Network) -> Result<String, OutbreakError> {
        let positions = self.layout(network);
        self.render_svg_with(network, &positions)
    }

    /// Render a network at precomputed positions to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `OutbreakError` when the configured style is invalid.
    pub fn render_svg_with(
        &self,
        network: &Network,
        positions: &Positions,
    ) -> Result<String, OutbreakError> {
        info!(organism = network.organism(); "Rendering network to SVG");
        let svg = Svg::new(self.config.style())?;
        let doc = svg.render(network, positions);
        Ok(doc.to_string())
    }

    /// Serialize positions as a JSON object keyed by case id, in node order.
    ///
    /// # Errors
    ///
    /// Returns `OutbreakError` when serialization fails.
    pub fn positions_json(&self, positions: &Positions) -> Result<String, OutbreakError> {
        let json = serde_json::to_string_pretty(positions).map_err(export::Error::from)?;
        Ok(json)
    }
}
