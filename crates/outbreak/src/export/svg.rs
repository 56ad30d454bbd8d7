//! SVG rendering of laid-out transmission networks.
//!
//! Links are drawn below nodes as straight lines between case boxes, clipped
//! to the box edges and ending in a category-colored arrow head. Links whose
//! confidence exceeds [`HIGHLIGHT_CONFIDENCE`] are dashed with an animated
//! dash offset. Non-empty networks get a legend of every known case role and
//! evidence kind below the cases.

mod palette;

pub use palette::{NodeColors, Palette};

use indexmap::IndexMap;
use log::{debug, info};
use svg::{Document, node::element as svg_element};

use outbreak_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    network::{CaseNode, LinkCategory, Network, NodeCategory, TransmissionLink},
};

use super::Error;
use crate::{config::StyleConfig, layout::Positions};

/// Width of a case box.
pub const NODE_WIDTH: f32 = 160.0;
/// Height of a case box.
pub const NODE_HEIGHT: f32 = 64.0;
/// Space between the outermost case boxes and the document edge.
pub const MARGIN: f32 = 50.0;
/// Links above this confidence are highlighted.
pub const HIGHLIGHT_CONFIDENCE: f32 = 0.7;

const MIN_STROKE_WIDTH: f32 = 1.5;
const FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";

const LEGEND_GAP: f32 = 40.0;
const LEGEND_ROW_HEIGHT: f32 = 24.0;
const LEGEND_TITLE_WIDTH: f32 = 90.0;
const LEGEND_ITEM_WIDTH: f32 = 130.0;

fn node_size() -> Size {
    Size::new(NODE_WIDTH, NODE_HEIGHT)
}

/// Two rows, one per category kind, wide enough for the longer one.
fn legend_size() -> Size {
    let items = NodeCategory::ALL.len().max(LinkCategory::ALL.len()) as f32;
    Size::new(
        LEGEND_ITEM_WIDTH.mul_add(items, LEGEND_TITLE_WIDTH),
        LEGEND_ROW_HEIGHT * 2.0,
    )
}

/// Stroke width of a link, growing with its confidence.
pub fn stroke_width(confidence: f32) -> f32 {
    (confidence * 3.0).max(MIN_STROKE_WIDTH)
}

/// Label drawn at the middle of a link, e.g. `Direct Contact (85%)`.
pub fn link_label(link: &TransmissionLink) -> String {
    format!(
        "{} ({}%)",
        link.category(),
        (link.confidence() * 100.0).round() as i32
    )
}

/// Returns true if the link is drawn highlighted.
pub fn is_highlighted(link: &TransmissionLink) -> bool {
    link.confidence() > HIGHLIGHT_CONFIDENCE
}

/// SVG renderer for transmission networks
#[derive(Debug, Clone)]
pub struct Svg {
    background: Option<Color>,
    palette: Palette,
}

impl Svg {
    /// Creates a renderer using the style settings of `style`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Style`] when a configured color cannot be parsed.
    pub fn new(style: &StyleConfig) -> Result<Self, Error> {
        let background = style.background_color().map_err(Error::Style)?;
        let palette = Palette::grayscale().map_err(|err| Error::Style(err.to_string()))?;
        Ok(Self {
            background,
            palette,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Renders the network at the given positions into an SVG document.
    ///
    /// Nodes and links without a position are left out.
    pub fn render(&self, network: &Network, positions: &Positions) -> Document {
        let case_bounds = Self::content_bounds(positions);
        let legend_origin = Point::new(case_bounds.min_x(), case_bounds.max_y() + LEGEND_GAP);
        let content_bounds = if positions.is_empty() {
            case_bounds
        } else {
            case_bounds.merge(&Self::legend_bounds(legend_origin))
        };
        let svg_size = content_bounds.to_size().add_margin(MARGIN);
        debug!(
            width = svg_size.width(),
            height = svg_size.height();
            "Final SVG dimensions"
        );

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());

        if let Some(background) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", svg_size.width())
                    .set("height", svg_size.height())
                    .set("fill", background),
            );
        }

        doc = doc.add(self.marker_definitions(network));

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - content_bounds.min_x(),
                MARGIN - content_bounds.min_y()
            ),
        );

        let mut links_group = svg_element::Group::new().set("class", "links");
        let mut drawn_links = 0;
        for (link_index, link) in network.links().iter().enumerate() {
            let (Some(&source), Some(&target)) =
                (positions.get(&link.source()), positions.get(&link.target()))
            else {
                debug!(
                    link_index = link_index,
                    from:% = link.source(),
                    to:% = link.target();
                    "Skipping link without positioned endpoints"
                );
                continue;
            };
            links_group = links_group.add(self.render_link(link, source, target));
            drawn_links += 1;
        }
        main_group = main_group.add(links_group);

        let mut nodes_group = svg_element::Group::new().set("class", "nodes");
        let mut drawn_nodes = 0;
        for node in network.nodes() {
            let Some(&position) = positions.get(&node.id()) else {
                debug!(id:% = node.id(); "Skipping case without a position");
                continue;
            };
            nodes_group = nodes_group.add(self.render_node(node, position));
            drawn_nodes += 1;
        }
        main_group = main_group.add(nodes_group);

        if !positions.is_empty() {
            main_group = main_group.add(self.render_legend(legend_origin));
        }

        info!(nodes = drawn_nodes, links = drawn_links; "SVG document rendered");
        doc.add(main_group)
    }

    /// Union of all case boxes, or empty bounds at the origin.
    fn content_bounds(positions: &Positions) -> Bounds {
        positions
            .values()
            .map(|position| position.to_bounds(node_size()))
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default()
    }

    fn legend_bounds(origin: Point) -> Bounds {
        let size = legend_size();
        origin
            .add_point(Point::new(size.width() / 2.0, size.height() / 2.0))
            .to_bounds(size)
    }

    fn marker_id(color: Color) -> String {
        format!("arrow-{}", color.to_id_safe_string())
    }

    /// One arrow-head marker per link color in use
    fn marker_definitions(&self, network: &Network) -> svg_element::Definitions {
        let colors: IndexMap<String, Color> = network
            .links()
            .iter()
            .map(|link| self.palette.link(link.category()))
            .map(|color| (Self::marker_id(color), color))
            .collect();

        colors
            .into_iter()
            .fold(svg_element::Definitions::new(), |defs, (id, color)| {
                defs.add(
                    svg_element::Marker::new()
                        .set("id", id)
                        .set("viewBox", "0 0 10 10")
                        .set("refX", 9)
                        .set("refY", 5)
                        .set("markerWidth", 6)
                        .set("markerHeight", 6)
                        .set("orient", "auto")
                        .add(
                            svg_element::Path::new()
                                .set("d", "M 0 0 L 10 5 L 0 10 z")
                                .set("fill", color),
                        ),
                )
            })
    }

    fn render_link(
        &self,
        link: &TransmissionLink,
        source: Point,
        target: Point,
    ) -> svg_element::Group {
        let color = self.palette.link(link.category());

        // Clip the line to the box edges so the arrow head stays visible
        let start = source.to_bounds(node_size()).edge_toward(target);
        let end = target.to_bounds(node_size()).edge_toward(source);

        let mut line = svg_element::Line::new()
            .set("x1", start.x())
            .set("y1", start.y())
            .set("x2", end.x())
            .set("y2", end.y())
            .set("stroke", color)
            .set("stroke-width", stroke_width(link.confidence()))
            .set("marker-end", format!("url(#{})", Self::marker_id(color)));

        if is_highlighted(link) {
            line = line.set("stroke-dasharray", "6 4").add(
                svg_element::Animate::new()
                    .set("attributeName", "stroke-dashoffset")
                    .set("from", 20)
                    .set("to", 0)
                    .set("dur", "1s")
                    .set("repeatCount", "indefinite"),
            );
        }

        let midpoint = start.midpoint(end);
        let label = svg_element::Text::new("")
            .set("x", midpoint.x())
            .set("y", midpoint.y() - 6.0)
            .set("text-anchor", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", 10)
            .set("fill", self.palette.muted_text())
            .add(svg::node::Text::new(link_label(link)));

        svg_element::Group::new()
            .set("class", "link")
            .add(line)
            .add(label)
    }

    fn legend_text(&self, x: f32, row: f32, content: &str) -> svg_element::Text {
        svg_element::Text::new("")
            .set("x", x)
            .set("y", row + LEGEND_ROW_HEIGHT / 2.0 + 4.0)
            .set("font-family", FONT_FAMILY)
            .set("font-size", 11)
            .set("fill", self.palette.muted_text())
            .add(svg::node::Text::new(content))
    }

    /// Legend rows for case roles and evidence kinds, drawn from `origin` down
    fn render_legend(&self, origin: Point) -> svg_element::Group {
        let mut group = svg_element::Group::new()
            .set("class", "legend")
            .set(
                "transform",
                format!("translate({}, {})", origin.x(), origin.y()),
            )
            .add(self.legend_text(0.0, 0.0, "NODE TYPES").set("font-weight", 600))
            .add(
                self.legend_text(0.0, LEGEND_ROW_HEIGHT, "LINK TYPES")
                    .set("font-weight", 600),
            );

        for (i, category) in NodeCategory::ALL.into_iter().enumerate() {
            let x = LEGEND_ITEM_WIDTH.mul_add(i as f32, LEGEND_TITLE_WIDTH);
            group = group
                .add(
                    svg_element::Circle::new()
                        .set("cx", x + 5.0)
                        .set("cy", LEGEND_ROW_HEIGHT / 2.0)
                        .set("r", 5)
                        .set("fill", self.palette.node(category).border()),
                )
                .add(self.legend_text(x + 16.0, 0.0, category.as_str()));
        }

        for (i, category) in LinkCategory::ALL.into_iter().enumerate() {
            let x = LEGEND_ITEM_WIDTH.mul_add(i as f32, LEGEND_TITLE_WIDTH);
            group = group
                .add(
                    svg_element::Rectangle::new()
                        .set("x", x)
                        .set("y", LEGEND_ROW_HEIGHT * 1.5 - 1.0)
                        .set("width", 16)
                        .set("height", 2)
                        .set("fill", self.palette.link(category)),
                )
                .add(self.legend_text(x + 22.0, LEGEND_ROW_HEIGHT, category.as_str()));
        }

        group
    }

    fn render_node(&self, node: &CaseNode, position: Point) -> svg_element::Group {
        let colors = self.palette.node(node.category());
        let top_left = position.sub_point(Point::new(NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0));

        let text = |x: f32, y: f32, size: u32, color: Color, content: String| {
            svg_element::Text::new("")
                .set("x", x)
                .set("y", y)
                .set("font-family", FONT_FAMILY)
                .set("font-size", size)
                .set("fill", color)
                .add(svg::node::Text::new(content))
        };

        svg_element::Group::new()
            .set("class", "case")
            .set("data-case", node.id().to_string())
            .set(
                "transform",
                format!("translate({}, {})", top_left.x(), top_left.y()),
            )
            .add(
                svg_element::Rectangle::new()
                    .set("width", NODE_WIDTH)
                    .set("height", NODE_HEIGHT)
                    .set("rx", 8)
                    .set("fill", colors.fill())
                    .set("stroke", colors.border())
                    .set("stroke-width", 1.5),
            )
            .add(
                svg_element::Circle::new()
                    .set("cx", 14)
                    .set("cy", 16)
                    .set("r", 4)
                    .set("fill", colors.border()),
            )
            .add(
                text(24.0, 20.0, 12, self.palette.text(), node.name().to_string())
                    .set("font-weight", 600),
            )
            .add(text(
                10.0,
                38.0,
                10,
                self.palette.muted_text(),
                node.ward().to_string(),
            ))
            .add(text(
                10.0,
                54.0,
                10,
                self.palette.muted_text(),
                format!("{} - {}", node.category(), node.organism()),
            ))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use outbreak_core::identifier::Id;

    use super::*;
    use crate::layout::layout;

    fn case(id: &str, category: NodeCategory) -> CaseNode {
        CaseNode::new(
            Id::new(id),
            format!("Patient {id}"),
            "Ward 4B".to_string(),
            "MRSA".to_string(),
            "2024-03-01T08:00:00Z".to_string(),
            category,
        )
    }

    fn link(source: &str, target: &str, confidence: f32) -> TransmissionLink {
        TransmissionLink::new(
            Id::new(source),
            Id::new(target),
            LinkCategory::DirectContact,
            confidence,
            String::new(),
        )
    }

    fn sample_network() -> Network {
        Network::new(
            vec![
                case("svg-i", NodeCategory::Index),
                case("svg-a", NodeCategory::Secondary),
                case("svg-b", NodeCategory::HealthcareWorker),
            ],
            vec![
                link("svg-i", "svg-a", 0.9),
                link("svg-a", "svg-b", 0.4),
                link("svg-b", "svg-ghost", 0.5),
            ],
            "MRSA".to_string(),
            3,
        )
    }

    fn render(network: &Network) -> String {
        let svg = Svg::new(&StyleConfig::default()).unwrap();
        let positions = layout(network.nodes(), network.links());
        svg.render(network, &positions).to_string()
    }

    #[test]
    fn test_stroke_width() {
        assert!(approx_eq!(f32, stroke_width(0.2), 1.5));
        assert!(approx_eq!(f32, stroke_width(0.5), 1.5));
        assert!(approx_eq!(f32, stroke_width(0.9), 2.7, epsilon = 0.0001));
        assert!(approx_eq!(f32, stroke_width(1.0), 3.0));
    }

    #[test]
    fn test_link_label_rounds_confidence() {
        assert_eq!(link_label(&link("a", "b", 0.856)), "Direct Contact (86%)");
        assert_eq!(link_label(&link("a", "b", 0.4)), "Direct Contact (40%)");
    }

    #[test]
    fn test_highlight_threshold() {
        assert!(is_highlighted(&link("a", "b", 0.71)));
        assert!(!is_highlighted(&link("a", "b", 0.7)));
    }

    #[test]
    fn test_renders_every_positioned_node_and_drawable_link() {
        let output = render(&sample_network());

        assert_eq!(output.matches("data-case=").count(), 3);
        // The link to the unknown case has no position
        assert_eq!(output.matches("<line").count(), 2);
        assert_eq!(output.matches("<animate").count(), 1);
        assert!(output.contains("Patient svg-a"));
        assert!(output.contains("Direct Contact (90%)"));
    }

    #[test]
    fn test_legend_lists_every_known_category() {
        let output = render(&sample_network());

        assert_eq!(output.matches("class=\"legend\"").count(), 1);
        for category in NodeCategory::ALL {
            assert!(output.contains(category.as_str()), "{category}");
        }
        // Not used by any sample link, so only the legend can supply it
        assert!(output.contains("Shared Equipment"));
        // Legend swatches are not links
        assert_eq!(output.matches("<line").count(), 2);
    }

    #[test]
    fn test_document_makes_room_for_legend() {
        let network = sample_network();
        let positions = layout(network.nodes(), network.links());
        let cases = Svg::content_bounds(&positions);
        let legend_top = cases.max_y() + LEGEND_GAP;
        let legend = Svg::legend_bounds(Point::new(cases.min_x(), legend_top));

        assert!(approx_eq!(f32, legend.min_y(), legend_top, epsilon = 1e-3));
        assert!(approx_eq!(f32, legend.height(), LEGEND_ROW_HEIGHT * 2.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, legend.width(), 740.0, epsilon = 1e-3));

        let output = render(&network);
        let size = cases.merge(&legend).to_size().add_margin(MARGIN);
        assert!(size.height() > cases.height() + LEGEND_GAP);
        assert!(output.contains(&format!("height=\"{}\"", size.height())));
    }

    #[test]
    fn test_unknown_categories_render_with_fallback_colors() {
        let network = Network::new(
            vec![
                case("svg-u", NodeCategory::Unknown),
                case("svg-x", NodeCategory::Index),
            ],
            vec![TransmissionLink::new(
                Id::new("svg-x"),
                Id::new("svg-u"),
                LinkCategory::Unknown,
                0.5,
                String::new(),
            )],
            "MRSA".to_string(),
            2,
        );
        let output = render(&network);

        assert_eq!(output.matches("data-case=").count(), 2);
        assert_eq!(output.matches("<line").count(), 1);
        let fallback = Color::new("#94a3b8").unwrap();
        assert!(output.contains(&format!("stroke=\"{fallback}\"")));
        assert!(output.contains("Unknown (50%)"));
    }

    #[test]
    fn test_one_marker_per_link_color() {
        let output = render(&sample_network());
        assert_eq!(output.matches("<marker").count(), 1);
    }

    #[test]
    fn test_empty_network() {
        let network = Network::default();
        let output = render(&network);

        assert!(output.contains("<svg"));
        assert!(output.contains("viewBox=\"0 0 100 100\""));
        assert_eq!(output.matches("data-case=").count(), 0);
    }

    #[test]
    fn test_background() {
        let style = StyleConfig::new(Some("white".to_string()));
        let svg = Svg::new(&style).unwrap();
        let output = svg.render(&Network::default(), &Positions::new()).to_string();
        assert!(output.contains("<rect"));

        let style = StyleConfig::new(Some("not a color".to_string()));
        assert!(matches!(Svg::new(&style), Err(Error::Style(_))));
    }

    #[test]
    fn test_content_bounds_cover_all_boxes() {
        let network = sample_network();
        let positions = layout(network.nodes(), network.links());
        let bounds = Svg::content_bounds(&positions);

        for position in positions.values() {
            let node = position.to_bounds(node_size());
            assert!(bounds.contains(node.min_point()));
            assert!(bounds.contains(Point::new(node.max_x(), node.max_y())));
        }
    }
}
