//! Category colors for nodes and links.

use std::collections::HashMap;

use outbreak_core::{
    color::{Color, InvalidColor},
    network::{LinkCategory, NodeCategory},
};

const LINK_COLORS: [(LinkCategory, &str); 5] = [
    (LinkCategory::DirectContact, "#171717"),
    (LinkCategory::SharedEquipment, "#404040"),
    (LinkCategory::WardProximity, "#525252"),
    (LinkCategory::TemporalLink, "#737373"),
    (LinkCategory::Environmental, "#a3a3a3"),
];

// (category, fill, border)
const NODE_COLORS: [(NodeCategory, &str, &str); 5] = [
    (NodeCategory::Index, "#f5f5f5", "#404040"),
    (NodeCategory::Secondary, "#e5e5e5", "#525252"),
    (NodeCategory::Environmental, "#fafafa", "#737373"),
    (NodeCategory::HealthcareWorker, "#f5f5f5", "#737373"),
    (NodeCategory::SuspectedSource, "#fafafa", "#a3a3a3"),
];

// Categories outside the tables above
const FALLBACK_LINK_COLOR: &str = "#94a3b8";
const FALLBACK_NODE_CATEGORY: NodeCategory = NodeCategory::SuspectedSource;

const TEXT_COLOR: &str = "#171717";
const MUTED_TEXT_COLOR: &str = "#737373";

/// Fill and border of a case box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeColors {
    fill: Color,
    border: Color,
}

impl NodeColors {
    pub fn fill(self) -> Color {
        self.fill
    }

    pub fn border(self) -> Color {
        self.border
    }
}

/// Resolved colors for every node and link category.
#[derive(Debug, Clone)]
pub struct Palette {
    links: HashMap<LinkCategory, Color>,
    nodes: HashMap<NodeCategory, NodeColors>,
    fallback_link: Color,
    fallback_node: NodeColors,
    text: Color,
    muted_text: Color,
}

impl Palette {
    /// Builds the neutral grayscale palette used by the investigation view.
    pub fn grayscale() -> Result<Self, InvalidColor> {
        let links: HashMap<_, _> = LINK_COLORS
            .iter()
            .map(|&(category, hex)| -> Result<_, InvalidColor> {
                Ok((category, Color::new(hex)?))
            })
            .collect::<Result<_, _>>()?;

        let nodes: HashMap<_, _> = NODE_COLORS
            .iter()
            .map(|&(category, fill, border)| -> Result<_, InvalidColor> {
                let colors = NodeColors {
                    fill: Color::new(fill)?,
                    border: Color::new(border)?,
                };
                Ok((category, colors))
            })
            .collect::<Result<_, _>>()?;

        let text = Color::new(TEXT_COLOR)?;
        let fallback_node = nodes
            .get(&FALLBACK_NODE_CATEGORY)
            .copied()
            .unwrap_or(NodeColors {
                fill: text,
                border: text,
            });

        Ok(Self {
            links,
            nodes,
            fallback_link: Color::new(FALLBACK_LINK_COLOR)?,
            fallback_node,
            text,
            muted_text: Color::new(MUTED_TEXT_COLOR)?,
        })
    }

    /// Stroke color of a link
    pub fn link(&self, category: LinkCategory) -> Color {
        self.links
            .get(&category)
            .copied()
            .unwrap_or(self.fallback_link)
    }

    /// Fill and border of a case box. Unrecognized roles are drawn like
    /// suspected sources.
    pub fn node(&self, category: NodeCategory) -> NodeColors {
        self.nodes
            .get(&category)
            .copied()
            .unwrap_or(self.fallback_node)
    }

    pub fn text(&self) -> Color {
        self.text
    }

    pub fn muted_text(&self) -> Color {
        self.muted_text
    }
}
