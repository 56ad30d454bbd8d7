//! Radial transmission-network layout.
//!
//! Places case nodes on concentric tiers around a fixed hub so that
//! epidemiological proximity to the presumed source reads as proximity to
//! the center:
//!
//! ```text
//!                 outer ring (r = 380)
//!             .  -  ~  ~  ~  -  .
//!         .'     inner ring (r = 220)'.
//!       /      .-  ~  ~  -.          \
//!      |     /    [I] [I]   \         |     [I] index cases at the hub
//!       \      '-  .  .  -'          /
//!         '.                     .'
//!             '  -  .  .  -  '
//! ```
//!
//! - **Hub**: every `Index` case, spread horizontally around the center.
//! - **Inner ring**: non-index cases sharing a link with an index case.
//! - **Outer ring**: every other non-index case, including isolated ones.
//!
//! Classification is a one-hop membership test, not a traversal: a case
//! linked only to an inner-ring case lands on the outer ring no matter how
//! short the chain is. Link confidence and multiplicity never affect
//! placement.
//!
//! The layout is a pure function of its inputs and never fails. Links that
//! reference unknown cases are ignored for classification and logged.

use std::{
    collections::{HashMap, HashSet},
    f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU},
};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use outbreak_core::{
    geometry::Point,
    identifier::Id,
    network::{CaseNode, TransmissionLink},
};

/// Node positions keyed by case id, iterating in node input order.
pub type Positions = IndexMap<Id, Point>;

/// X coordinate of the layout center.
pub const CENTER_X: f32 = 400.0;
/// Y coordinate of the layout center.
pub const CENTER_Y: f32 = 300.0;
/// Horizontal distance between neighbouring index cases at the hub.
pub const INDEX_SPACING: f32 = 120.0;
/// Radius of the ring holding directly connected cases.
pub const INNER_RADIUS: f32 = 220.0;
/// Radius of the ring holding indirectly connected cases.
pub const OUTER_RADIUS: f32 = 380.0;
/// Angle of the first inner-ring slot (straight up).
pub const INNER_START_ANGLE: f32 = -FRAC_PI_2;
/// Angle of the first outer-ring slot, an eighth-turn past the inner ring's.
pub const OUTER_START_ANGLE: f32 = -FRAC_PI_4;

/// Returns the layout center.
pub fn center() -> Point {
    Point::new(CENTER_X, CENTER_Y)
}

/// Placement tier of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Index cases at the center.
    Hub,
    /// Cases with a link to an index case.
    Inner,
    /// All remaining cases.
    Outer,
}

/// Cases grouped by placement tier, each group in node input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tiers {
    hub: Vec<Id>,
    inner: Vec<Id>,
    outer: Vec<Id>,
}

impl Tiers {
    /// Partitions `nodes` into tiers using the one-hop adjacency of `links`.
    pub fn classify(nodes: &[CaseNode], links: &[TransmissionLink]) -> Self {
        let known: HashSet<Id> = nodes.iter().map(CaseNode::id).collect();
        let index_ids: HashSet<Id> = nodes
            .iter()
            .filter(|node| node.is_index())
            .map(CaseNode::id)
            .collect();

        let mut direct = HashSet::new();
        for (link_index, link) in links.iter().enumerate() {
            for endpoint in [link.source(), link.target()] {
                if !known.contains(&endpoint) {
                    warn!(
                        link_index = link_index,
                        from:% = link.source(),
                        to:% = link.target(),
                        missing:% = endpoint;
                        "Link references an unknown case, ignoring it for placement"
                    );
                }
            }

            if index_ids.contains(&link.source()) {
                direct.insert(link.target());
            }
            if index_ids.contains(&link.target()) {
                direct.insert(link.source());
            }
        }

        let mut tiers = Tiers::default();
        for node in nodes {
            let id = node.id();
            if node.is_index() {
                tiers.hub.push(id);
            } else if direct.contains(&id) {
                tiers.inner.push(id);
            } else {
                tiers.outer.push(id);
            }
        }
        tiers
    }

    /// Index cases placed at the hub
    pub fn hub(&self) -> &[Id] {
        &self.hub
    }

    /// Directly connected cases placed on the inner ring
    pub fn inner(&self) -> &[Id] {
        &self.inner
    }

    /// Indirectly connected cases placed on the outer ring
    pub fn outer(&self) -> &[Id] {
        &self.outer
    }

    /// Returns the tier of `id`, if it was classified.
    pub fn tier_of(&self, id: Id) -> Option<Tier> {
        if self.hub.contains(&id) {
            Some(Tier::Hub)
        } else if self.inner.contains(&id) {
            Some(Tier::Inner)
        } else if self.outer.contains(&id) {
            Some(Tier::Outer)
        } else {
            None
        }
    }
}

/// Computes the radial layout of a transmission network.
///
/// Every node receives exactly one position; the returned map iterates in
/// node input order. An empty node list yields an empty map.
///
/// # Examples
///
/// ```
/// use outbreak::layout::layout;
/// use outbreak_core::{identifier::Id, network::{CaseNode, NodeCategory}};
///
/// let index = CaseNode::new(Id::new("idx"), "A. Smith", "ICU", "MRSA", "", NodeCategory::Index);
/// let positions = layout(&[index], &[]);
///
/// let hub = positions[&Id::new("idx")];
/// assert_eq!((hub.x(), hub.y()), (400.0, 300.0));
/// ```
pub fn layout(nodes: &[CaseNode], links: &[TransmissionLink]) -> Positions {
    if nodes.is_empty() {
        return Positions::new();
    }

    debug!(nodes = nodes.len(), links = links.len(); "Computing radial layout");

    let tiers = Tiers::classify(nodes, links);
    debug!(
        hub = tiers.hub.len(),
        inner = tiers.inner.len(),
        outer = tiers.outer.len();
        "Classified cases into tiers"
    );

    let mut placed: HashMap<Id, Point> = HashMap::with_capacity(nodes.len());
    place_hub(&tiers.hub, &mut placed);
    if !tiers.inner.is_empty() {
        place_ring(&tiers.inner, INNER_RADIUS, INNER_START_ANGLE, &mut placed);
    }
    place_ring(&tiers.outer, OUTER_RADIUS, OUTER_START_ANGLE, &mut placed);

    nodes
        .iter()
        .filter_map(|node| placed.get(&node.id()).map(|point| (node.id(), *point)))
        .collect()
}

/// Spreads index cases horizontally around the center.
fn place_hub(ids: &[Id], placed: &mut HashMap<Id, Point>) {
    let midpoint = (ids.len() as f32 - 1.0) / 2.0;
    for (i, id) in ids.iter().enumerate() {
        let offset = (i as f32 - midpoint) * INDEX_SPACING;
        let point = Point::new(CENTER_X + offset, CENTER_Y);
        trace!(id:% = id, x = point.x(), y = point.y(); "Placed index case");
        placed.insert(*id, point);
    }
}

/// Distributes `ids` evenly on a circle, the first one at `start_angle`.
fn place_ring(ids: &[Id], radius: f32, start_angle: f32, placed: &mut HashMap<Id, Point>) {
    let slots = ids.len().max(1) as f32;
    for (i, id) in ids.iter().enumerate() {
        let angle = (i as f32 / slots) * TAU + start_angle;
        let point = Point::on_circle(center(), radius, angle);
        trace!(id:% = id, radius = radius, angle = angle; "Placed ring case");
        placed.insert(*id, point);
    }
}
