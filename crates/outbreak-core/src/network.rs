//! Transmission network model.
//!
//! A [`Network`] is the outbreak-investigation graph for one organism: the
//! [`CaseNode`]s detected with that organism and the [`TransmissionLink`]s
//! epidemiologists suspect between them. Networks are produced fresh by every
//! fetch and are never mutated after loading.
//!
//! The serde representation matches the surveillance REST API (camelCase
//! field names, display-style category names), so a network can be
//! deserialized straight from a response body or a saved snapshot:
//!
//! ```
//! # use outbreak_core::network::{Network, NodeCategory};
//! let json = r#"{
//!     "nodes": [
//!         {"id": "p1", "patientName": "A. Smith", "ward": "ICU", "organism": "MRSA",
//!          "detectedAt": "2024-03-02T08:15:00Z", "nodeType": "Index"}
//!     ],
//!     "links": [],
//!     "organism": "MRSA",
//!     "totalCases": 1
//! }"#;
//!
//! let network: Network = serde_json::from_str(json).unwrap();
//! assert_eq!(network.nodes()[0].category(), NodeCategory::Index);
//! ```

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::Id;

/// Error returned when a category name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} category `{name}`")]
pub struct ParseCategoryError {
    kind: &'static str,
    name: String,
}

/// Epidemiological role of a case in the transmission network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// The presumed originating case of the outbreak chain.
    Index,
    Secondary,
    Environmental,
    #[serde(rename = "HCW", alias = "Healthcare-Worker", alias = "HealthcareWorker")]
    HealthcareWorker,
    #[serde(rename = "Suspected Source", alias = "Suspected-Source", alias = "SuspectedSource")]
    SuspectedSource,
    /// Any role the server reports that is not listed above.
    #[serde(other)]
    Unknown,
}

impl NodeCategory {
    /// All known categories, in legend order.
    pub const ALL: [NodeCategory; 5] = [
        NodeCategory::Index,
        NodeCategory::Secondary,
        NodeCategory::Environmental,
        NodeCategory::HealthcareWorker,
        NodeCategory::SuspectedSource,
    ];

    /// The display name used on the wire and in legends.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Index => "Index",
            NodeCategory::Secondary => "Secondary",
            NodeCategory::Environmental => "Environmental",
            NodeCategory::HealthcareWorker => "HCW",
            NodeCategory::SuspectedSource => "Suspected Source",
            NodeCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Index" => Ok(NodeCategory::Index),
            "Secondary" => Ok(NodeCategory::Secondary),
            "Environmental" => Ok(NodeCategory::Environmental),
            "HCW" | "Healthcare-Worker" | "HealthcareWorker" => {
                Ok(NodeCategory::HealthcareWorker)
            }
            "Suspected Source" | "Suspected-Source" | "SuspectedSource" => {
                Ok(NodeCategory::SuspectedSource)
            }
            _ => Err(ParseCategoryError {
                kind: "node",
                name: s.to_string(),
            }),
        }
    }
}

/// Kind of evidence behind a suspected transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkCategory {
    #[serde(rename = "Direct Contact")]
    DirectContact,
    #[serde(rename = "Shared Equipment")]
    SharedEquipment,
    #[serde(rename = "Ward Proximity")]
    WardProximity,
    #[serde(rename = "Temporal Link")]
    TemporalLink,
    Environmental,
    /// Any evidence kind the server reports that is not listed above.
    #[serde(other)]
    Unknown,
}

impl LinkCategory {
    /// All known categories, in legend order.
    pub const ALL: [LinkCategory; 5] = [
        LinkCategory::DirectContact,
        LinkCategory::SharedEquipment,
        LinkCategory::WardProximity,
        LinkCategory::TemporalLink,
        LinkCategory::Environmental,
    ];

    /// The display name used on the wire and in legends.
    pub fn as_str(self) -> &'static str {
        match self {
            LinkCategory::DirectContact => "Direct Contact",
            LinkCategory::SharedEquipment => "Shared Equipment",
            LinkCategory::WardProximity => "Ward Proximity",
            LinkCategory::TemporalLink => "Temporal Link",
            LinkCategory::Environmental => "Environmental",
            LinkCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseCategoryError {
                kind: "link",
                name: s.to_string(),
            })
    }
}

/// A detected case in the transmission network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseNode {
    id: Id,
    #[serde(rename = "patientName")]
    name: String,
    ward: String,
    organism: String,
    detected_at: String,
    #[serde(rename = "nodeType")]
    category: NodeCategory,
}

impl CaseNode {
    /// Creates a new case node.
    pub fn new(
        id: Id,
        name: impl Into<String>,
        ward: impl Into<String>,
        organism: impl Into<String>,
        detected_at: impl Into<String>,
        category: NodeCategory,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ward: ward.into(),
            organism: organism.into(),
            detected_at: detected_at.into(),
            category,
        }
    }

    /// Returns the unique identifier of the case
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the display name of the case
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ward(&self) -> &str {
        &self.ward
    }

    pub fn organism(&self) -> &str {
        &self.organism
    }

    /// Returns the detection timestamp exactly as supplied by the server
    pub fn detected_at(&self) -> &str {
        &self.detected_at
    }

    pub fn category(&self) -> NodeCategory {
        self.category
    }

    /// Returns true for index cases
    pub fn is_index(&self) -> bool {
        self.category == NodeCategory::Index
    }
}

/// A suspected transmission from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionLink {
    #[serde(rename = "sourceId")]
    source: Id,
    #[serde(rename = "targetId")]
    target: Id,
    #[serde(rename = "linkType")]
    category: LinkCategory,
    confidence: f32,
    #[serde(default)]
    evidence: String,
}

impl TransmissionLink {
    /// Creates a new transmission link.
    pub fn new(
        source: Id,
        target: Id,
        category: LinkCategory,
        confidence: f32,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            category,
            confidence,
            evidence: evidence.into(),
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn category(&self) -> LinkCategory {
        self.category
    }

    /// Returns the confidence of the link, nominally in `[0, 1]`
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn evidence(&self) -> &str {
        &self.evidence
    }

    /// Returns the endpoint opposite to `id`, or `None` if `id` is not an endpoint.
    ///
    /// For a self-loop the node itself is returned.
    pub fn other_endpoint(&self, id: Id) -> Option<Id> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Direction of a link relative to the node it is viewed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The viewed node is the link source.
    Outgoing,
    /// The viewed node is the link target.
    Incoming,
}

/// A link seen from one of its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Connection<'a> {
    link: &'a TransmissionLink,
    direction: Direction,
    other_id: Id,
    other: Option<&'a CaseNode>,
}

impl<'a> Connection<'a> {
    pub fn link(&self) -> &'a TransmissionLink {
        self.link
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Identifier of the other endpoint
    pub fn other_id(&self) -> Id {
        self.other_id
    }

    /// The other endpoint, if it is present in the node set
    pub fn other(&self) -> Option<&'a CaseNode> {
        self.other
    }

    /// Display label for the other endpoint, falling back to its id
    pub fn other_label(&self) -> String {
        self.other
            .map(|node| node.name().to_string())
            .unwrap_or_else(|| self.other_id.to_string())
    }
}

/// A data-integrity problem found in a network.
///
/// None of these prevent layout or rendering; they are reported so that
/// inconsistent upstream data is visible during development.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    /// A link endpoint does not name any node in the network.
    DanglingEndpoint { link_index: usize, missing: Id },
    /// Two or more nodes share the same identifier.
    DuplicateNode { id: Id },
    /// A link confidence lies outside `[0, 1]`.
    ConfidenceOutOfRange { link_index: usize, confidence: f32 },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DanglingEndpoint {
                link_index,
                missing,
            } => write!(f, "link #{link_index} references unknown case `{missing}`"),
            IntegrityIssue::DuplicateNode { id } => write!(f, "case `{id}` appears more than once"),
            IntegrityIssue::ConfidenceOutOfRange {
                link_index,
                confidence,
            } => write!(
                f,
                "link #{link_index} has confidence {confidence} outside [0, 1]"
            ),
        }
    }
}

/// The transmission network for one organism filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(default)]
    nodes: Vec<CaseNode>,
    #[serde(default)]
    links: Vec<TransmissionLink>,
    #[serde(default)]
    organism: String,
    #[serde(default)]
    total_cases: usize,
}

impl Network {
    /// Creates a new network.
    pub fn new(
        nodes: Vec<CaseNode>,
        links: Vec<TransmissionLink>,
        organism: impl Into<String>,
        total_cases: usize,
    ) -> Self {
        Self {
            nodes,
            links,
            organism: organism.into(),
            total_cases,
        }
    }

    /// Returns the case nodes in received order
    pub fn nodes(&self) -> &[CaseNode] {
        &self.nodes
    }

    /// Returns the transmission links in received order
    pub fn links(&self) -> &[TransmissionLink] {
        &self.links
    }

    /// Returns the organism label the network was fetched for
    pub fn organism(&self) -> &str {
        &self.organism
    }

    /// Number of cases linked to the outbreak, as reported by the server.
    ///
    /// This may exceed [`Network::node_count`] when the server counts cases
    /// that are not part of the drawn graph.
    pub fn case_count(&self) -> usize {
        self.total_cases
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id. With duplicate ids the first one wins.
    pub fn node(&self, id: Id) -> Option<&CaseNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.node(id).is_some()
    }

    /// Returns every link touching `id`, in link order, seen from `id`.
    pub fn connections(&self, id: Id) -> Vec<Connection<'_>> {
        self.links
            .iter()
            .filter_map(|link| {
                let other_id = link.other_endpoint(id)?;
                let direction = if link.source() == id {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                };
                Some(Connection {
                    link,
                    direction,
                    other_id,
                    other: self.node(other_id),
                })
            })
            .collect()
    }

    /// Reports data-integrity problems without failing.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut reported = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id()) && reported.insert(node.id()) {
                issues.push(IntegrityIssue::DuplicateNode { id: node.id() });
            }
        }

        for (link_index, link) in self.links.iter().enumerate() {
            for endpoint in [link.source(), link.target()] {
                if !seen.contains(&endpoint) {
                    issues.push(IntegrityIssue::DanglingEndpoint {
                        link_index,
                        missing: endpoint,
                    });
                }
            }
            if !(0.0..=1.0).contains(&link.confidence()) {
                issues.push(IntegrityIssue::ConfidenceOutOfRange {
                    link_index,
                    confidence: link.confidence(),
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, category: NodeCategory) -> CaseNode {
        CaseNode::new(
            Id::new(id),
            format!("Patient {id}"),
            "ICU",
            "MRSA",
            "2024-03-02T08:15:00Z",
            category,
        )
    }

    fn link(source: &str, target: &str) -> TransmissionLink {
        TransmissionLink::new(
            Id::new(source),
            Id::new(target),
            LinkCategory::DirectContact,
            0.8,
            "shared bay",
        )
    }

    #[test]
    fn test_node_category_wire_names() {
        for category in NodeCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(category.as_str().parse::<NodeCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_node_category_aliases() {
        let hcw: NodeCategory = serde_json::from_str("\"Healthcare-Worker\"").unwrap();
        assert_eq!(hcw, NodeCategory::HealthcareWorker);

        let source: NodeCategory = "Suspected-Source".parse().unwrap();
        assert_eq!(source, NodeCategory::SuspectedSource);

        assert!("Tertiary".parse::<NodeCategory>().is_err());
    }

    #[test]
    fn test_unrecognized_categories_are_kept() {
        let json = r#"{
            "nodes": [
                {"id": "u1", "patientName": "C. Visitor", "ward": "Lobby", "organism": "MRSA",
                 "detectedAt": "2024-03-05T12:00:00Z", "nodeType": "Visitor"},
                {"id": "u2", "patientName": "D. Brown", "ward": "ICU", "organism": "MRSA",
                 "detectedAt": "2024-03-06T12:00:00Z", "nodeType": "Index"}
            ],
            "links": [
                {"sourceId": "u2", "targetId": "u1", "linkType": "Airborne", "confidence": 0.3}
            ],
            "organism": "MRSA",
            "totalCases": 2
        }"#;

        let network: Network = serde_json::from_str(json).unwrap();
        assert_eq!(network.node_count(), 2);

        let visitor = network.node(Id::new("u1")).unwrap();
        assert_eq!(visitor.category(), NodeCategory::Unknown);
        assert!(!visitor.is_index());
        assert_eq!(network.links()[0].category(), LinkCategory::Unknown);
        assert!(network.integrity_issues().is_empty());
    }

    #[test]
    fn test_link_category_wire_names() {
        for category in LinkCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(category.as_str().parse::<LinkCategory>().unwrap(), category);
        }

        let err = "Airborne".parse::<LinkCategory>().unwrap_err();
        assert_eq!(err.to_string(), "unknown link category `Airborne`");
    }

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"{
            "nodes": [
                {"id": "p1", "patientName": "A. Smith", "ward": "ICU", "organism": "MRSA",
                 "detectedAt": "2024-03-02T08:15:00Z", "nodeType": "Index"},
                {"id": "p2", "patientName": "B. Jones", "ward": "Ward 4", "organism": "MRSA",
                 "detectedAt": "2024-03-04T10:00:00Z", "nodeType": "HCW"}
            ],
            "links": [
                {"sourceId": "p1", "targetId": "p2", "linkType": "Shared Equipment",
                 "confidence": 0.65, "evidence": "Same infusion pump"}
            ],
            "organism": "MRSA",
            "totalCases": 3
        }"#;

        let network: Network = serde_json::from_str(json).unwrap();
        assert_eq!(network.organism(), "MRSA");
        assert_eq!(network.case_count(), 3);
        assert_eq!(network.node_count(), 2);
        assert_eq!(network.link_count(), 1);

        let p2 = network.node(Id::new("p2")).unwrap();
        assert_eq!(p2.name(), "B. Jones");
        assert_eq!(p2.ward(), "Ward 4");
        assert_eq!(p2.category(), NodeCategory::HealthcareWorker);
        assert_eq!(p2.detected_at(), "2024-03-04T10:00:00Z");

        let link = &network.links()[0];
        assert_eq!(link.source(), "p1");
        assert_eq!(link.target(), "p2");
        assert_eq!(link.category(), LinkCategory::SharedEquipment);
        assert_eq!(link.evidence(), "Same infusion pump");
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let network = Network::new(
            vec![node("n1", NodeCategory::Index)],
            vec![],
            "C. difficile",
            1,
        );
        let value = serde_json::to_value(&network).unwrap();
        assert_eq!(value["totalCases"], 1);
        assert_eq!(value["nodes"][0]["patientName"], "Patient n1");
        assert_eq!(value["nodes"][0]["nodeType"], "Index");
    }

    #[test]
    fn test_connections_directions_and_order() {
        let network = Network::new(
            vec![
                node("c1", NodeCategory::Index),
                node("c2", NodeCategory::Secondary),
                node("c3", NodeCategory::Secondary),
            ],
            vec![link("c1", "c2"), link("c3", "c1"), link("c2", "c3")],
            "MRSA",
            3,
        );

        let connections = network.connections(Id::new("c1"));
        assert_eq!(connections.len(), 2);

        assert_eq!(connections[0].direction(), Direction::Outgoing);
        assert_eq!(connections[0].other_id(), "c2");
        assert_eq!(connections[0].other_label(), "Patient c2");

        assert_eq!(connections[1].direction(), Direction::Incoming);
        assert_eq!(connections[1].other_id(), "c3");
    }

    #[test]
    fn test_connection_to_missing_node_uses_id_label() {
        let network = Network::new(
            vec![node("d1", NodeCategory::Index)],
            vec![link("d1", "ghost")],
            "MRSA",
            1,
        );

        let connections = network.connections(Id::new("d1"));
        assert_eq!(connections.len(), 1);
        assert!(connections[0].other().is_none());
        assert_eq!(connections[0].other_label(), "ghost");
    }

    #[test]
    fn test_integrity_issues() {
        let network = Network::new(
            vec![
                node("e1", NodeCategory::Index),
                node("e2", NodeCategory::Secondary),
                node("e2", NodeCategory::Secondary),
                node("e2", NodeCategory::Secondary),
            ],
            vec![
                link("e1", "e2"),
                link("e1", "missing"),
                TransmissionLink::new(
                    Id::new("e2"),
                    Id::new("e1"),
                    LinkCategory::TemporalLink,
                    1.5,
                    "",
                ),
            ],
            "MRSA",
            3,
        );

        let issues = network.integrity_issues();
        assert_eq!(
            issues,
            vec![
                IntegrityIssue::DuplicateNode { id: Id::new("e2") },
                IntegrityIssue::DanglingEndpoint {
                    link_index: 1,
                    missing: Id::new("missing"),
                },
                IntegrityIssue::ConfidenceOutOfRange {
                    link_index: 2,
                    confidence: 1.5,
                },
            ]
        );
        assert_eq!(
            issues[1].to_string(),
            "link #1 references unknown case `missing`"
        );
    }

    #[test]
    fn test_consistent_network_has_no_issues() {
        let network = Network::new(
            vec![node("f1", NodeCategory::Index), node("f2", NodeCategory::Secondary)],
            vec![link("f1", "f2")],
            "MRSA",
            2,
        );
        assert!(network.integrity_issues().is_empty());
    }
}
