//! State of the source-investigation view.
//!
//! The view owns the organism filter, the selected case, and the latest
//! committed network together with its layout. Fetching is driven from the
//! outside: [`InvestigationView::reload`] fetches from a [`NetworkSource`],
//! or callers may start a request with [`InvestigationView::refresh`] and
//! hand its result to [`InvestigationView::apply`] later. Results of
//! superseded requests are discarded.

use std::sync::Arc;

use log::{debug, info};

use outbreak_core::{
    geometry::Point,
    identifier::Id,
    network::{CaseNode, Connection, Network, TransmissionLink},
};

use crate::{
    error::OutbreakError,
    fetch::NetworkSource,
    generation::{AsyncState, Generation, Latest},
    layout::{Positions, layout},
};

/// Organism shown when the view opens.
pub const DEFAULT_ORGANISM: &str = "MRSA";

/// A network together with its computed positions.
#[derive(Debug, Clone)]
pub struct LaidOutNetwork {
    network: Network,
    positions: Positions,
}

impl LaidOutNetwork {
    /// Lays out `network`.
    pub fn new(network: Network) -> Self {
        let positions = layout(network.nodes(), network.links());
        Self { network, positions }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.positions.get(&id).copied()
    }
}

/// The selected case and the network it belongs to.
#[derive(Debug, Clone)]
pub struct Selection {
    data: Arc<LaidOutNetwork>,
    id: Id,
}

impl Selection {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn node(&self) -> Option<&CaseNode> {
        self.data.network().node(self.id)
    }

    /// Links touching the selected case
    pub fn connections(&self) -> Vec<Connection<'_>> {
        self.data.network().connections(self.id)
    }

    pub fn position(&self) -> Option<Point> {
        self.data.position(self.id)
    }
}

/// View state of a source investigation.
#[derive(Debug)]
pub struct InvestigationView {
    organism: String,
    selected: Option<Id>,
    network: Latest<LaidOutNetwork>,
}

impl Default for InvestigationView {
    fn default() -> Self {
        Self::new(DEFAULT_ORGANISM)
    }
}

impl InvestigationView {
    pub fn new(organism: impl Into<String>) -> Self {
        Self {
            organism: organism.into(),
            selected: None,
            network: Latest::new(),
        }
    }

    pub fn organism(&self) -> &str {
        &self.organism
    }

    /// Switches the organism filter.
    ///
    /// Clears the selection and starts a new request generation, so a
    /// response still in flight for the previous organism is discarded.
    pub fn set_organism(&mut self, organism: impl Into<String>) -> Generation {
        self.organism = organism.into();
        self.selected = None;
        let generation = self.network.begin();
        info!(
            organism = self.organism.as_str(),
            generation:% = generation;
            "Organism filter changed"
        );
        generation
    }

    /// Starts a new request for the current organism.
    pub fn refresh(&self) -> Generation {
        self.network.begin()
    }

    /// Commits the result of the request started as `generation`.
    ///
    /// Returns `false` when the result is stale and was discarded.
    pub fn apply(&self, generation: Generation, result: Result<Network, OutbreakError>) -> bool {
        self.network
            .commit(generation, result.map(LaidOutNetwork::new))
    }

    /// Fetches the current organism's network from `source` and applies it.
    ///
    /// Returns `false` when another request started while this one was in
    /// flight.
    pub async fn reload(&self, source: &dyn NetworkSource) -> bool {
        let organism = self.organism.clone();
        let generation = self.refresh();
        let result = source.fetch(Some(organism.as_str())).await;
        self.apply(generation, result)
    }

    /// Snapshot of the network loading state.
    pub fn state(&self) -> AsyncState<LaidOutNetwork> {
        self.network.state()
    }

    /// Selects the case `id`, or clears the selection with `None`.
    ///
    /// Only cases present in the current network can be selected; returns
    /// whether the selection changed to the requested value.
    pub fn select_node(&mut self, id: Option<Id>) -> bool {
        let Some(id) = id else {
            self.selected = None;
            return true;
        };

        let known = self
            .state()
            .data()
            .is_some_and(|data| data.network().contains_node(id));
        if !known {
            debug!(id:% = id; "Ignoring selection of a case outside the current network");
            return false;
        }

        self.selected = Some(id);
        true
    }

    pub fn selected_id(&self) -> Option<Id> {
        self.selected
    }

    /// The selected case, if it is still part of the latest network.
    pub fn selection(&self) -> Option<Selection> {
        let id = self.selected?;
        let data = self.state().data()?.clone();
        data.network().contains_node(id).then_some(Selection { data, id })
    }

    /// Links touching the selected case in network order, or an empty list.
    ///
    /// Use [`selection`](Self::selection) to also get link directions and
    /// the cases on the other end.
    pub fn selected_connections(&self) -> Vec<TransmissionLink> {
        self.selection()
            .map(|selection| {
                selection
                    .connections()
                    .into_iter()
                    .map(|connection| connection.link().clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
