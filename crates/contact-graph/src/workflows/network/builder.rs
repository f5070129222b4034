use super::aggregate::{Aggregates, Dimension, FrequencyTable};
use super::graph::{EdgeKind, GraphKind, GraphNode, NetworkGraph, NodeKind, ROOT_ID};
use super::markup::{escape_html, unordered_list};
use super::palette::DiscretePalette;
use crate::config::VisualizationConfig;
use crate::workflows::connections::ContactRecord;
use rand::Rng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Position value that marks an un-aggregated header row leaking into the
/// data. People holding it never get shared-position edges.
pub const PLACEHOLDER_POSITION: &str = "position";

const ENTITY_BORDER_WIDTH: u8 = 4;

/// How a node's drawn size follows from its count.
///
/// Company and position graphs scale differently; the two are kept apart
/// because merging them changes what viewers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// `count × 5`
    CompanyScaled,
    /// `count`
    PositionRaw,
    /// Constant size for sampled people.
    PersonFixed,
}

impl SizePolicy {
    pub const COMPANY_FACTOR: usize = 5;
    pub const PERSON_SIZE: usize = 10;

    pub const fn size_for(self, count: usize) -> usize {
        match self {
            Self::CompanyScaled => count * Self::COMPANY_FACTOR,
            Self::PositionRaw => count,
            Self::PersonFixed => Self::PERSON_SIZE,
        }
    }
}

/// A threshold left a dimension without any entity. The graph is still
/// produced, holding only the root node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("no {dimension} has at least {min_count} connection(s); the {dimension} graph shows only the root node")]
pub struct EmptyResult {
    pub dimension: Dimension,
    pub min_count: usize,
}

/// Builds the three network graphs for one contact book and one set of
/// viewer options.
pub struct GraphBuilder<'a> {
    records: &'a [ContactRecord],
    aggregates: &'a Aggregates,
    config: &'a VisualizationConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        records: &'a [ContactRecord],
        aggregates: &'a Aggregates,
        config: &'a VisualizationConfig,
    ) -> Self {
        Self {
            records,
            aggregates,
            config,
        }
    }

    fn palette(&self) -> DiscretePalette {
        self.config.network_palette
    }

    /// Root plus every company with at least `company_min_count` connections.
    /// Hovering a company lists the distinct titles held there.
    pub fn company_graph(&self) -> (NetworkGraph, Option<EmptyResult>) {
        let reduced = self
            .aggregates
            .companies
            .at_least(self.config.company_min_count);
        let titles = titles_by_company(self.records);
        let mut graph = NetworkGraph::with_root(GraphKind::Company, self.config.root_label());

        for entry in reduced.entries() {
            let id = entity_id(NodeKind::Company, &entry.name);
            let positions = titles
                .get(entry.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let title = format!(
                "<b>{}</b> – {}{}",
                escape_html(&entry.name),
                entry.count,
                unordered_list(positions.iter().copied())
            );

            graph.add_node(GraphNode {
                id: id.clone(),
                label: entry.name.clone(),
                kind: NodeKind::Company,
                size: SizePolicy::CompanyScaled.size_for(entry.count),
                weight: entry.count,
                color: self.palette().color_for(entry.count, reduced.len()),
                border_width: ENTITY_BORDER_WIDTH,
                title: Some(title),
            });
            graph.connect_root(&id);
        }

        debug!(
            companies = reduced.len(),
            min_count = self.config.company_min_count,
            "company graph built"
        );
        let notice = empty_notice(&reduced, Dimension::Company, self.config.company_min_count);
        (graph, notice)
    }

    /// Root plus every title with at least `position_min_count` connections.
    pub fn position_graph(&self) -> (NetworkGraph, Option<EmptyResult>) {
        let reduced = self
            .aggregates
            .positions
            .at_least(self.config.position_min_count);
        let mut graph = NetworkGraph::with_root(GraphKind::Position, self.config.root_label());

        for entry in reduced.entries() {
            let id = entity_id(NodeKind::Position, &entry.name);
            graph.add_node(GraphNode {
                id: id.clone(),
                label: entry.name.clone(),
                kind: NodeKind::Position,
                size: SizePolicy::PositionRaw.size_for(entry.count),
                weight: entry.count,
                // ratio against the positions drawn, not the company count
                color: self.palette().color_for(entry.count, reduced.len()),
                border_width: ENTITY_BORDER_WIDTH,
                title: Some(entry.count.to_string()),
            });
            graph.connect_root(&id);
        }

        debug!(
            positions = reduced.len(),
            min_count = self.config.position_min_count,
            "position graph built"
        );
        let notice = empty_notice(
            &reduced,
            Dimension::Position,
            self.config.position_min_count,
        );
        (graph, notice)
    }

    /// Samples `sample_size` people without replacement and links those who
    /// share an employer or a title.
    pub fn people_graph<R: Rng + ?Sized>(&self, rng: &mut R) -> NetworkGraph {
        let sample = sample_records(self.records, self.config.sample_size, rng);
        people_graph_from_sample(&sample, self.aggregates, self.config)
    }
}

/// Builds the people graph from an already drawn sample, in sample order.
///
/// Each person is linked to the root and to every earlier person sharing
/// their company or position; the resulting edge set does not depend on the
/// order of `sample`.
pub fn people_graph_from_sample(
    sample: &[&ContactRecord],
    aggregates: &Aggregates,
    config: &VisualizationConfig,
) -> NetworkGraph {
    let mut graph = NetworkGraph::with_root(GraphKind::People, config.root_label());
    let company_counts = aggregates.companies.lookup();
    let sampled_companies = sample
        .iter()
        .map(|record| record.company.as_str())
        .collect::<HashSet<_>>()
        .len();
    let mut peers = PeerIndex::default();

    for (ordinal, record) in sample.iter().enumerate() {
        let id = entity_id(NodeKind::Person, &ordinal.to_string());
        let name = record.full_name();
        let company_count = company_counts
            .get(record.company.as_str())
            .copied()
            .unwrap_or(1);
        let title = format!(
            "{}<br/> <br/>{}<br/> <br/>{}",
            escape_html(&name),
            escape_html(&record.company),
            escape_html(&record.position)
        );

        graph.add_node(GraphNode {
            id: id.clone(),
            label: name,
            kind: NodeKind::Person,
            size: SizePolicy::PersonFixed.size_for(company_count),
            weight: company_count,
            color: config
                .network_palette
                .color_for(company_count, sampled_companies),
            border_width: ENTITY_BORDER_WIDTH,
            title: Some(title),
        });
        graph.connect_root(&id);

        for peer in peers.company_peers(&record.company) {
            graph.add_edge(peer, &id, EdgeKind::SharedCompany);
        }
        if record.position != PLACEHOLDER_POSITION {
            for peer in peers.position_peers(&record.position) {
                graph.add_edge(peer, &id, EdgeKind::SharedPosition);
            }
        }

        peers.record(record, id);
    }

    if sample.is_empty() {
        warn!("people graph sample is empty");
    }
    debug!(
        people = sample.len(),
        edges = graph.edge_count(),
        "people graph built"
    );
    graph
}

/// People visited so far, keyed by the company and by the position they hold.
#[derive(Debug, Default)]
struct PeerIndex {
    by_company: HashMap<String, Vec<String>>,
    by_position: HashMap<String, Vec<String>>,
}

impl PeerIndex {
    fn company_peers(&self, company: &str) -> &[String] {
        self.by_company
            .get(company)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn position_peers(&self, position: &str) -> &[String] {
        self.by_position
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn record(&mut self, record: &ContactRecord, id: String) {
        if record.position != PLACEHOLDER_POSITION {
            self.by_position
                .entry(record.position.clone())
                .or_default()
                .push(id.clone());
        }
        self.by_company
            .entry(record.company.clone())
            .or_default()
            .push(id);
    }
}

/// Draws up to `sample_size` distinct records in random order. Asking for
/// more records than exist returns all of them, shuffled.
pub fn sample_records<'r, R: Rng + ?Sized>(
    records: &'r [ContactRecord],
    sample_size: usize,
    rng: &mut R,
) -> Vec<&'r ContactRecord> {
    let amount = sample_size.min(records.len());
    rand::seq::index::sample(rng, records.len(), amount)
        .into_iter()
        .map(|index| &records[index])
        .collect()
}

fn entity_id(kind: NodeKind, name: &str) -> String {
    match kind {
        NodeKind::Company => format!("company:{name}"),
        NodeKind::Position => format!("position:{name}"),
        NodeKind::Person => format!("person:{name}"),
        NodeKind::Root => ROOT_ID.to_string(),
    }
}

/// Distinct titles per company, in the order they first appear.
fn titles_by_company(records: &[ContactRecord]) -> HashMap<&str, Vec<&str>> {
    let mut titles: HashMap<&str, Vec<&str>> = HashMap::new();
    for record in records {
        let entry = titles.entry(record.company.as_str()).or_default();
        if !entry.contains(&record.position.as_str()) {
            entry.push(record.position.as_str());
        }
    }
    titles
}

fn empty_notice(
    reduced: &FrequencyTable,
    dimension: Dimension,
    min_count: usize,
) -> Option<EmptyResult> {
    if reduced.is_empty() {
        warn!(%dimension, min_count, "threshold removed every entity");
        Some(EmptyResult {
            dimension,
            min_count,
        })
    } else {
        None
    }
}
