use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Identifier of the viewer node present in every graph.
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Company,
    Position,
    People,
}

impl GraphKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Company, Self::Position, Self::People]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Company => "Connections by Company Graph",
            Self::Position => "Connections by Position Graph",
            Self::People => "People Graph",
        }
    }

    /// Base file name used when the graph is exported.
    pub const fn artifact_stem(self) -> &'static str {
        match self {
            Self::Company => "company_graph",
            Self::Position => "position_graph",
            Self::People => "people_graph",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Company,
    Position,
    Person,
}

/// Meaning of an edge; each kind is drawn in its own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Structural,
    SharedCompany,
    SharedPosition,
}

impl EdgeKind {
    pub const fn color(self) -> &'static str {
        match self {
            Self::Structural => "grey",
            Self::SharedCompany => "green",
            Self::SharedPosition => "blue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub size: usize,
    pub weight: usize,
    pub color: &'static str,
    pub border_width: u8,
    /// Hover annotation; HTML, already escaped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GraphNode {
    pub(crate) fn root(label: &str) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            label: label.to_string(),
            kind: NodeKind::Root,
            size: ROOT_SIZE,
            weight: 0,
            color: ROOT_COLOR,
            border_width: 0,
            title: None,
        }
    }
}

const ROOT_SIZE: usize = 10;
const ROOT_COLOR: &str = "#97C2FC";

/// Undirected edge; `source` is whichever endpoint was added first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub color: &'static str,
}

impl GraphEdge {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Node-link graph rooted at the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkGraph {
    pub kind: GraphKind,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    node_slots: HashMap<String, usize>,
    #[serde(skip)]
    edge_keys: HashSet<(String, String, EdgeKind)>,
}

impl NetworkGraph {
    pub fn with_root(kind: GraphKind, root_label: &str) -> Self {
        let mut graph = Self {
            kind,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_slots: HashMap::new(),
            edge_keys: HashSet::new(),
        };
        graph.add_node(GraphNode::root(root_label));
        graph
    }

    /// Adds `node` unless its id is already taken. Returns whether it was added.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.node_slots.contains_key(&node.id) {
            return false;
        }
        self.node_slots.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Adds one undirected edge per endpoint pair and kind. Self-loops and
    /// edges to unknown nodes are ignored.
    pub fn add_edge(&mut self, a: &str, b: &str, kind: EdgeKind) -> bool {
        if a == b || !self.node_slots.contains_key(a) || !self.node_slots.contains_key(b) {
            return false;
        }

        let key = if a <= b {
            (a.to_string(), b.to_string(), kind)
        } else {
            (b.to_string(), a.to_string(), kind)
        };
        if !self.edge_keys.insert(key) {
            return false;
        }

        self.edges.push(GraphEdge {
            source: a.to_string(),
            target: b.to_string(),
            kind,
            color: kind.color(),
        });
        true
    }

    pub fn connect_root(&mut self, id: &str) -> bool {
        self.add_edge(ROOT_ID, id, EdgeKind::Structural)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_slots.get(id).map(|slot| &self.nodes[*slot])
    }

    pub fn root(&self) -> &GraphNode {
        &self.nodes[0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn has_edge(&self, a: &str, b: &str, kind: EdgeKind) -> bool {
        self.edges_of_kind(kind).any(|edge| edge.connects(a, b))
    }

    /// True when nothing besides the root made it into the graph.
    pub fn is_root_only(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Edge set keyed by endpoint labels, independent of insertion order.
    pub fn labelled_edge_set(&self) -> HashSet<(String, String, EdgeKind)> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let a = self.node(&edge.source)?.label.clone();
                let b = self.node(&edge.target)?.label.clone();
                Some(if a <= b {
                    (a, b, edge.kind)
                } else {
                    (b, a, edge.kind)
                })
            })
            .collect()
    }
}
