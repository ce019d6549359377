use crate::color::Color;
use crate::error::{Result, TopologyError};
use crate::registry::{DEFAULT_MODEL, ModelRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Defaults
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_COMMUNICATION_RANGE: f64 = 100.0;
pub const DEFAULT_SENSING_RANGE: f64 = 0.0;
pub const DEFAULT_WIDTH: i32 = 600;
pub const DEFAULT_HEIGHT: i32 = 400;
pub const DEFAULT_WIRELESS_ENABLED: bool = true;
pub const DEFAULT_TIME_UNIT: i32 = 10;

pub const DEFAULT_NODE_CLASS: &str = "Node";
pub const DEFAULT_ICON_SIZE: i32 = 8;
pub const DEFAULT_DIRECTION: f64 = -std::f64::consts::FRAC_PI_2;
pub const DEFAULT_NODE_COLOR: Option<Color> = None;

pub const DEFAULT_LINK_WIDTH: i32 = 1;
pub const DEFAULT_LINK_COLOR: Option<Color> = Some(Color::DARK_GRAY);

pub const DEFAULT_MESSAGE_ENGINE: &str = "DefaultMessageEngine";
pub const DEFAULT_LINK_RESOLVER: &str = "LinkResolver";
pub const DEFAULT_SCHEDULER: &str = "Scheduler";
pub const DEFAULT_CLOCK: &str = "DefaultClock";

// ────────────────────────────────────────────────────────────────────────────
// Topology
// ────────────────────────────────────────────────────────────────────────────

/// Class names of the pluggable engine components. The codecs only carry
/// these names; nothing here runs a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSlots {
    pub message_engine: String,
    pub link_resolver: String,
    pub scheduler: String,
    pub clock_model: String,
}

impl Default for ModelSlots {
    fn default() -> Self {
        Self {
            message_engine: DEFAULT_MESSAGE_ENGINE.to_string(),
            link_resolver: DEFAULT_LINK_RESOLVER.to_string(),
            scheduler: DEFAULT_SCHEDULER.to_string(),
            clock_model: DEFAULT_CLOCK.to_string(),
        }
    }
}

/// A network topology: global parameters, a model registry, nodes and links.
///
/// Nodes are keyed by identifier. Iteration follows insertion order, which
/// keeps exports deterministic, but the order carries no meaning.
#[derive(Debug, Clone, Serialize)]
pub struct Topology {
    pub communication_range: f64,
    pub sensing_range: f64,
    pub width: i32,
    pub height: i32,
    pub wireless_enabled: bool,
    /// Clock period, written as `speed` in XML.
    pub time_unit: i32,
    pub slots: ModelSlots,
    pub registry: ModelRegistry,
    nodes: IndexMap<String, Node>,
    links: Vec<Link>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            communication_range: DEFAULT_COMMUNICATION_RANGE,
            sensing_range: DEFAULT_SENSING_RANGE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            wireless_enabled: DEFAULT_WIRELESS_ENABLED,
            time_unit: DEFAULT_TIME_UNIT,
            slots: ModelSlots::default(),
            registry: ModelRegistry::default(),
            nodes: IndexMap::new(),
            links: Vec::new(),
            next_id: 0,
        }
    }
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all nodes and links. Ranges, registry and slots are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.next_id = 0;
    }

    /// Instantiate a node of the model bound to `model_name`.
    pub fn new_node(&self, model_name: &str) -> Result<Node> {
        self.registry.instantiate(model_name)
    }

    pub fn default_model_class(&self) -> &str {
        self.registry.default_class()
    }

    /// Add a node and return its identifier. A node with an empty identifier
    /// gets the smallest free integer identifier.
    pub fn add_node(&mut self, mut node: Node) -> Result<String> {
        if node.id.is_empty() {
            while self.nodes.contains_key(&self.next_id.to_string()) {
                self.next_id += 1;
            }
            node.id = self.next_id.to_string();
            self.next_id += 1;
        } else if self.nodes.contains_key(&node.id) {
            return Err(TopologyError::DuplicateNode { id: node.id });
        }
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Remove a node together with every link touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        self.links.retain(|l| !l.touches(id));
        Some(node)
    }

    /// Change a node's identifier, rewriting the endpoints of its links.
    pub fn rename_node(&mut self, id: &str, new_id: &str) -> Result<()> {
        if id == new_id {
            return Ok(());
        }
        if new_id.is_empty() {
            return Err(TopologyError::format(
                format!("node {}", id),
                "identifier must not be empty",
            ));
        }
        if self.nodes.contains_key(new_id) {
            return Err(TopologyError::DuplicateNode { id: new_id.to_string() });
        }
        let (index, _, mut node) = self
            .nodes
            .shift_remove_full(id)
            .ok_or_else(|| TopologyError::UnknownNodeReference { id: id.to_string() })?;
        node.id = new_id.to_string();
        self.nodes.shift_insert(index, new_id.to_string(), node);
        for link in &mut self.links {
            if link.source == id {
                link.source = new_id.to_string();
            }
            if link.destination == id {
                link.destination = new_id.to_string();
            }
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a link between two existing nodes. Adding an edge that is already
    /// present is a no-op.
    pub fn add_link(&mut self, link: Link) -> Result<()> {
        for id in [&link.source, &link.destination] {
            if !self.nodes.contains_key(id) {
                return Err(TopologyError::UnknownNodeReference { id: id.clone() });
            }
        }
        if self.links.iter().any(|l| l.same_edge(&link)) {
            log::debug!("Ignoring duplicate link {}", link);
            return Ok(());
        }
        self.links.push(link);
        Ok(())
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Links that are declared rather than derived from geometry.
    pub fn wired_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| !l.wireless)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// The link joining `a` and `b`, if any. Directed links match only from
    /// `a` to `b`.
    pub fn link_between(&self, a: &str, b: &str) -> Option<&Link> {
        self.links.iter().find(|l| {
            (l.source == a && l.destination == b)
                || (!l.directed && l.source == b && l.destination == a)
        })
    }

    pub fn communication_range_of(&self, node: &Node) -> f64 {
        node.communication_range.unwrap_or(self.communication_range)
    }

    pub fn sensing_range_of(&self, node: &Node) -> f64 {
        node.sensing_range.unwrap_or(self.sensing_range)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Node
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A node of the topology. Only the fixed attribute set is serialized;
/// `properties` is scratch space for algorithms and never written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    pub location: Point,
    pub color: Option<Color>,
    pub icon: Option<String>,
    pub icon_size: i32,
    pub direction: f64,
    /// Per-node override; `None` inherits the topology value.
    pub communication_range: Option<f64>,
    /// Per-node override; `None` inherits the topology value.
    pub sensing_range: Option<f64>,
    /// Class name of the implementation this node was built from.
    pub model: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            id: String::new(),
            location: Point::default(),
            color: DEFAULT_NODE_COLOR,
            icon: None,
            icon_size: DEFAULT_ICON_SIZE,
            direction: DEFAULT_DIRECTION,
            communication_range: None,
            sensing_range: None,
            model: DEFAULT_NODE_CLASS.to_string(),
            properties: IndexMap::new(),
        }
    }
}

impl Node {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Give a node that is not yet part of a topology its identifier. Nodes
    /// already added are renamed through [`Topology::rename_node`].
    pub fn named(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.set_location(x, y, z);
        self
    }

    pub fn set_location(&mut self, x: f64, y: f64, z: f64) {
        self.location = Point::new(x, y, z);
    }

    /// True if this node was built by the registry's `default` model.
    pub fn is_default_model(&self, registry: &ModelRegistry) -> bool {
        registry.class_of(DEFAULT_MODEL) == Some(self.model.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Link
// ────────────────────────────────────────────────────────────────────────────

/// An edge between two nodes, referenced by identifier.
///
/// Wireless links are derived from node geometry at runtime and are never
/// persisted; only wired links survive an export/import cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub destination: String,
    pub directed: bool,
    pub wireless: bool,
    pub width: i32,
    pub color: Option<Color>,
}

impl Link {
    pub fn wired(source: impl Into<String>, destination: impl Into<String>, directed: bool) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            directed,
            wireless: false,
            width: DEFAULT_LINK_WIDTH,
            color: DEFAULT_LINK_COLOR,
        }
    }

    pub fn wireless(source: impl Into<String>, destination: impl Into<String>, directed: bool) -> Self {
        Self {
            wireless: true,
            ..Self::wired(source, destination, directed)
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.destination == id
    }

    /// Same endpoints, orientation and mode. Undirected links ignore endpoint
    /// order.
    pub fn same_edge(&self, other: &Link) -> bool {
        if self.directed != other.directed || self.wireless != other.wireless {
            return false;
        }
        let forward = self.source == other.source && self.destination == other.destination;
        let backward = self.source == other.destination && self.destination == other.source;
        forward || (!self.directed && backward)
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = if self.directed { "-->" } else { "<-->" };
        write!(f, "{} {} {}", self.source, arrow, self.destination)
    }
}
