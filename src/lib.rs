//! Network topology serialization.
//!
//! This crate reads and writes a [`Topology`](model::Topology) (nodes, links
//! and global simulation parameters) in two formats: a compact line-oriented
//! plain-text format and an XML document format. Node implementations are
//! referred to by name through the [`ModelRegistry`](registry::ModelRegistry)
//! each topology owns.
//!
//! Wireless links are derived from node geometry at runtime and are never
//! written; only wired links round-trip.
//!
//! The binary `topolink` converts between the formats and dumps JSON.

pub mod attr;
pub mod color;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod registry;

pub use error::{Diagnostic, ImportOptions, ImportReport, TopologyError};
pub use generator::{generate_plain, generate_topology_xml};
pub use model::{Link, Node, Point, Topology};
pub use parser::{import_plain, import_xml};
pub use registry::{ModelRegistry, NodeModel};
