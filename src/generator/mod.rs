//! Topology export.
//!
//! - [`plain`] – Generate the line-oriented plain-text format.
//! - [`topology_xml`] – Generate the XML document format.

pub mod plain;
pub mod topology_xml;

pub use plain::{generate_plain, write_plain};
pub use topology_xml::{generate_topology_xml, write_topology_xml};
