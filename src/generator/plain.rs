//! Generate the plain-text format from a [`Topology`].
//!
//! Node positions are projected onto the plane: `z` is not part of this
//! format. Wireless links are skipped.

use crate::attr::format_f64;
use crate::error::{Result, TopologyError};
use crate::model::Topology;
use crate::parser::plain::is_plain_identifier;
use std::io::Write;

/// Generate the plain-text document for `tp`.
///
/// Fails with [`TopologyError::Format`] when a node identifier cannot be read
/// back by the plain-text importer (empty, or containing whitespace, `[` or
/// `>`).
pub fn generate_plain(tp: &Topology) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("cR {}\n", format_f64(tp.communication_range)));
    out.push_str(&format!("sR {}\n", format_f64(tp.sensing_range)));
    for node in tp.nodes() {
        if !is_plain_identifier(node.id()) {
            return Err(TopologyError::format(
                format!("node '{}'", node.id()),
                "identifier cannot be written in the plain-text format",
            ));
        }
        out.push_str(&format!(
            "{} [x: {}, y: {}]\n",
            node.id(),
            format_f64(node.location.x),
            format_f64(node.location.y)
        ));
    }
    for link in tp.wired_links() {
        out.push_str(&format!("{}\n", link));
    }
    Ok(out)
}

/// Write [`generate_plain`] output to `w`.
pub fn write_plain<W: Write>(tp: &Topology, w: &mut W) -> Result<()> {
    w.write_all(generate_plain(tp)?.as_bytes())?;
    Ok(())
}
