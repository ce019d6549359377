//! Plain-text topology import.
//!
//! ```text
//! cR 10.0
//! sR 5.0
//! A [x: 0.0, y: 0.0]
//! B [x: 1.0, y: 2.0, z: 3.0]
//! A <--> B
//! B --> A
//! ```
//!
//! The first two lines carry the communication and sensing range. Every line
//! with a `[` declares a node; every other non-blank line declares a wired
//! link whose marker contains `<` when the link is undirected.

use crate::error::{ImportOptions, ImportReport, Result, TopologyError};
use crate::model::{Link, Point, Topology};
use crate::registry::DEFAULT_MODEL;

/// Replace the content of `tp` with the topology described by `text`.
///
/// Malformed node or link lines are collected in the returned report (or
/// returned as the error when `options.strict` is set). A malformed header or
/// a link to an undeclared node aborts the import.
pub fn import_plain(tp: &mut Topology, text: &str, options: ImportOptions) -> Result<ImportReport> {
    tp.clear();
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')));

    tp.communication_range = parse_header(lines.next(), "cR")?;
    tp.sensing_range = parse_header(lines.next(), "sR")?;

    let mut report = ImportReport::default();
    for (lineno, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        if line.contains('[') {
            let added = parse_node_line(line).and_then(|(id, p)| {
                let node = tp.new_node(DEFAULT_MODEL)?.named(id).at(p.x, p.y, p.z);
                tp.add_node(node)
            });
            match added {
                Ok(id) => log::debug!("Read node {} (line {})", id, lineno),
                Err(e) => report.push(lineno, e, options.strict)?,
            }
        } else {
            match parse_link_line(line) {
                Ok(link) => {
                    log::debug!("Read link {} (line {})", link, lineno);
                    tp.add_link(link)?;
                }
                Err(e) => report.push(lineno, e, options.strict)?,
            }
        }
    }
    Ok(report)
}

fn parse_header(line: Option<(usize, &str)>, tag: &str) -> Result<f64> {
    let (lineno, line) =
        line.ok_or_else(|| TopologyError::format("header", format!("missing '{}' line", tag)))?;
    let context = || format!("line {} ('{}' header)", lineno, tag);
    let value = line
        .trim()
        .strip_prefix(tag)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .ok_or_else(|| TopologyError::format(context(), format!("expected '{} <number>'", tag)))?
        .trim();
    value
        .parse()
        .map_err(|_| TopologyError::format(context(), format!("'{}' is not a number", value)))
}

/// Whether `id` can appear in a node or link line. Whitespace separates the
/// tokens of a line, `[` opens a node's coordinates and `>` ends a link
/// marker.
pub fn is_plain_identifier(id: &str) -> bool {
    !id.is_empty() && !id.contains(|c: char| c.is_whitespace() || c == '[' || c == '>')
}

/// Parse `id [x: 1.0, y: 2.0]` with an optional `, z: 3.0`.
pub fn parse_node_line(line: &str) -> Result<(String, Point)> {
    let bad = |msg: String| TopologyError::format(format!("node line '{}'", line.trim()), msg);
    let (head, rest) = line
        .split_once('[')
        .ok_or_else(|| bad("missing '['".into()))?;
    let id = head.trim();
    if !is_plain_identifier(id) {
        return Err(bad(format!("invalid identifier '{}'", id)));
    }
    let inner = rest
        .trim_end()
        .strip_suffix(']')
        .ok_or_else(|| bad("missing ']'".into()))?;

    let (mut x, mut y, mut z) = (None, None, None);
    for part in inner.split(',') {
        let (key, value) = part
            .split_once(':')
            .ok_or_else(|| bad(format!("expected 'key: value', got '{}'", part.trim())))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| bad(format!("'{}' is not a number", value.trim())))?;
        let slot = match key.trim() {
            "x" => &mut x,
            "y" => &mut y,
            "z" => &mut z,
            other => return Err(bad(format!("unknown coordinate '{}'", other))),
        };
        *slot = Some(value);
    }
    match (x, y) {
        (Some(x), Some(y)) => Ok((id.to_string(), Point::new(x, y, z.unwrap_or(0.0)))),
        _ => Err(bad("x and y are required".into())),
    }
}

/// Parse `src <marker> dst` into a wired link. The marker is made of `-`, `<`
/// and `>` (spaces allowed) and ends with `>`; a `<` makes the link
/// undirected.
pub fn parse_link_line(line: &str) -> Result<Link> {
    let bad = |msg: &str| TopologyError::format(format!("link line '{}'", line.trim()), msg);
    let (src, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad("expected 'src --> dst'"))?;
    let gt = rest.rfind('>').ok_or_else(|| bad("missing '>'"))?;
    let (marker, dst) = (rest[..=gt].trim(), rest[gt + 1..].trim());
    let marker_ok = marker.contains('-')
        && marker
            .chars()
            .all(|c| matches!(c, '-' | '<' | '>') || c.is_whitespace());
    if !marker_ok {
        return Err(bad("unrecognized link marker"));
    }
    if !is_plain_identifier(src) {
        return Err(bad("invalid source identifier"));
    }
    if !is_plain_identifier(dst) {
        return Err(bad("invalid destination identifier"));
    }
    let undirected = marker.contains('<');
    Ok(Link::wired(src, dst, !undirected))
}
