//! Generate topology XML text from a [`Topology`] model.
//!
//! Every field goes through [`Attrs::set_unless_default`] with the same
//! default the importer reads back, so omitted attributes round-trip.

use crate::attr::{Attrs, XmlKey};
use crate::model::*;
use crate::registry::DEFAULT_MODEL;
use indexmap::IndexMap;
use std::io::Write;

/// Generate the XML document for `tp`.
///
/// The output includes the XML declaration and uses 2-space indentation.
pub fn generate_topology_xml(tp: &Topology) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(&mut out, &build_topology(tp), 0);
    out
}

/// Write [`generate_topology_xml`] output to `w`.
pub fn write_topology_xml<W: Write>(tp: &Topology, w: &mut W) -> std::io::Result<()> {
    w.write_all(generate_topology_xml(tp).as_bytes())
}

struct Element {
    attrs: Attrs,
    children: Vec<Element>,
}

impl Element {
    fn new(key: XmlKey) -> Self {
        Self {
            attrs: Attrs::new(key),
            children: Vec::new(),
        }
    }
}

fn build_topology(tp: &Topology) -> Element {
    let mut topo = Element::new(XmlKey::Topology);
    let a = &mut topo.attrs;
    a.set_unless_default(XmlKey::WirelessEnabled, &tp.wireless_enabled, &DEFAULT_WIRELESS_ENABLED);
    a.set_unless_default(XmlKey::Speed, &tp.time_unit, &DEFAULT_TIME_UNIT);
    a.set_unless_default(XmlKey::Width, &tp.width, &DEFAULT_WIDTH);
    a.set_unless_default(XmlKey::Height, &tp.height, &DEFAULT_HEIGHT);
    a.set_unless_default(XmlKey::SensingRange, &tp.sensing_range, &DEFAULT_SENSING_RANGE);
    a.set_unless_default(
        XmlKey::CommunicationRange,
        &tp.communication_range,
        &DEFAULT_COMMUNICATION_RANGE,
    );

    let unbound = unbound_classes(tp);
    topo.children.push(build_classes(tp, &unbound));
    topo.children.push(build_graph(tp, &unbound));
    topo
}

/// Node classes with no registered name, each mapped to a fresh name so the
/// document declares every class its nodes use.
fn unbound_classes(tp: &Topology) -> IndexMap<&str, String> {
    let mut unbound: IndexMap<&str, String> = IndexMap::new();
    for node in tp.nodes() {
        let class = node.model.as_str();
        if tp.registry.name_of(class).is_some() || unbound.contains_key(class) {
            continue;
        }
        let taken = |n: &str| tp.registry.lookup(n).is_some() || unbound.values().any(|v| v == n);
        let mut name = class.to_string();
        let mut suffix = 2;
        while taken(&name) {
            name = format!("{}_{}", class, suffix);
            suffix += 1;
        }
        unbound.insert(class, name);
    }
    unbound
}

fn model_entry(key: XmlKey, id: &str, class: &str) -> Element {
    let mut e = Element::new(key);
    e.attrs.set(XmlKey::Id, &id.to_string());
    e.attrs.set(XmlKey::Class, &class.to_string());
    e
}

fn build_classes(tp: &Topology, unbound: &IndexMap<&str, String>) -> Element {
    let mut classes = Element::new(XmlKey::Classes);
    for (name, model) in tp.registry.iter() {
        classes
            .children
            .push(model_entry(XmlKey::NodeClass, name, model.class()));
    }
    for (class, name) in unbound {
        classes
            .children
            .push(model_entry(XmlKey::NodeClass, name, class));
    }
    let slots = [
        (XmlKey::MessageEngine, &tp.slots.message_engine, DEFAULT_MESSAGE_ENGINE),
        (XmlKey::LinkResolver, &tp.slots.link_resolver, DEFAULT_LINK_RESOLVER),
        (XmlKey::Scheduler, &tp.slots.scheduler, DEFAULT_SCHEDULER),
        (XmlKey::ClockClass, &tp.slots.clock_model, DEFAULT_CLOCK),
    ];
    for (key, class, default) in slots {
        if class != default {
            classes.children.push(model_entry(key, DEFAULT_MODEL, class));
        }
    }
    classes
}

fn build_graph(tp: &Topology, unbound: &IndexMap<&str, String>) -> Element {
    let mut graph = Element::new(XmlKey::Graph);
    for node in tp.nodes() {
        graph.children.push(build_node(tp, node, unbound));
    }
    for link in tp.wired_links() {
        graph.children.push(build_link(link));
    }
    graph
}

fn build_node(tp: &Topology, node: &Node, unbound: &IndexMap<&str, String>) -> Element {
    // Fields default to whatever the node's own model would build.
    let model_name = tp.registry.name_of(&node.model);
    let proto = model_name
        .and_then(|n| tp.registry.instantiate(n).ok())
        .unwrap_or_default();

    let mut e = Element::new(XmlKey::Node);
    let a = &mut e.attrs;
    a.set(XmlKey::Id, &node.id().to_string());
    a.set_unless_default(XmlKey::Color, &node.color, &proto.color);
    a.set_unless_default(XmlKey::Icon, &node.icon, &proto.icon);
    a.set_unless_default(XmlKey::Size, &node.icon_size, &proto.icon_size);
    a.set_unless_default(
        XmlKey::CommunicationRange,
        &tp.communication_range_of(node),
        &tp.communication_range,
    );
    a.set_unless_default(
        XmlKey::SensingRange,
        &tp.sensing_range_of(node),
        &tp.sensing_range,
    );
    a.set_unless_default(XmlKey::Direction, &node.direction, &proto.direction);
    a.set(XmlKey::X, &node.location.x);
    a.set(XmlKey::Y, &node.location.y);
    a.set_unless_default(XmlKey::Z, &node.location.z, &0.0);
    if !node.is_default_model(&tp.registry) {
        let name = model_name
            .or_else(|| unbound.get(node.model.as_str()).map(String::as_str))
            .unwrap_or(&node.model);
        a.set(XmlKey::Class, &name.to_string());
    }
    e
}

fn build_link(link: &Link) -> Element {
    let mut e = Element::new(XmlKey::Link);
    let a = &mut e.attrs;
    a.set(XmlKey::Directed, &link.directed);
    a.set(XmlKey::Src, &link.source);
    a.set(XmlKey::Dst, &link.destination);
    a.set_unless_default(XmlKey::Width, &link.width, &DEFAULT_LINK_WIDTH);
    a.set_unless_default(XmlKey::Color, &link.color, &DEFAULT_LINK_COLOR);
    e
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

/// Escape an attribute value for XML, including newlines and carriage returns.
fn xml_escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_element(out: &mut String, el: &Element, level: usize) {
    let tag = el.attrs.element_key().name();
    indent(out, level);
    out.push('<');
    out.push_str(tag);
    for (key, value) in el.attrs.iter() {
        out.push_str(&format!(" {}=\"{}\"", key.name(), xml_escape_attr(value)));
    }
    if el.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &el.children {
        write_element(out, child, level + 1);
    }
    indent(out, level);
    out.push_str(&format!("</{}>\n", tag));
}
