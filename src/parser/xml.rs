//! XML topology import.
//!
//! The `<topology>` element may be the document root or sit inside a wrapper
//! element. Import reads the topology attributes, then `<classes>` (so the
//! registry knows every model before nodes are built), then every `<node>` of
//! `<graph>`, and finally its `<link>` elements.

use crate::attr::{XmlKey, read, read_required};
use crate::error::{ImportOptions, ImportReport, Result, TopologyError};
use crate::model::*;
use crate::registry::DEFAULT_MODEL;
use roxmltree::{Document, Node as XmlNode};

/// Replace the content of `tp` with the topology described by the XML `text`.
///
/// Nodes and links are dropped before the document is parsed, so `tp` is left
/// empty when the text is not XML or has no `<topology>` element.
pub fn import_xml(tp: &mut Topology, text: &str, options: ImportOptions) -> Result<ImportReport> {
    tp.clear();
    let doc = Document::parse(text)?;
    let topo = doc
        .descendants()
        .find(|n| XmlKey::Topology.labels(*n))
        .ok_or_else(|| TopologyError::format("document", "no <topology> element"))?;

    read_topology_attributes(topo, tp)?;
    tp.slots = ModelSlots::default();
    if let Some(classes) = child(topo, XmlKey::Classes) {
        read_classes(classes, tp)?;
    }

    let mut report = ImportReport::default();
    let Some(graph) = child(topo, XmlKey::Graph) else {
        return Ok(report);
    };
    for el in graph.children().filter(|c| XmlKey::Node.labels(*c)) {
        match read_node(el, tp).and_then(|node| tp.add_node(node)) {
            Ok(id) => log::debug!("Read node {}", id),
            Err(e @ TopologyError::UnknownModel { .. }) => return Err(e),
            Err(e) => report.push(row(&doc, el), e, options.strict)?,
        }
    }
    for el in graph.children().filter(|c| XmlKey::Link.labels(*c)) {
        match read_link(el) {
            Ok(link) => {
                log::debug!("Read link {}", link);
                tp.add_link(link)?;
            }
            Err(e) => report.push(row(&doc, el), e, options.strict)?,
        }
    }
    Ok(report)
}

/// 1-based line of an element, for diagnostics.
fn row(doc: &Document, el: XmlNode) -> usize {
    doc.text_pos_at(el.range().start).row as usize
}

fn child<'a, 'input>(parent: XmlNode<'a, 'input>, key: XmlKey) -> Option<XmlNode<'a, 'input>> {
    parent.children().find(|c| key.labels(*c))
}

fn read_topology_attributes(topo: XmlNode, tp: &mut Topology) -> Result<()> {
    tp.wireless_enabled = read(&topo, XmlKey::WirelessEnabled, DEFAULT_WIRELESS_ENABLED)?;
    tp.time_unit = read(&topo, XmlKey::Speed, DEFAULT_TIME_UNIT)?;
    tp.width = read(&topo, XmlKey::Width, DEFAULT_WIDTH)?;
    tp.height = read(&topo, XmlKey::Height, DEFAULT_HEIGHT)?;
    tp.sensing_range = read(&topo, XmlKey::SensingRange, DEFAULT_SENSING_RANGE)?;
    tp.communication_range =
        read(&topo, XmlKey::CommunicationRange, DEFAULT_COMMUNICATION_RANGE)?;
    Ok(())
}

fn read_classes(classes: XmlNode, tp: &mut Topology) -> Result<()> {
    for el in classes.children().filter(|c| c.is_element()) {
        let name = el.tag_name().name();
        if name == XmlKey::NodeClass.name() {
            let id: String = read_required(&el, XmlKey::Id)?;
            let class: String = read_required(&el, XmlKey::Class)?;
            tp.registry.bind_class(&id, &class);
            continue;
        }
        let slot = match name {
            n if n == XmlKey::MessageEngine.name() => &mut tp.slots.message_engine,
            n if n == XmlKey::LinkResolver.name() => &mut tp.slots.link_resolver,
            n if n == XmlKey::Scheduler.name() => &mut tp.slots.scheduler,
            n if n == XmlKey::ClockClass.name() => &mut tp.slots.clock_model,
            other => {
                log::warn!("Ignoring unknown <{}> in <classes>", other);
                continue;
            }
        };
        *slot = read_required(&el, XmlKey::Class)?;
    }
    Ok(())
}

/// Resolve a node's `class` attribute, which may hold a registered name or a
/// class name.
fn resolve_model<'a>(tp: &'a Topology, class: &'a str) -> Result<&'a str> {
    if tp.registry.lookup(class).is_some() {
        return Ok(class);
    }
    tp.registry
        .name_of(class)
        .ok_or_else(|| TopologyError::UnknownModel {
            name: class.to_string(),
        })
}

fn read_node(el: XmlNode, tp: &Topology) -> Result<Node> {
    let id: String = read_required(&el, XmlKey::Id)?;
    if id.is_empty() {
        return Err(TopologyError::format("<node>", "empty 'id' attribute"));
    }
    let class: Option<String> = read(&el, XmlKey::Class, None)?;
    let model = match class.as_deref() {
        Some(c) => resolve_model(tp, c)?,
        None => DEFAULT_MODEL,
    };
    let mut node = tp.new_node(model)?.named(id);

    node.color = read(&el, XmlKey::Color, node.color)?;
    node.icon = read(&el, XmlKey::Icon, node.icon.take())?;
    node.icon_size = read(&el, XmlKey::Size, node.icon_size)?;
    node.direction = read(&el, XmlKey::Direction, node.direction)?;

    let cr = read(&el, XmlKey::CommunicationRange, tp.communication_range)?;
    node.communication_range = (cr != tp.communication_range).then_some(cr);
    let sr = read(&el, XmlKey::SensingRange, tp.sensing_range)?;
    node.sensing_range = (sr != tp.sensing_range).then_some(sr);

    let x = read_required(&el, XmlKey::X)?;
    let y = read_required(&el, XmlKey::Y)?;
    let z = read(&el, XmlKey::Z, 0.0)?;
    node.set_location(x, y, z);
    Ok(node)
}

fn read_link(el: XmlNode) -> Result<Link> {
    let directed = read_required(&el, XmlKey::Directed)?;
    let src: String = read_required(&el, XmlKey::Src)?;
    let dst: String = read_required(&el, XmlKey::Dst)?;
    let mut link = Link::wired(src, dst, directed);
    link.width = read(&el, XmlKey::Width, DEFAULT_LINK_WIDTH)?;
    link.color = read(&el, XmlKey::Color, DEFAULT_LINK_COLOR)?;
    Ok(link)
}
