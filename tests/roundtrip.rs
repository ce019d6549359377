use std::collections::BTreeSet;
use topolink::color::Color;
use topolink::{
    ImportOptions, Link, Node, NodeModel, Topology, generate_plain, generate_topology_xml,
    import_plain, import_xml,
};

/// Nodes by id with their coordinates, independent of iteration order.
fn positions(tp: &Topology) -> BTreeSet<(String, String)> {
    tp.nodes()
        .map(|n| (n.id().to_string(), format!("{:?}", n.location)))
        .collect()
}

/// Wired links as (src, dst, directed), undirected ones normalized.
fn edges(tp: &Topology) -> BTreeSet<(String, String, bool)> {
    tp.wired_links()
        .map(|l| {
            let (a, b) = if !l.directed && l.source > l.destination {
                (l.destination.clone(), l.source.clone())
            } else {
                (l.source.clone(), l.destination.clone())
            };
            (a, b, l.directed)
        })
        .collect()
}

fn moving_node() -> Node {
    let mut node = Node::default();
    node.icon_size = 16;
    node
}

fn sample() -> Topology {
    let mut tp = Topology::new();
    tp.communication_range = 10.0;
    tp.sensing_range = 5.0;
    tp.width = 1024;
    tp.wireless_enabled = false;
    tp.slots.clock_model = "JavaFxClock".into();
    tp.registry.register(
        "mobile",
        NodeModel::new("MovingNode", moving_node),
    );

    tp.add_node(Node::with_id("A")).unwrap();
    tp.add_node(Node::with_id("B").at(1.0, 2.0, 0.0)).unwrap();
    let mut c = tp.new_node("mobile").unwrap().named("C");
    c.set_location(-3.5, 7.25, 2.0);
    c.color = Some(Color::BLUE);
    c.sensing_range = Some(1.5);
    c.direction = 0.0;
    c.properties.insert("visited".into(), "true".into());
    tp.add_node(c).unwrap();

    tp.add_link(Link::wired("A", "B", false)).unwrap();
    let mut bc = Link::wired("B", "C", true);
    bc.color = Some(Color::GREEN);
    bc.width = 4;
    tp.add_link(bc).unwrap();
    tp.add_link(Link::wireless("A", "C", false)).unwrap();
    tp
}

#[test]
fn concrete_plain_scenario() {
    let mut tp = Topology::new();
    tp.communication_range = 10.0;
    tp.sensing_range = 5.0;
    tp.add_node(Node::with_id("A")).unwrap();
    tp.add_node(Node::with_id("B").at(1.0, 2.0, 0.0)).unwrap();
    tp.add_link(Link::wired("A", "B", false)).unwrap();

    let text = generate_plain(&tp).unwrap();
    assert_eq!(
        text,
        "cR 10.0\nsR 5.0\nA [x: 0.0, y: 0.0]\nB [x: 1.0, y: 2.0]\nA <--> B\n"
    );

    let mut back = Topology::new();
    import_plain(&mut back, &text, ImportOptions::strict()).unwrap();
    assert_eq!(positions(&back), positions(&tp));
    assert_eq!(back.link_count(), 1);
    assert!(!back.links().next().unwrap().directed);
}

#[test]
fn plain_round_trip_keeps_ids_positions_links_and_ranges() {
    let tp = sample();
    let mut back = Topology::new();
    let report = import_plain(&mut back, &generate_plain(&tp).unwrap(), ImportOptions::strict()).unwrap();
    assert!(report.is_clean());

    assert_eq!(back.communication_range, 10.0);
    assert_eq!(back.sensing_range, 5.0);
    assert_eq!(edges(&back), edges(&tp));
    // Plain text only carries the plane.
    let c = back.node("C").unwrap();
    assert_eq!((c.location.x, c.location.y, c.location.z), (-3.5, 7.25, 0.0));
    assert_eq!(back.node_count(), 3);
}

#[test]
fn xml_round_trip_is_lossless_for_serialized_fields() {
    let tp = sample();
    let xml = generate_topology_xml(&tp);

    let mut back = Topology::new();
    back.registry.register(
        "mobile",
        NodeModel::new("MovingNode", moving_node),
    );
    let report = import_xml(&mut back, &xml, ImportOptions::strict()).unwrap();
    assert!(report.is_clean());

    assert_eq!(back.communication_range, 10.0);
    assert_eq!(back.sensing_range, 5.0);
    assert_eq!(back.width, 1024);
    assert!(!back.wireless_enabled);
    assert_eq!(back.slots, tp.slots);
    assert_eq!(positions(&back), positions(&tp));
    assert_eq!(edges(&back), edges(&tp));

    for node in tp.nodes() {
        let mut expected = node.clone();
        expected.properties.clear();
        assert_eq!(back.node(node.id()), Some(&expected));
    }
    let bc = back.link_between("B", "C").unwrap();
    assert_eq!(bc.color, Some(Color::GREEN));
    assert_eq!(bc.width, 4);

    // Exporting again is stable.
    assert_eq!(generate_topology_xml(&back), xml);
}

#[test]
fn factory_defaults_are_omitted_for_model_nodes() {
    let tp = sample();
    let xml = generate_topology_xml(&tp);
    let c_line = xml.lines().find(|l| l.contains("id=\"C\"")).unwrap();
    assert!(!c_line.contains("size="), "size equals the model default: {}", c_line);
    assert!(c_line.contains("class=\"mobile\""));
    assert!(c_line.contains("sensing-range=\"1.5\""));
    assert!(!c_line.contains("communication-range"));
}

#[test]
fn wireless_links_never_persist() {
    let tp = sample();
    assert_eq!(tp.link_count(), 3);

    let mut from_plain = Topology::new();
    import_plain(&mut from_plain, &generate_plain(&tp).unwrap(), ImportOptions::default()).unwrap();
    let mut from_xml = Topology::new();
    import_xml(&mut from_xml, &generate_topology_xml(&tp), ImportOptions::default()).unwrap();

    for back in [&from_plain, &from_xml] {
        assert_eq!(back.link_count(), 2);
        assert!(back.links().all(|l| !l.wireless));
        assert!(back.link_between("A", "C").is_none());
    }
}

#[test]
fn undirected_link_stays_single() {
    let mut tp = Topology::new();
    tp.add_node(Node::with_id("x")).unwrap();
    tp.add_node(Node::with_id("y")).unwrap();
    tp.add_link(Link::wired("x", "y", false)).unwrap();

    let xml = generate_topology_xml(&tp);
    assert_eq!(xml.matches("<link ").count(), 1);
    let mut back = Topology::new();
    import_xml(&mut back, &xml, ImportOptions::default()).unwrap();
    assert_eq!(back.link_count(), 1);
    assert!(!back.links().next().unwrap().directed);
}

#[test]
fn default_omission_reads_back_as_defaults() {
    let tp = Topology::new();
    let xml = generate_topology_xml(&tp);
    assert!(!xml.contains("communication-range"));
    assert!(!xml.contains("wireless-enabled"));

    let mut back = sample();
    import_xml(&mut back, &xml, ImportOptions::default()).unwrap();
    assert_eq!(back.communication_range, topolink::model::DEFAULT_COMMUNICATION_RANGE);
    assert_eq!(back.width, topolink::model::DEFAULT_WIDTH);
    assert!(back.wireless_enabled);
    assert_eq!(back.slots, topolink::model::ModelSlots::default());
    assert_eq!(back.node_count(), 0);
}

#[test]
fn renamed_nodes_still_round_trip() {
    let mut tp = Topology::new();
    tp.add_node(Node::with_id("A")).unwrap();
    tp.add_node(Node::with_id("B").at(1.0, 0.0, 0.0)).unwrap();
    tp.add_link(Link::wired("A", "B", true)).unwrap();

    assert!(tp.rename_node("A", "B").is_err());
    tp.rename_node("A", "C").unwrap();

    let mut back = Topology::new();
    import_xml(&mut back, &generate_topology_xml(&tp), ImportOptions::strict()).unwrap();
    assert_eq!(positions(&back), positions(&tp));
    assert!(back.link_between("C", "B").unwrap().directed);
}

#[test]
fn node_class_without_registered_name_round_trips() {
    let mut tp = Topology::new();
    tp.registry.register("mobile", NodeModel::new("MovingNode", moving_node));
    let n = tp.new_node("mobile").unwrap().named("m");
    tp.add_node(n).unwrap();
    tp.registry.register("mobile", NodeModel::plain("Drone"));

    let xml = generate_topology_xml(&tp);
    let mut back = Topology::new();
    let report = import_xml(&mut back, &xml, ImportOptions::strict()).unwrap();
    assert!(report.is_clean());
    assert_eq!(back.node("m").unwrap().model, "MovingNode");
    assert_eq!(generate_topology_xml(&back), xml);
}
