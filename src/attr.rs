//! Typed, default-aware attribute access for the XML codec.
//!
//! Every field of the document is addressed through an [`XmlKey`]. Writers go
//! through [`Attrs::set_unless_default`] so a field equal to its default never
//! reaches the output, and readers go through [`read`] with the same default,
//! which makes the omission rule symmetric.

use crate::color::{self, Color};
use crate::error::{Result, TopologyError};

/// Element and attribute vocabulary of topology documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlKey {
    Topology,
    Classes,
    NodeClass,
    Node,
    Link,
    Graph,
    LinkResolver,
    MessageEngine,
    Scheduler,
    ClockClass,

    Id,
    Directed,
    Class,
    SensingRange,
    CommunicationRange,
    WirelessEnabled,
    Src,
    Dst,
    Direction,
    /// Time unit of the topology clock.
    Speed,
    Width,
    Height,
    Color,
    Icon,
    Size,
    X,
    Y,
    Z,
}

impl XmlKey {
    pub const fn name(self) -> &'static str {
        match self {
            XmlKey::Topology => "topology",
            XmlKey::Classes => "classes",
            XmlKey::NodeClass => "node-class",
            XmlKey::Node => "node",
            XmlKey::Link => "link",
            XmlKey::Graph => "graph",
            XmlKey::LinkResolver => "link-resolver",
            XmlKey::MessageEngine => "message-engine",
            XmlKey::Scheduler => "scheduler",
            XmlKey::ClockClass => "clock-class",
            XmlKey::Id => "id",
            XmlKey::Directed => "directed",
            XmlKey::Class => "class",
            XmlKey::SensingRange => "sensing-range",
            XmlKey::CommunicationRange => "communication-range",
            XmlKey::WirelessEnabled => "wireless-enabled",
            XmlKey::Src => "src",
            XmlKey::Dst => "dst",
            XmlKey::Direction => "direction",
            XmlKey::Speed => "speed",
            XmlKey::Width => "width",
            XmlKey::Height => "height",
            XmlKey::Color => "color",
            XmlKey::Icon => "icon",
            XmlKey::Size => "size",
            XmlKey::X => "x",
            XmlKey::Y => "y",
            XmlKey::Z => "z",
        }
    }

    /// True if `node` is an element tagged with this key.
    pub fn labels(self, node: roxmltree::Node) -> bool {
        node.is_element() && node.has_tag_name(self.name())
    }
}

impl std::fmt::Display for XmlKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Value conversions
// ────────────────────────────────────────────────────────────────────────────

/// A field type that can live in an attribute. Comparison against defaults
/// uses `PartialEq`, never identity.
pub trait AttrValue: Sized + PartialEq {
    /// Human-readable type name for error messages.
    const KIND: &'static str;
    fn to_attr(&self) -> String;
    fn from_attr(s: &str) -> Option<Self>;
}

impl AttrValue for bool {
    const KIND: &'static str = "boolean";
    fn to_attr(&self) -> String {
        self.to_string()
    }
    fn from_attr(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("true") {
            Some(true)
        } else if s.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl AttrValue for i32 {
    const KIND: &'static str = "integer";
    fn to_attr(&self) -> String {
        self.to_string()
    }
    fn from_attr(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }
}

impl AttrValue for f64 {
    const KIND: &'static str = "number";
    fn to_attr(&self) -> String {
        format_f64(*self)
    }
    fn from_attr(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }
}

impl AttrValue for String {
    const KIND: &'static str = "string";
    fn to_attr(&self) -> String {
        self.clone()
    }
    fn from_attr(s: &str) -> Option<Self> {
        Some(s.to_string())
    }
}

/// Absent strings are written as the empty string.
impl AttrValue for Option<String> {
    const KIND: &'static str = "string";
    fn to_attr(&self) -> String {
        self.clone().unwrap_or_default()
    }
    fn from_attr(s: &str) -> Option<Self> {
        Some(Some(s.to_string()).filter(|s| !s.is_empty()))
    }
}

impl AttrValue for Option<Color> {
    const KIND: &'static str = "color";
    fn to_attr(&self) -> String {
        color::encode(*self)
    }
    fn from_attr(s: &str) -> Option<Self> {
        color::decode(s).ok()
    }
}

/// Shortest round-trip decimal form, keeping a `.0` on integral values so
/// `10.0` stays distinguishable from an integer field.
pub fn format_f64(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains('.') {
        format!("{}.0", s)
    } else {
        s
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Containers
// ────────────────────────────────────────────────────────────────────────────

/// Anything attributes can be read from.
pub trait AttrContainer {
    fn attr(&self, key: XmlKey) -> Option<&str>;
    /// Element name used in error messages.
    fn element(&self) -> String;
}

impl AttrContainer for roxmltree::Node<'_, '_> {
    fn attr(&self, key: XmlKey) -> Option<&str> {
        self.attribute(key.name())
    }
    fn element(&self) -> String {
        self.tag_name().name().to_string()
    }
}

/// Ordered attribute list of an element being written.
#[derive(Debug, Clone, PartialEq)]
pub struct Attrs {
    element: XmlKey,
    entries: Vec<(XmlKey, String)>,
}

impl Attrs {
    pub fn new(element: XmlKey) -> Self {
        Self {
            element,
            entries: Vec::new(),
        }
    }

    pub fn element_key(&self) -> XmlKey {
        self.element
    }

    /// Write a field unconditionally, replacing an earlier value.
    pub fn set<T: AttrValue>(&mut self, key: XmlKey, value: &T) {
        let text = value.to_attr();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((key, text)),
        }
    }

    /// Write a field only if it differs from `default`.
    pub fn set_unless_default<T: AttrValue>(&mut self, key: XmlKey, value: &T, default: &T) {
        if value != default {
            self.set(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (XmlKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AttrContainer for Attrs {
    fn attr(&self, key: XmlKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
    fn element(&self) -> String {
        self.element.name().to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Readers
// ────────────────────────────────────────────────────────────────────────────

fn convert<T: AttrValue, C: AttrContainer + ?Sized>(c: &C, key: XmlKey, raw: &str) -> Result<T> {
    T::from_attr(raw).ok_or_else(|| {
        TopologyError::format(
            format!("<{}> attribute '{}'", c.element(), key),
            format!("cannot read '{}' as {}", raw, T::KIND),
        )
    })
}

/// Read a field, falling back to `default` when it is absent.
pub fn read<T: AttrValue, C: AttrContainer + ?Sized>(c: &C, key: XmlKey, default: T) -> Result<T> {
    match c.attr(key) {
        Some(raw) => convert(c, key, raw),
        None => Ok(default),
    }
}

/// Read a field that has no sensible default.
pub fn read_required<T: AttrValue, C: AttrContainer + ?Sized>(c: &C, key: XmlKey) -> Result<T> {
    match c.attr(key) {
        Some(raw) => convert(c, key, raw),
        None => Err(TopologyError::MissingField {
            element: c.element(),
            field: key.name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_iff_default() {
        let mut attrs = Attrs::new(XmlKey::Node);
        attrs.set_unless_default(XmlKey::Size, &8, &8);
        attrs.set_unless_default(XmlKey::Direction, &1.5, &0.0);
        attrs.set_unless_default(XmlKey::Color, &None::<Color>, &None);
        attrs.set_unless_default(XmlKey::Icon, &Some("a.png".to_string()), &None);
        assert_eq!(attrs.attr(XmlKey::Size), None);
        assert_eq!(attrs.attr(XmlKey::Direction), Some("1.5"));
        assert_eq!(attrs.attr(XmlKey::Color), None);
        assert_eq!(attrs.attr(XmlKey::Icon), Some("a.png"));

        assert_eq!(read(&attrs, XmlKey::Size, 8).unwrap(), 8);
        assert_eq!(read(&attrs, XmlKey::Direction, 0.0).unwrap(), 1.5);
        assert_eq!(read(&attrs, XmlKey::Color, None::<Color>).unwrap(), None);
    }

    #[test]
    fn value_equality_not_identity() {
        let mut attrs = Attrs::new(XmlKey::Topology);
        let a = 100.0_f64;
        let b = 50.0_f64 * 2.0;
        attrs.set_unless_default(XmlKey::CommunicationRange, &a, &b);
        let owned = String::from("Node");
        attrs.set_unless_default(XmlKey::Class, &owned, &"Node".to_string());
        assert!(attrs.is_empty());
    }

    #[test]
    fn required_fields() {
        let mut attrs = Attrs::new(XmlKey::Link);
        attrs.set(XmlKey::Src, &"A".to_string());
        let src: String = read_required(&attrs, XmlKey::Src).unwrap();
        assert_eq!(src, "A");
        let err = read_required::<bool, _>(&attrs, XmlKey::Directed).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::MissingField { ref element, field: "directed" } if element == "link"
        ));
    }

    #[test]
    fn bad_values_are_format_errors() {
        let mut attrs = Attrs::new(XmlKey::Node);
        attrs.set(XmlKey::X, &"twelve".to_string());
        let err = read::<f64, _>(&attrs, XmlKey::X, 0.0).unwrap_err();
        assert!(matches!(err, TopologyError::Format { .. }));
    }

    #[test]
    fn set_replaces() {
        let mut attrs = Attrs::new(XmlKey::Node);
        attrs.set(XmlKey::X, &1.0);
        attrs.set(XmlKey::X, &2.0);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.attr(XmlKey::X), Some("2.0"));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_f64(10.0), "10.0");
        assert_eq!(format_f64(-0.5), "-0.5");
        assert_eq!(format_f64(1.25), "1.25");
        assert_eq!(f64::from_attr("7").unwrap(), 7.0);
        assert_eq!(bool::from_attr("TRUE"), Some(true));
        assert_eq!(bool::from_attr("yes"), None);
    }
}
