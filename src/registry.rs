//! Node-model registry: binds string names to node constructors.
//!
//! Documents refer to node implementations by name (`default`, `mobile`, ...)
//! or by class name. Each binding carries an explicit factory closure; there
//! is no dynamic loading.

use crate::error::{Result, TopologyError};
use crate::model::{DEFAULT_NODE_CLASS, Node};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// Name that always resolves to the topology's default node model.
pub const DEFAULT_MODEL: &str = "default";

pub type NodeFactory = Arc<dyn Fn() -> Node + Send + Sync>;

/// A node implementation: its class name and a constructor.
#[derive(Clone)]
pub struct NodeModel {
    class: String,
    factory: NodeFactory,
}

impl NodeModel {
    pub fn new(class: impl Into<String>, factory: impl Fn() -> Node + Send + Sync + 'static) -> Self {
        Self {
            class: class.into(),
            factory: Arc::new(factory),
        }
    }

    /// A model whose nodes carry nothing but the class name.
    pub fn plain(class: impl Into<String>) -> Self {
        Self::new(class, Node::default)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    fn build(&self) -> Node {
        let mut node = (self.factory)();
        node.model = self.class.clone();
        node
    }
}

impl std::fmt::Debug for NodeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeModel").field("class", &self.class).finish_non_exhaustive()
    }
}

/// Registration table, in registration order.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: IndexMap<String, NodeModel>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        let mut models = IndexMap::new();
        models.insert(DEFAULT_MODEL.to_string(), NodeModel::plain(DEFAULT_NODE_CLASS));
        Self { models }
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `model`, replacing any previous binding.
    pub fn register(&mut self, name: impl Into<String>, model: NodeModel) {
        let name = name.into();
        log::debug!("Registering node model '{}' -> {}", name, model.class);
        self.models.insert(name, model);
    }

    /// Build a fresh node of the model bound to `name`.
    pub fn instantiate(&self, name: &str) -> Result<Node> {
        self.lookup(name)
            .map(NodeModel::build)
            .ok_or_else(|| TopologyError::UnknownModel {
                name: name.to_string(),
            })
    }

    pub fn lookup(&self, name: &str) -> Option<&NodeModel> {
        self.models.get(name)
    }

    pub fn class_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(NodeModel::class)
    }

    /// First registered name bound to `class`.
    pub fn name_of(&self, class: &str) -> Option<&str> {
        self.models
            .iter()
            .find(|(_, m)| m.class == class)
            .map(|(n, _)| n.as_str())
    }

    /// Class of the `default` binding.
    pub fn default_class(&self) -> &str {
        self.class_of(DEFAULT_MODEL).unwrap_or(DEFAULT_NODE_CLASS)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeModel)> {
        self.models.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Bind `name` to whatever model already implements `class`. When no
    /// registered model has that class a plain model is bound instead.
    pub fn bind_class(&mut self, name: &str, class: &str) {
        let model = match self.models.values().find(|m| m.class == class) {
            Some(existing) => existing.clone(),
            None => {
                log::warn!(
                    "No constructor registered for class '{}'; '{}' will build plain nodes",
                    class,
                    name
                );
                NodeModel::plain(class)
            }
        };
        self.register(name, model);
    }
}

impl Serialize for ModelRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.models.len()))?;
        for (name, model) in &self.models {
            map.serialize_entry(name, &model.class)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn default_always_resolves() {
        let reg = ModelRegistry::new();
        let node = reg.instantiate(DEFAULT_MODEL).unwrap();
        assert_eq!(node.model, DEFAULT_NODE_CLASS);
        assert_eq!(reg.default_class(), DEFAULT_NODE_CLASS);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let reg = ModelRegistry::new();
        let err = reg.instantiate("mobile").unwrap_err();
        assert!(matches!(err, TopologyError::UnknownModel { ref name } if name == "mobile"));
    }

    #[test]
    fn factory_runs_and_class_is_stamped() {
        let mut reg = ModelRegistry::new();
        reg.register(
            "sensor",
            NodeModel::new("SensorNode", || {
                let mut node = Node::default();
                node.color = Some(Color::RED);
                node
            }),
        );
        let node = reg.instantiate("sensor").unwrap();
        assert_eq!(node.model, "SensorNode");
        assert_eq!(node.color, Some(Color::RED));
        assert_eq!(reg.name_of("SensorNode"), Some("sensor"));
        assert_eq!(reg.name_of("Nope"), None);
    }

    #[test]
    fn reregistering_replaces() {
        let mut reg = ModelRegistry::new();
        reg.register("m", NodeModel::plain("A"));
        reg.register("m", NodeModel::plain("B"));
        assert_eq!(reg.class_of("m"), Some("B"));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["default", "m"]);
    }

    #[test]
    fn bind_class_reuses_existing_factory() {
        let mut reg = ModelRegistry::new();
        reg.register(
            "sensor",
            NodeModel::new("SensorNode", || {
                let mut node = Node::default();
                node.icon_size = 20;
                node
            }),
        );
        reg.bind_class("alias", "SensorNode");
        assert_eq!(reg.instantiate("alias").unwrap().icon_size, 20);

        reg.bind_class("other", "UnknownClass");
        let n = reg.instantiate("other").unwrap();
        assert_eq!(n.model, "UnknownClass");
        assert_eq!(n.icon_size, Node::default().icon_size);
    }
}
