//! Validating constructor for [`Node`]
//!
//! Setters consume and return the builder so configuration chains; all
//! checking happens in [`NodeBuilder::build`].

use super::kind::NodeType;
use super::node::{Namespace, Node};
use crate::error::BuildError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    attributes: BTreeMap<String, String>,
    depth: Option<usize>,
    language: Option<String>,
    local_name: Option<String>,
    position: Option<usize>,
    prefix: Option<String>,
    node_type: Option<NodeType>,
    uri: Option<String>,
    value: Option<String>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one attribute, replacing any previous value under that name
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replace all attributes
    pub fn attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes = attributes
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn language<S: Into<String>>(mut self, language: Option<S>) -> Self {
        self.language = language.map(Into::into);
        self
    }

    pub fn local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
        self.prefix = prefix.map(Into::into);
        self
    }

    pub fn node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn uri<S: Into<String>>(mut self, uri: Option<S>) -> Self {
        self.uri = uri.map(Into::into);
        self
    }

    pub fn value<S: Into<String>>(mut self, value: Option<S>) -> Self {
        self.value = value.map(Into::into);
        self
    }

    /// Validate and construct the node.
    ///
    /// # Errors
    ///
    /// Checked in order: depth, local name (an empty name counts as
    /// unset), position (0 counts as unset), type, then the prefix/URI
    /// pairing.
    pub fn build(self) -> Result<Node, BuildError> {
        let depth = self.depth.ok_or(BuildError::MissingDepth)?;
        let local_name = self
            .local_name
            .filter(|name| !name.is_empty())
            .ok_or(BuildError::MissingLocalName)?;
        let position = self
            .position
            .filter(|&position| position > 0)
            .ok_or(BuildError::MissingPosition)?;
        let node_type = self.node_type.ok_or(BuildError::MissingType)?;

        let namespace = match (self.prefix, self.uri) {
            (Some(prefix), Some(uri)) => Some(Namespace { prefix, uri }),
            (None, Some(_)) => return Err(BuildError::MissingPrefix),
            (Some(_), None) => return Err(BuildError::MissingUri),
            (None, None) => None,
        };

        Ok(Node {
            node_type,
            local_name,
            value: self.value,
            depth,
            position,
            language: self.language,
            namespace,
            attributes: self.attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NodeBuilder {
        NodeBuilder::new()
            .depth(0)
            .local_name("root")
            .position(1)
            .node_type(NodeType::ELEMENT)
    }

    #[test]
    fn test_build_minimal() {
        let node = complete().build().unwrap();
        assert_eq!(node.local_name(), "root");
        assert_eq!(node.depth(), 0);
        assert_eq!(node.position(), 1);
        assert_eq!(node.node_type(), NodeType::ELEMENT);
        assert!(node.attributes().is_empty());
        assert_eq!(node.prefix(), None);
    }

    #[test]
    fn test_missing_required_fields() {
        let no_depth = NodeBuilder::new()
            .local_name("root")
            .position(1)
            .node_type(NodeType::ELEMENT);
        assert_eq!(no_depth.build(), Err(BuildError::MissingDepth));

        let no_name = NodeBuilder::new()
            .depth(0)
            .position(1)
            .node_type(NodeType::ELEMENT);
        assert_eq!(no_name.build(), Err(BuildError::MissingLocalName));

        let no_position = NodeBuilder::new()
            .depth(0)
            .local_name("root")
            .node_type(NodeType::ELEMENT);
        assert_eq!(no_position.build(), Err(BuildError::MissingPosition));

        let no_type = NodeBuilder::new().depth(0).local_name("root").position(1);
        assert_eq!(no_type.build(), Err(BuildError::MissingType));
    }

    #[test]
    fn test_empty_name_and_zero_position_are_unset() {
        assert_eq!(complete().local_name("").build(), Err(BuildError::MissingLocalName));
        assert_eq!(complete().position(0).build(), Err(BuildError::MissingPosition));
    }

    #[test]
    fn test_depth_checked_before_everything() {
        assert_eq!(NodeBuilder::new().build(), Err(BuildError::MissingDepth));
        assert_eq!(
            NodeBuilder::new().depth(0).uri(Some("urn:x")).build(),
            Err(BuildError::MissingLocalName)
        );
    }

    #[test]
    fn test_namespace_pairing() {
        assert_eq!(
            complete().uri(Some("urn:x")).build(),
            Err(BuildError::MissingPrefix)
        );
        assert_eq!(complete().prefix(Some("x")).build(), Err(BuildError::MissingUri));

        let node = complete().prefix(Some("x")).uri(Some("urn:x")).build().unwrap();
        assert_eq!(node.prefix(), Some("x"));
        assert_eq!(node.uri(), Some("urn:x"));
    }

    #[test]
    fn test_bulk_attributes_replace_individual_ones() {
        let node = complete()
            .attribute("old", "1")
            .attributes([("a", "alpha"), ("type", "test")])
            .attribute("type", "final")
            .build()
            .unwrap();

        assert_eq!(node.attributes().len(), 2);
        assert_eq!(node.attribute("a"), Ok("alpha"));
        assert_eq!(node.attribute("type"), Ok("final"));
        assert!(!node.has_attribute("old"));
    }

    #[test]
    fn test_optional_fields_pass_through() {
        let node = complete()
            .value(Some("v"))
            .language(Some("en"))
            .build()
            .unwrap();
        assert_eq!(node.value(), Some("v"));
        assert_eq!(node.language(), Some("en"));

        let cleared = complete()
            .value(Some("v"))
            .value(None::<String>)
            .build()
            .unwrap();
        assert_eq!(cleared.value(), None);
    }
}
