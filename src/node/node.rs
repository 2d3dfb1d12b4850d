//! Immutable node snapshot
//!
//! A [`Node`] owns copies of everything it reports, so it stays valid
//! after the cursor that produced it has moved on.

use super::kind::NodeType;
use crate::error::NodeError;
use std::collections::BTreeMap;

/// Namespace prefix and URI, which only ever travel together
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

/// One projected cursor event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(super) node_type: NodeType,
    pub(super) local_name: String,
    pub(super) value: Option<String>,
    pub(super) depth: usize,
    pub(super) position: usize,
    pub(super) language: Option<String>,
    pub(super) namespace: Option<Namespace>,
    pub(super) attributes: BTreeMap<String, String>,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// `prefix:local_name`, or just the local name when unprefixed
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns.prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of ancestors; the root element is at depth 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 1-based rank among same-named siblings at this depth
    pub fn position(&self) -> usize {
        self.position
    }

    /// `xml:lang` in effect for this node
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.namespace.as_ref().map(|ns| ns.prefix.as_str())
    }

    pub fn uri(&self) -> Option<&str> {
        self.namespace.as_ref().map(|ns| ns.uri.as_str())
    }

    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    /// All attributes, keyed by qualified name
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Value of the attribute with the given qualified name
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::NoSuchAttribute`] when the node has no such
    /// attribute.
    pub fn attribute(&self, name: &str) -> Result<&str, NodeError> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| NodeError::NoSuchAttribute {
                name: name.to_string(),
            })
    }

    pub fn is_element(&self) -> bool {
        self.node_type.is_element()
    }

    pub fn is_start(&self) -> bool {
        self.node_type.is_start()
    }

    pub fn is_end(&self) -> bool {
        self.node_type.is_end()
    }

    pub fn is_entity(&self) -> bool {
        self.node_type.is_entity()
    }

    pub fn is_attribute(&self) -> bool {
        self.node_type.is_attribute()
    }

    pub fn is_cdata(&self) -> bool {
        self.node_type.is_cdata()
    }

    pub fn is_comment(&self) -> bool {
        self.node_type.is_comment()
    }

    pub fn is_document(&self) -> bool {
        self.node_type.is_document()
    }

    pub fn is_document_fragment(&self) -> bool {
        self.node_type.is_document_fragment()
    }

    pub fn is_document_type(&self) -> bool {
        self.node_type.is_document_type()
    }

    pub fn is_entity_reference(&self) -> bool {
        self.node_type.is_entity_reference()
    }

    pub fn is_insignificant_whitespace(&self) -> bool {
        self.node_type.is_insignificant_whitespace()
    }

    pub fn is_notation(&self) -> bool {
        self.node_type.is_notation()
    }

    pub fn is_processing_instruction(&self) -> bool {
        self.node_type.is_processing_instruction()
    }

    pub fn is_significant_whitespace(&self) -> bool {
        self.node_type.is_significant_whitespace()
    }

    pub fn is_text(&self) -> bool {
        self.node_type.is_text()
    }

    pub fn is_xml_declaration(&self) -> bool {
        self.node_type.is_xml_declaration()
    }
}
