//! Forward-only XML cursors
//!
//! A [`Cursor`] reports one token at a time and keeps no history. The
//! reader projects each token into a [`Node`](crate::node::Node);
//! [`SliceCursor`] is the cursor this crate ships.

pub mod namespace;
pub mod slice;

pub use slice::SliceCursor;

use crate::core::tokenizer::ParseError;
use crate::node::NodeType;

/// Kind of the token a cursor is positioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    /// Not positioned on anything (before the first or after the last token)
    None,
    Element,
    EndElement,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
    SignificantWhitespace,
    Whitespace,
    DocumentType,
    XmlDeclaration,
    Entity,
    EndEntity,
    EntityReference,
    Notation,
    Attribute,
    Document,
    DocumentFragment,
}

impl CursorKind {
    /// The node type this kind projects to; `None` has no node type
    pub fn node_type(self) -> Option<NodeType> {
        let node_type = match self {
            CursorKind::None => return None,
            CursorKind::Element => NodeType::ELEMENT,
            CursorKind::EndElement => NodeType::END_ELEMENT,
            CursorKind::Text => NodeType::TEXT,
            CursorKind::CData => NodeType::CDATA,
            CursorKind::Comment => NodeType::COMMENT,
            CursorKind::ProcessingInstruction => NodeType::PROCESSING_INSTRUCTION,
            CursorKind::SignificantWhitespace => NodeType::SIGNIFICANT_WHITESPACE,
            CursorKind::Whitespace => NodeType::INSIGNIFICANT_WHITESPACE,
            CursorKind::DocumentType => NodeType::DOCUMENT_TYPE,
            CursorKind::XmlDeclaration => NodeType::XML_DECLARATION,
            CursorKind::Entity => NodeType::ENTITY,
            CursorKind::EndEntity => NodeType::END_ENTITY,
            CursorKind::EntityReference => NodeType::ENTITY_REFERENCE,
            CursorKind::Notation => NodeType::NOTATION,
            CursorKind::Attribute => NodeType::ATTRIBUTE,
            CursorKind::Document => NodeType::DOCUMENT,
            CursorKind::DocumentFragment => NodeType::DOCUMENT_FRAGMENT,
        };
        Some(node_type)
    }

    /// Element or entity start
    pub fn is_start(self) -> bool {
        matches!(self, CursorKind::Element | CursorKind::Entity)
    }

    /// Element or entity end
    pub fn is_end(self) -> bool {
        matches!(self, CursorKind::EndElement | CursorKind::EndEntity)
    }
}

/// A forward-only pull cursor over an XML document.
///
/// String accessors return `""` when the current token has no such
/// property.
pub trait Cursor {
    /// Move to the next token. Returns `false` once the document is
    /// exhausted or the cursor stopped on an error.
    fn advance(&mut self) -> bool;

    fn kind(&self) -> CursorKind;

    /// True for an element start that has no separate end token
    fn is_self_closing(&self) -> bool;

    /// Qualified name of the current token
    fn name(&self) -> &str;

    fn local_name(&self) -> &str;

    fn prefix(&self) -> &str;

    fn namespace_uri(&self) -> &str;

    /// `xml:lang` in effect for the current token
    fn language(&self) -> &str;

    fn depth(&self) -> usize;

    fn value(&self) -> &str;

    /// Attributes of the current token as (qualified name, value) pairs
    fn attributes(&self) -> &[(String, String)];

    /// Why the cursor stopped early, if it did
    fn error(&self) -> Option<&ParseError> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(CursorKind::None.node_type(), None);
        assert_eq!(CursorKind::Element.node_type(), Some(NodeType::ELEMENT));
        assert_eq!(
            CursorKind::Whitespace.node_type(),
            Some(NodeType::INSIGNIFICANT_WHITESPACE)
        );
        assert_eq!(
            CursorKind::SignificantWhitespace.node_type(),
            Some(NodeType::SIGNIFICANT_WHITESPACE)
        );
    }

    #[test]
    fn test_start_and_end_kinds() {
        assert!(CursorKind::Element.is_start());
        assert!(CursorKind::Entity.is_start());
        assert!(!CursorKind::Text.is_start());
        assert!(CursorKind::EndElement.is_end());
        assert!(CursorKind::EndEntity.is_end());
        assert!(!CursorKind::Element.is_end());
    }
}
