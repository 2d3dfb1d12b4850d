//! Node type flags
//!
//! Element start and element end are separate bits so a self-closing
//! element can carry both. Every other kind is a single bit that is never
//! combined with another.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of node type flags
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeType(u32);

impl NodeType {
    pub const ATTRIBUTE: NodeType = NodeType(1 << 0);
    pub const CDATA: NodeType = NodeType(1 << 1);
    pub const COMMENT: NodeType = NodeType(1 << 2);
    pub const DOCUMENT: NodeType = NodeType(1 << 3);
    pub const DOCUMENT_FRAGMENT: NodeType = NodeType(1 << 4);
    pub const DOCUMENT_TYPE: NodeType = NodeType(1 << 5);
    pub const ELEMENT: NodeType = NodeType(1 << 6);
    pub const END_ELEMENT: NodeType = NodeType(1 << 7);
    pub const END_ENTITY: NodeType = NodeType(1 << 8);
    pub const ENTITY: NodeType = NodeType(1 << 9);
    pub const ENTITY_REFERENCE: NodeType = NodeType(1 << 10);
    pub const INSIGNIFICANT_WHITESPACE: NodeType = NodeType(1 << 11);
    pub const NOTATION: NodeType = NodeType(1 << 12);
    pub const PROCESSING_INSTRUCTION: NodeType = NodeType(1 << 13);
    pub const SIGNIFICANT_WHITESPACE: NodeType = NodeType(1 << 14);
    pub const TEXT: NodeType = NodeType(1 << 15);
    pub const XML_DECLARATION: NodeType = NodeType(1 << 16);

    /// ELEMENT | END_ELEMENT, what a self-closing element reports
    pub const SELF_CLOSING_ELEMENT: NodeType = NodeType(Self::ELEMENT.0 | Self::END_ELEMENT.0);

    const ALL: u32 = (1 << 17) - 1;

    const NAMES: [(NodeType, &'static str); 17] = [
        (Self::ATTRIBUTE, "ATTRIBUTE"),
        (Self::CDATA, "CDATA"),
        (Self::COMMENT, "COMMENT"),
        (Self::DOCUMENT, "DOCUMENT"),
        (Self::DOCUMENT_FRAGMENT, "DOCUMENT_FRAGMENT"),
        (Self::DOCUMENT_TYPE, "DOCUMENT_TYPE"),
        (Self::ELEMENT, "ELEMENT"),
        (Self::END_ELEMENT, "END_ELEMENT"),
        (Self::END_ENTITY, "END_ENTITY"),
        (Self::ENTITY, "ENTITY"),
        (Self::ENTITY_REFERENCE, "ENTITY_REFERENCE"),
        (Self::INSIGNIFICANT_WHITESPACE, "INSIGNIFICANT_WHITESPACE"),
        (Self::NOTATION, "NOTATION"),
        (Self::PROCESSING_INSTRUCTION, "PROCESSING_INSTRUCTION"),
        (Self::SIGNIFICANT_WHITESPACE, "SIGNIFICANT_WHITESPACE"),
        (Self::TEXT, "TEXT"),
        (Self::XML_DECLARATION, "XML_DECLARATION"),
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Rebuild a flag set from raw bits, rejecting unknown bits and the
    /// empty set
    pub const fn from_bits(bits: u32) -> Option<NodeType> {
        if bits == 0 || bits & !Self::ALL != 0 {
            None
        } else {
            Some(NodeType(bits))
        }
    }

    /// True when every flag in `other` is set
    #[inline]
    pub const fn contains(self, other: NodeType) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any flag in `other` is set
    #[inline]
    pub const fn intersects(self, other: NodeType) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_element(self) -> bool {
        self.intersects(NodeType(Self::ELEMENT.0 | Self::END_ELEMENT.0))
    }

    pub const fn is_start(self) -> bool {
        self.intersects(NodeType(Self::ELEMENT.0 | Self::ENTITY.0))
    }

    pub const fn is_end(self) -> bool {
        self.intersects(NodeType(Self::END_ELEMENT.0 | Self::END_ENTITY.0))
    }

    pub const fn is_entity(self) -> bool {
        self.intersects(NodeType(Self::ENTITY.0 | Self::END_ENTITY.0))
    }

    pub const fn is_attribute(self) -> bool {
        self.intersects(Self::ATTRIBUTE)
    }

    pub const fn is_cdata(self) -> bool {
        self.intersects(Self::CDATA)
    }

    pub const fn is_comment(self) -> bool {
        self.intersects(Self::COMMENT)
    }

    pub const fn is_document(self) -> bool {
        self.intersects(Self::DOCUMENT)
    }

    pub const fn is_document_fragment(self) -> bool {
        self.intersects(Self::DOCUMENT_FRAGMENT)
    }

    pub const fn is_document_type(self) -> bool {
        self.intersects(Self::DOCUMENT_TYPE)
    }

    pub const fn is_entity_reference(self) -> bool {
        self.intersects(Self::ENTITY_REFERENCE)
    }

    pub const fn is_insignificant_whitespace(self) -> bool {
        self.intersects(Self::INSIGNIFICANT_WHITESPACE)
    }

    pub const fn is_notation(self) -> bool {
        self.intersects(Self::NOTATION)
    }

    pub const fn is_processing_instruction(self) -> bool {
        self.intersects(Self::PROCESSING_INSTRUCTION)
    }

    pub const fn is_significant_whitespace(self) -> bool {
        self.intersects(Self::SIGNIFICANT_WHITESPACE)
    }

    pub const fn is_text(self) -> bool {
        self.intersects(Self::TEXT)
    }

    pub const fn is_xml_declaration(self) -> bool {
        self.intersects(Self::XML_DECLARATION)
    }
}

impl BitOr for NodeType {
    type Output = NodeType;

    fn bitor(self, rhs: NodeType) -> NodeType {
        NodeType(self.0 | rhs.0)
    }
}

impl BitOrAssign for NodeType {
    fn bitor_assign(&mut self, rhs: NodeType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_is_start_and_end() {
        let t = NodeType::ELEMENT | NodeType::END_ELEMENT;
        assert_eq!(t, NodeType::SELF_CLOSING_ELEMENT);
        assert!(t.is_element());
        assert!(t.is_start());
        assert!(t.is_end());
        assert!(!t.is_entity());
        assert!(!t.is_text());
    }

    #[test]
    fn test_entity_groups() {
        assert!(NodeType::ENTITY.is_start());
        assert!(NodeType::ENTITY.is_entity());
        assert!(!NodeType::ENTITY.is_element());
        assert!(NodeType::END_ENTITY.is_end());
        assert!(NodeType::END_ENTITY.is_entity());
    }

    #[test]
    fn test_single_flags_are_exclusive() {
        for (flag, _) in NodeType::NAMES {
            let predicates = [
                flag.is_attribute(),
                flag.is_cdata(),
                flag.is_comment(),
                flag.is_document(),
                flag.is_document_fragment(),
                flag.is_document_type(),
                flag.is_entity_reference(),
                flag.is_insignificant_whitespace(),
                flag.is_notation(),
                flag.is_processing_instruction(),
                flag.is_significant_whitespace(),
                flag.is_text(),
                flag.is_xml_declaration(),
            ];
            assert!(predicates.iter().filter(|&&p| p).count() <= 1, "{flag:?}");
        }
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(NodeType::from_bits(NodeType::TEXT.bits()), Some(NodeType::TEXT));
        assert_eq!(NodeType::from_bits(0), None);
        assert_eq!(NodeType::from_bits(1 << 20), None);
    }

    #[test]
    fn test_debug_lists_flags() {
        assert_eq!(format!("{:?}", NodeType::SELF_CLOSING_ELEMENT), "ELEMENT | END_ELEMENT");
        assert_eq!(format!("{:?}", NodeType::TEXT), "TEXT");
    }
}
