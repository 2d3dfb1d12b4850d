//! Node reader
//!
//! [`Reader`] walks a cursor and projects every token into a
//! `(path, Node)` pair. The cursor comes from a [`CursorSource`] and is
//! replaced on every [`rewind`](Reader::rewind), so one reader can be
//! iterated any number of times.

pub mod options;
pub mod source;

pub use options::ReaderOptions;
pub use source::{
    BufferSource, CursorSource, FileSource, FnSource, ReaderFactory, Resource, ResourceSource,
    StreamSource,
};

use crate::cursor::{Cursor, CursorKind};
use crate::error::ReaderError;
use crate::node::{Node, NodeBuilder, NodeType, PathTracker};
use log::debug;
use std::iter::FusedIterator;

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Projects cursor tokens into node snapshots keyed by path
pub struct Reader<S: CursorSource> {
    source: S,
    cursor: Option<S::Cursor>,
    tracker: PathTracker,
}

impl<S: CursorSource> Reader<S> {
    /// Create an unbound reader. Nothing is opened until
    /// [`rewind`](Self::rewind).
    pub fn new(source: S) -> Self {
        Reader {
            source,
            cursor: None,
            tracker: PathTracker::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Open a fresh cursor, forget all positions, and move to the first
    /// token.
    pub fn rewind(&mut self) -> Result<(), ReaderError> {
        let cursor = self.source.open()?;
        debug!("rewinding reader over {}", self.source.describe());
        self.cursor = Some(cursor);
        self.tracker.clear();
        self.advance()
    }

    /// Move to the next token.
    ///
    /// Running off the end of the document is not an error; afterwards
    /// [`valid`](Self::valid) is false.
    ///
    /// # Errors
    ///
    /// [`ReaderError::MissingCursor`] before the first rewind, and
    /// [`ReaderError::Parse`] when the cursor stopped on malformed input.
    pub fn advance(&mut self) -> Result<(), ReaderError> {
        let cursor = self.cursor.as_mut().ok_or(ReaderError::MissingCursor)?;

        // A start tag with children stays open until its end tag
        if !(cursor.kind().is_start() && !cursor.is_self_closing()) {
            self.tracker.pop();
        }

        if !cursor.advance() {
            return match cursor.error() {
                Some(err) => Err(ReaderError::Parse(err.clone())),
                None => Ok(()),
            };
        }

        if !cursor.kind().is_end() {
            self.tracker.push(cursor.name());
        }
        Ok(())
    }

    /// Snapshot of the current token
    pub fn current(&self) -> Result<Node, ReaderError> {
        let cursor = self.cursor.as_ref().ok_or(ReaderError::MissingCursor)?;

        let mut builder = NodeBuilder::new()
            .attributes(cursor.attributes().iter().map(|(name, value)| (name, value)))
            .depth(cursor.depth())
            .language(non_empty(cursor.language()))
            .local_name(cursor.local_name())
            .prefix(non_empty(cursor.prefix()))
            .uri(non_empty(cursor.namespace_uri()))
            .value(non_empty(cursor.value()));

        if let Some(position) = self.tracker.position() {
            builder = builder.position(position);
        }

        let kind = cursor.kind();
        let node_type = if kind == CursorKind::Element && cursor.is_self_closing() {
            Some(NodeType::SELF_CLOSING_ELEMENT)
        } else {
            kind.node_type()
        };
        if let Some(node_type) = node_type {
            builder = builder.node_type(node_type);
        }

        Ok(builder.build()?)
    }

    /// Path of the current token
    pub fn key(&self) -> Result<String, ReaderError> {
        self.cursor.as_ref().ok_or(ReaderError::MissingCursor)?;
        Ok(self.tracker.path())
    }

    /// True while the cursor is positioned on a token
    pub fn valid(&self) -> bool {
        self.cursor
            .as_ref()
            .is_some_and(|cursor| cursor.kind() != CursorKind::None)
    }

    /// Iterate from the start of the document
    pub fn nodes(&mut self) -> Nodes<'_, S> {
        Nodes {
            reader: self,
            started: false,
            pending: None,
            done: false,
        }
    }
}

/// Iterator over `(path, Node)` pairs, created by [`Reader::nodes`].
///
/// Rewinds on the first call to `next`. An error is yielded once and ends
/// the iteration.
pub struct Nodes<'r, S: CursorSource> {
    reader: &'r mut Reader<S>,
    started: bool,
    pending: Option<ReaderError>,
    done: bool,
}

impl<S: CursorSource> Nodes<'_, S> {
    fn stop(&mut self, err: ReaderError) -> Option<Result<(String, Node), ReaderError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<S: CursorSource> Iterator for Nodes<'_, S> {
    type Item = Result<(String, Node), ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(err) = self.pending.take() {
            return self.stop(err);
        }
        if !self.started {
            self.started = true;
            if let Err(err) = self.reader.rewind() {
                return self.stop(err);
            }
        }
        if !self.reader.valid() {
            self.done = true;
            return None;
        }

        let pair = match (self.reader.key(), self.reader.current()) {
            (Ok(key), Ok(node)) => (key, node),
            (Err(err), _) | (_, Err(err)) => return self.stop(err),
        };
        if let Err(err) = self.reader.advance() {
            self.pending = Some(err);
        }
        Some(Ok(pair))
    }
}

impl<S: CursorSource> FusedIterator for Nodes<'_, S> {}

impl<'r, S: CursorSource> IntoIterator for &'r mut Reader<S> {
    type Item = Result<(String, Node), ReaderError>;
    type IntoIter = Nodes<'r, S>;

    fn into_iter(self) -> Nodes<'r, S> {
        self.nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, OpenError};
    use crate::SliceCursor;
    use std::collections::BTreeMap;

    const FIXTURE: &str = "<root a=\"alpha\" type=\"test\">\n  <child id=\"1\">\n    <t:sub xml:lang=\"es\" xmlns:t=\"url:kevin.herrera.io\">prueba</t:sub>\n    <t:sub xmlns:t=\"url:kevin.herrera.io\"/>\n  </child>\n</root>\n";
    const URI: &str = "url:kevin.herrera.io";

    fn reader(xml: &str) -> Reader<BufferSource> {
        Reader::new(BufferSource::new(xml.as_bytes()))
    }

    fn collect(xml: &str) -> Vec<(String, Node)> {
        reader(xml).nodes().collect::<Result<_, _>>().unwrap()
    }

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fixture_paths_and_nodes() {
        let nodes = collect(FIXTURE);
        let keys: Vec<&str> = nodes.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "/root",
                "/root/#text",
                "/root/child",
                "/root/child/#text",
                "/root/child/t:sub",
                "/root/child/t:sub/#text",
                "/root/child/t:sub",
                "/root/child/#text[2]",
                "/root/child/t:sub[2]",
                "/root/child/#text[3]",
                "/root/child",
                "/root/#text[2]",
                "/root",
            ]
        );

        let root = &nodes[0].1;
        assert_eq!(root.node_type(), NodeType::ELEMENT);
        assert_eq!((root.depth(), root.position()), (0, 1));
        assert_eq!(root.attributes(), &attrs(&[("a", "alpha"), ("type", "test")]));
        assert_eq!(root.value(), None);

        let indent = &nodes[1].1;
        assert_eq!(indent.node_type(), NodeType::SIGNIFICANT_WHITESPACE);
        assert_eq!(indent.local_name(), "#text");
        assert_eq!(indent.value(), Some("\n  "));

        let sub = &nodes[4].1;
        assert_eq!(sub.depth(), 2);
        assert_eq!(sub.local_name(), "sub");
        assert_eq!(sub.qualified_name(), "t:sub");
        assert_eq!(sub.prefix(), Some("t"));
        assert_eq!(sub.uri(), Some(URI));
        assert_eq!(sub.language(), Some("es"));
        assert_eq!(
            sub.attributes(),
            &attrs(&[("xml:lang", "es"), ("xmlns:t", URI)])
        );

        let text = &nodes[5].1;
        assert_eq!(text.node_type(), NodeType::TEXT);
        assert_eq!((text.depth(), text.position()), (3, 1));
        assert_eq!(text.value(), Some("prueba"));
        assert_eq!(text.language(), Some("es"));

        let sub_end = &nodes[6].1;
        assert_eq!(sub_end.node_type(), NodeType::END_ELEMENT);
        assert!(sub_end.is_end() && !sub_end.is_start());
        assert_eq!(sub_end.attributes(), sub.attributes());
        assert_eq!(sub_end.language(), Some("es"));

        let second_indent = &nodes[7].1;
        assert_eq!(second_indent.position(), 2);
        assert_eq!(second_indent.language(), None);

        let empty_sub = &nodes[8].1;
        assert_eq!(empty_sub.node_type(), NodeType::SELF_CLOSING_ELEMENT);
        assert_eq!((empty_sub.depth(), empty_sub.position()), (2, 2));
        assert_eq!(empty_sub.uri(), Some(URI));
        assert_eq!(empty_sub.language(), None);

        let child_end = &nodes[10].1;
        assert_eq!(child_end.node_type(), NodeType::END_ELEMENT);
        assert_eq!(child_end.attribute("id"), Ok("1"));

        assert_eq!(nodes[11].1.value(), Some("\n"));
        let root_end = &nodes[12].1;
        assert_eq!(root_end.node_type(), NodeType::END_ELEMENT);
        assert_eq!(root_end.attributes(), root.attributes());
    }

    #[test]
    fn test_element_with_self_closing_child() {
        let nodes = collect("<root a=\"alpha\"><child/></root>");
        let elements: Vec<_> = nodes.iter().filter(|(_, node)| node.is_start()).collect();
        assert_eq!(elements.len(), 2);

        let (key, root) = elements[0];
        assert_eq!(key, "/root");
        assert_eq!((root.depth(), root.position()), (0, 1));
        assert_eq!(root.attributes(), &attrs(&[("a", "alpha")]));

        let (key, child) = elements[1];
        assert_eq!(key, "/root/child");
        assert_eq!((child.depth(), child.position()), (1, 1));
        assert!(child.is_start() && child.is_end());
    }

    #[test]
    fn test_repeated_siblings() {
        let nodes = collect("<r><a/><a/></r>");
        let keyed: Vec<(&str, usize)> = nodes
            .iter()
            .map(|(key, node)| (key.as_str(), node.position()))
            .collect();
        assert_eq!(keyed, vec![("/r", 1), ("/r/a", 1), ("/r/a[2]", 2), ("/r", 1)]);
    }

    #[test]
    fn test_self_closing_matches_open_close_pair() {
        let open_close = collect("<r><x/><a></a><a></a></r>");
        let self_closing = collect("<r><x/><a/><a/></r>");

        let second_a = |nodes: &[(String, Node)]| {
            nodes
                .iter()
                .find(|(key, node)| key == "/r/a[2]" && node.is_start())
                .map(|(_, node)| (node.depth(), node.position()))
        };
        assert_eq!(second_a(&open_close), Some((1, 2)));
        assert_eq!(second_a(&self_closing), second_a(&open_close));
    }

    #[test]
    fn test_rewind_round_trip() {
        let mut reader = reader(FIXTURE);
        let first: Vec<_> = reader.nodes().collect::<Result<_, _>>().unwrap();
        let second: Vec<_> = (&mut reader).into_iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rewind_mid_iteration_resets() {
        let mut reader = reader("<r><a/><a/></r>");
        reader.rewind().unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        assert_eq!(reader.key().unwrap(), "/r/a[2]");

        reader.rewind().unwrap();
        assert_eq!(reader.key().unwrap(), "/r");
        reader.advance().unwrap();
        assert_eq!(reader.key().unwrap(), "/r/a");
    }

    #[test]
    fn test_unbound_reader() {
        let mut reader = reader("<r/>");
        assert!(!reader.valid());
        assert!(matches!(reader.current(), Err(ReaderError::MissingCursor)));
        assert!(matches!(reader.key(), Err(ReaderError::MissingCursor)));
        assert!(matches!(reader.advance(), Err(ReaderError::MissingCursor)));
    }

    #[test]
    fn test_manual_protocol_until_exhausted() {
        let mut reader = reader("<r>x</r>");
        reader.rewind().unwrap();
        let mut keys = Vec::new();
        while reader.valid() {
            keys.push(reader.key().unwrap());
            reader.advance().unwrap();
        }
        assert_eq!(keys, vec!["/r", "/r/#text", "/r"]);

        // Exhausted readers stay exhausted without erroring
        reader.advance().unwrap();
        assert!(!reader.valid());
        assert_eq!(reader.key().unwrap(), "/");
    }

    #[test]
    fn test_lenient_recovers_after_malformed_markup() {
        let keys: Vec<String> = collect("<r><a>1</a><1/><b/></r>")
            .into_iter()
            .map(|(key, node)| format!("{key}:{:?}", node.node_type()))
            .collect();
        assert_eq!(keys.len(), 6);
        assert!(keys[4].starts_with("/r/b:"));
        assert!(keys[5].starts_with("/r:"));

        let mut reader = reader("<r><!x><a/></r>");
        reader.rewind().unwrap();
        let mut paths = Vec::new();
        while reader.valid() {
            paths.push(reader.key().unwrap());
            reader.advance().unwrap();
        }
        assert_eq!(paths, vec!["/r", "/r/a", "/r"]);
        assert_eq!(reader.key().unwrap(), "/");
    }

    #[test]
    fn test_for_loop_over_reader() {
        let mut reader = reader("<r><a/></r>");
        let mut count = 0;
        for item in &mut reader {
            item.unwrap();
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_parse_error_ends_iteration() {
        let mut reader = Reader::new(BufferSource::with_options(
            "<r><a></b></r>".as_bytes(),
            ReaderOptions::strict_defaults(),
        ));
        let mut nodes = reader.nodes();
        assert_eq!(nodes.next().unwrap().unwrap().0, "/r");
        assert_eq!(nodes.next().unwrap().unwrap().0, "/r/a");
        match nodes.next() {
            Some(Err(ReaderError::Parse(err))) => assert!(err.message.contains("Mismatched")),
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(nodes.next().is_none());
        assert!(nodes.next().is_none());
    }

    #[test]
    fn test_unbound_prefix_fails_to_build_in_lenient_mode() {
        let mut reader = reader("<x:r/>");
        let result: Result<Vec<_>, _> = reader.nodes().collect();
        assert!(matches!(result, Err(ReaderError::Build(BuildError::MissingUri))));
    }

    #[test]
    fn test_open_error_is_yielded_once() {
        let mut reader = Reader::new(FnSource::new(|| Err::<SliceCursor, _>("nothing")));
        let items: Vec<_> = reader.nodes().collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(
            items[0],
            Err(ReaderError::Open(OpenError::InvalidProducerResult { .. }))
        ));
    }

    #[test]
    fn test_leaf_node_types() {
        let options = ReaderOptions::default().xml_declaration(true);
        let mut reader = Reader::new(BufferSource::with_options(
            "<?xml version=\"1.0\"?><!DOCTYPE r><r><!--c--><![CDATA[d]]><?p q?></r>".as_bytes(),
            options,
        ));
        let nodes: Vec<_> = reader.nodes().collect::<Result<_, _>>().unwrap();
        let summary: Vec<(&str, NodeType)> = nodes
            .iter()
            .map(|(key, node)| (key.as_str(), node.node_type()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("/xml", NodeType::XML_DECLARATION),
                ("/r", NodeType::DOCUMENT_TYPE),
                // The doctype carries the root's name, so the root counts second
                ("/r[2]", NodeType::ELEMENT),
                ("/r[2]/#comment", NodeType::COMMENT),
                ("/r[2]/#cdata-section", NodeType::CDATA),
                ("/r[2]/p", NodeType::PROCESSING_INSTRUCTION),
                ("/r[2]", NodeType::END_ELEMENT),
            ]
        );
        assert_eq!(nodes[5].1.value(), Some("q"));
    }
}
