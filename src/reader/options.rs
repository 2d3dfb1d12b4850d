//! Reader configuration

/// Default maximum element nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling how a cursor reports the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Report well-formedness errors instead of recovering from them.
    pub strict: bool,
    /// Drop whitespace-only text nodes.
    pub no_blanks: bool,
    /// Report the `<?xml ...?>` declaration as a node.
    pub xml_declaration: bool,
    /// Maximum element nesting depth. Exceeding it stops the cursor with
    /// an error in both strict and lenient mode.
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            strict: false,
            no_blanks: false,
            xml_declaration: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReaderOptions {
    /// Lenient defaults with strict well-formedness checking switched on
    pub fn strict_defaults() -> Self {
        Self::default().strict(true)
    }

    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    pub fn xml_declaration(mut self, yes: bool) -> Self {
        self.xml_declaration = yes;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReaderOptions::default();
        assert!(!options.strict);
        assert!(!options.no_blanks);
        assert!(!options.xml_declaration);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_chained_setters() {
        let options = ReaderOptions::default()
            .strict(true)
            .no_blanks(true)
            .max_depth(4);
        assert!(options.strict);
        assert!(options.no_blanks);
        assert_eq!(options.max_depth, 4);
        assert_eq!(ReaderOptions::strict_defaults(), ReaderOptions::default().strict(true));
    }
}
