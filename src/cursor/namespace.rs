//! Namespace scopes
//!
//! Stack of prefix bindings, one scope per open element.

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

#[derive(Debug, Clone)]
struct Binding {
    prefix: String,
    uri: String,
    depth: usize,
}

/// Prefix to URI resolver following element scope
#[derive(Debug, Clone)]
pub struct NamespaceScopes {
    bindings: Vec<Binding>,
    depth: usize,
}

impl Default for NamespaceScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScopes {
    /// Create scopes with the `xml` and `xmlns` prefixes pre-bound
    pub fn new() -> Self {
        let predeclared = |prefix: &str, uri: &str| Binding {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            depth: 0,
        };
        NamespaceScopes {
            bindings: vec![predeclared("xml", ns::XML), predeclared("xmlns", ns::XMLNS)],
            depth: 0,
        }
    }

    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave the current scope, dropping the bindings it declared
    pub fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Bind `prefix` in the current scope. `xml` and `xmlns` cannot be
    /// rebound.
    pub fn declare(&mut self, prefix: &str, uri: &str) {
        if prefix == "xml" || prefix == "xmlns" {
            return;
        }
        self.bindings.push(Binding {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            depth: self.depth,
        });
    }

    /// Bind every `xmlns:p="uri"` found in an attribute list
    pub fn declare_all<'a, I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (name, value) in attributes {
            if let Some(prefix) = name.strip_prefix("xmlns:") {
                self.declare(prefix, value);
            }
        }
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|binding| binding.prefix == prefix)
            .map(|binding| binding.uri.as_str())
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predeclared_prefixes() {
        let scopes = NamespaceScopes::new();
        assert_eq!(scopes.resolve("xml"), Some(ns::XML));
        assert_eq!(scopes.resolve("xmlns"), Some(ns::XMLNS));
        assert_eq!(scopes.resolve("t"), None);
    }

    #[test]
    fn test_scope_pop_drops_bindings() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.declare("t", "url:kevin.herrera.io");
        assert_eq!(scopes.resolve("t"), Some("url:kevin.herrera.io"));
        scopes.pop_scope();
        assert_eq!(scopes.resolve("t"), None);
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_shadowing() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.declare("ns", "urn:one");
        scopes.push_scope();
        scopes.declare("ns", "urn:two");
        assert_eq!(scopes.resolve("ns"), Some("urn:two"));
        scopes.pop_scope();
        assert_eq!(scopes.resolve("ns"), Some("urn:one"));
    }

    #[test]
    fn test_declare_all_and_reserved() {
        let attrs = vec![
            ("xmlns:a".to_string(), "urn:a".to_string()),
            ("xmlns:xml".to_string(), "urn:bogus".to_string()),
            ("xmlns".to_string(), "urn:default".to_string()),
            ("id".to_string(), "1".to_string()),
        ];
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.declare_all(&attrs);
        assert_eq!(scopes.resolve("a"), Some("urn:a"));
        assert_eq!(scopes.resolve("xml"), Some(ns::XML));
        assert_eq!(scopes.resolve(""), None);
    }
}
