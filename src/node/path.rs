//! Sibling-position and path tracking
//!
//! [`PathTracker`] mirrors the stack of open nodes and counts, per depth,
//! how often each name has appeared under the current parent.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    /// Qualified name of each open node, outermost first
    names: Vec<String>,
    /// Name occurrence counts, indexed by depth
    positions: Vec<HashMap<String, usize>>,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a node named `name` one level below the current one
    pub fn push(&mut self, name: &str) {
        let depth = self.names.len();
        if self.positions.len() <= depth {
            self.positions.resize_with(depth + 1, HashMap::new);
        }
        *self.positions[depth].entry(name.to_string()).or_insert(0) += 1;
        self.names.push(name.to_string());
    }

    /// Leave the current node. Counts kept for its children are dropped,
    /// so the next sibling starts numbering its children from 1.
    pub fn pop(&mut self) {
        if self.names.is_empty() {
            return;
        }
        let depth = self.names.len() - 1;
        self.positions.truncate(depth + 1);
        self.names.pop();
    }

    /// Position of the current node among same-named siblings
    pub fn position(&self) -> Option<usize> {
        let name = self.names.last()?;
        let depth = self.names.len() - 1;
        self.positions.get(depth)?.get(name).copied()
    }

    /// Depth of the current node, or `None` when nothing is open
    pub fn depth(&self) -> Option<usize> {
        self.names.len().checked_sub(1)
    }

    /// `/`-separated path of open nodes. A step carries `[n]` only when
    /// its position is above 1. An empty tracker yields `/`.
    pub fn path(&self) -> String {
        if self.names.is_empty() {
            return "/".to_string();
        }
        let mut path = String::new();
        for (depth, name) in self.names.iter().enumerate() {
            path.push('/');
            path.push_str(name);
            let position = self
                .positions
                .get(depth)
                .and_then(|counts| counts.get(name))
                .copied()
                .unwrap_or(1);
            if position > 1 {
                path.push('[');
                path.push_str(&position.to_string());
                path.push(']');
            }
        }
        path
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.positions.clear();
    }
}
