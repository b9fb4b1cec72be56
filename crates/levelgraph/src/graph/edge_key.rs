//! Edge lookup keys.
//!
//! An edge is identified by its endpoint names plus its kind, so `A--B`, `A->B` and `B--A` are
//! three distinct edges.

use super::EdgeKind;
use std::fmt;

#[derive(Clone, Copy, Hash)]
pub(in crate::graph) struct EdgeKeyView<'a> {
    pub(in crate::graph) from: &'a str,
    pub(in crate::graph) to: &'a str,
    pub(in crate::graph) kind: EdgeKind,
}

impl<'a> hashbrown::Equivalent<EdgeKey> for EdgeKeyView<'a> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.from == self.from && key.to == self.to && key.kind == self.kind
    }
}

impl<'a> EdgeKeyView<'a> {
    pub(in crate::graph) fn new(from: &'a str, to: &'a str, kind: EdgeKind) -> Self {
        Self { from, to, kind }
    }

    pub(in crate::graph) fn to_owned_key(self) -> EdgeKey {
        EdgeKey {
            from: self.from.to_string(),
            to: self.to.to_string(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(in crate::graph) struct EdgeKey {
    pub(in crate::graph) from: String,
    pub(in crate::graph) to: String,
    pub(in crate::graph) kind: EdgeKind,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.kind.connector(), self.to)
    }
}
