//! Node identifiers and normalized pair keys.
//!
//! Links and force assignments are undirected: `(a, b)` and `(b, a)` address the same entry.
//! [`PairKey`] stores the pair sorted so the map key is canonical, and [`PairKeyView`] lets
//! lookups normalize borrowed ids without allocating.

use std::borrow::Borrow;
use std::fmt;

/// Stable, caller-supplied node name.
///
/// Integers are accepted for convenience and stored in their decimal form, so `NodeId::from(3)`
/// and `NodeId::from("3")` are the same node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for NodeId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

macro_rules! node_id_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for NodeId {
                fn from(value: $t) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

node_id_from_int!(i32, i64, u32, u64, usize);

/// Unordered pair of node ids, stored smallest first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    a: NodeId,
    b: NodeId,
}

impl PairKey {
    pub fn new(a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }

    /// The smaller id.
    pub fn a(&self) -> &NodeId {
        &self.a
    }

    /// The larger id.
    pub fn b(&self) -> &NodeId {
        &self.b
    }

    pub fn contains(&self, id: &str) -> bool {
        self.a.as_str() == id || self.b.as_str() == id
    }

    /// The endpoint that is not `id`, if `id` is one of them.
    pub fn other(&self, id: &str) -> Option<&NodeId> {
        if self.a.as_str() == id {
            Some(&self.b)
        } else if self.b.as_str() == id {
            Some(&self.a)
        } else {
            None
        }
    }

    pub(crate) fn view(&self) -> PairKeyView<'_> {
        PairKeyView {
            a: self.a.as_str(),
            b: self.b.as_str(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.a, self.b)
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B)> for PairKey {
    fn from((a, b): (A, B)) -> Self {
        Self::new(a, b)
    }
}

/// Borrowed, already normalized form of a [`PairKey`].
#[derive(Clone, Copy, Hash)]
pub(crate) struct PairKeyView<'a> {
    a: &'a str,
    b: &'a str,
}

impl<'a> PairKeyView<'a> {
    pub(crate) fn new(a: &'a str, b: &'a str) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

impl indexmap::Equivalent<PairKey> for PairKeyView<'_> {
    fn equivalent(&self, key: &PairKey) -> bool {
        key.a.as_str() == self.a && key.b.as_str() == self.b
    }
}
