//! Node, link and force storage.
//!
//! Nodes live in one insertion-ordered map keyed by [`NodeId`]; a node's position in that map is
//! its dense index. Removing a node shifts every later node down by one, and the parallel
//! position array is edited in the same call so the two can never drift apart.
//!
//! Links and force assignments are keyed by [`PairKey`], so argument order never matters.

mod key;
mod node;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::error::{Error, Result, ensure_positive};
use crate::force::Force;
use crate::geom::Vec2;
use crate::movement::{Movement, MovementOptions};

pub use key::{NodeId, PairKey};
pub(crate) use key::PairKeyView;
pub use node::{Motion, Node, NodeOptions, NodeRef};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Mass given to nodes created without an explicit one.
pub const DEFAULT_MASS: f64 = 100.0;

/// A link and the endpoint coordinates computed at the last refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<L> {
    a: Vec2,
    b: Vec2,
    meta: L,
}

impl<L> Link<L> {
    /// Position of the smaller endpoint of the key.
    pub fn a(&self) -> Vec2 {
        self.a
    }

    /// Position of the larger endpoint of the key.
    pub fn b(&self) -> Vec2 {
        self.b
    }

    pub fn meta(&self) -> &L {
        &self.meta
    }

    pub fn into_meta(self) -> L {
        self.meta
    }
}

#[derive(Debug)]
pub struct Graph<L = ()> {
    default_mass: f64,
    nodes: FxIndexMap<NodeId, Node>,
    positions: Vec<Vec2>,
    links: FxIndexMap<PairKey, Link<L>>,
    forces: FxIndexMap<PairKey, Vec<Box<dyn Force>>>,
}

impl<L> Default for Graph<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Graph<L> {
    pub fn new() -> Self {
        Self {
            default_mass: DEFAULT_MASS,
            nodes: FxIndexMap::default(),
            positions: Vec::new(),
            links: FxIndexMap::default(),
            forces: FxIndexMap::default(),
        }
    }

    /// Uses `mass` for nodes added without an explicit one.
    pub fn with_default_mass(mass: f64) -> Result<Self> {
        let mut g = Self::new();
        g.default_mass = ensure_positive("mass", mass)?;
        Ok(g)
    }

    pub fn default_mass(&self) -> f64 {
        self.default_mass
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of individual force contributions across all pairs.
    pub fn force_count(&self) -> usize {
        self.forces.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        position: Vec2,
        opts: NodeOptions,
    ) -> Result<NodeRef<'_>> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(Error::DuplicateNode { id });
        }
        let mass = ensure_positive("mass", opts.mass.unwrap_or(self.default_mass))?;

        debug!(%id, x = position.x, y = position.y, mass, is_static = opts.is_static, "add node");
        let (index, _) = self
            .nodes
            .insert_full(id, Node::new(position, mass, opts.is_static));
        self.positions.push(position);
        Ok(self.node_ref(index))
    }

    /// Removes a node together with every link and force entry touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let Some((index, id, node)) = self.nodes.shift_remove_full(id) else {
            return Err(Error::UnknownNode { id: id.into() });
        };
        self.positions.remove(index);

        let (links_before, forces_before) = (self.links.len(), self.forces.len());
        self.links.retain(|key, _| !key.contains(id.as_str()));
        self.forces.retain(|key, _| !key.contains(id.as_str()));
        debug!(
            %id,
            index,
            links = links_before - self.links.len(),
            force_pairs = forces_before - self.forces.len(),
            "remove node"
        );
        Ok(node)
    }

    pub fn get_node(&self, id: &str) -> Option<NodeRef<'_>> {
        let index = self.nodes.get_index_of(id)?;
        Some(self.node_ref(index))
    }

    /// Node currently stored at dense index `index`.
    pub fn node_at(&self, index: usize) -> Option<NodeRef<'_>> {
        (index < self.nodes.len()).then(|| self.node_ref(index))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Nodes in dense index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, (id, node))| NodeRef { id, index, node })
    }

    /// Current positions, ordered by dense index.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Adds or replaces the link between `a` and `b`.
    pub fn add_link(&mut self, a: &str, b: &str, meta: L) -> Result<()> {
        let (ia, ib) = self.endpoint_indices(a, b)?;
        let key = PairKey::new(a, b);
        let (pa, pb) = if key.a().as_str() == a {
            (self.positions[ia], self.positions[ib])
        } else {
            (self.positions[ib], self.positions[ia])
        };
        debug!(link = %key, "add link");
        self.links.insert(key, Link { a: pa, b: pb, meta });
        Ok(())
    }

    pub fn remove_link(&mut self, a: &str, b: &str) -> Result<Link<L>> {
        match self.links.shift_remove(&PairKeyView::new(a, b)) {
            Some(link) => {
                debug!(a, b, "remove link");
                Ok(link)
            }
            None => Err(Error::UnknownLink {
                a: a.into(),
                b: b.into(),
            }),
        }
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&Link<L>> {
        self.links.get(&PairKeyView::new(a, b))
    }

    pub fn links(&self) -> impl Iterator<Item = (&PairKey, &Link<L>)> {
        self.links.iter()
    }

    /// Appends a force contribution to the pair; earlier contributions are kept.
    pub fn add_force(&mut self, a: &str, b: &str, force: impl Force + 'static) -> Result<()> {
        self.add_boxed_force(a, b, Box::new(force))
    }

    /// A self pair (`a == b`) is stored like any other but contributes no force.
    pub fn add_boxed_force(&mut self, a: &str, b: &str, force: Box<dyn Force>) -> Result<()> {
        self.index_of_known(a)?;
        self.index_of_known(b)?;
        let key = PairKey::new(a, b);
        debug!(pair = %key, ?force, "add force");
        self.forces.entry(key).or_default().push(force);
        Ok(())
    }

    pub fn forces_between(&self, a: &str, b: &str) -> &[Box<dyn Force>] {
        self.forces
            .get(&PairKeyView::new(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pairs that carry at least one force.
    pub fn force_pairs(&self) -> impl Iterator<Item = &PairKey> {
        self.forces.keys()
    }

    /// Starts a new movement from the node's current position, discarding any previous one.
    pub fn set_destination(
        &mut self,
        id: &str,
        destination: Vec2,
        opts: &MovementOptions,
    ) -> Result<()> {
        let Some((_, id, node)) = self.nodes.get_full_mut(id) else {
            return Err(Error::UnknownNode { id: id.into() });
        };
        if node.is_static {
            return Err(Error::StaticNode { id: id.clone() });
        }
        debug!(
            %id,
            x = destination.x,
            y = destination.y,
            replaced = node.movement.is_some(),
            "set destination"
        );
        node.movement = Some(Movement::new(node.position, destination, opts));
        node.velocity = Vec2::zeros();
        Ok(())
    }

    /// Drops the node's active movement, leaving it where it is.
    pub fn clear_destination(&mut self, id: &str) -> Result<()> {
        let Some(node) = self.nodes.get_mut(id) else {
            return Err(Error::UnknownNode { id: id.into() });
        };
        node.movement = None;
        Ok(())
    }

    /// Recomputes every link's endpoint coordinates from the current positions.
    pub fn refresh_links(&mut self) {
        let Self {
            nodes,
            positions,
            links,
            ..
        } = self;
        for (key, link) in links.iter_mut() {
            if let (Some(ia), Some(ib)) = (
                nodes.get_index_of(key.a().as_str()),
                nodes.get_index_of(key.b().as_str()),
            ) {
                link.a = positions[ia];
                link.b = positions[ib];
            }
        }
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Force entries resolved to dense indices `(ia, ib)` with `ia` belonging to `key.a()`.
    /// Self pairs are left out.
    pub(crate) fn indexed_forces(&self) -> impl Iterator<Item = (usize, usize, &[Box<dyn Force>])> {
        self.forces.iter().filter_map(|(key, forces)| {
            let ia = self.nodes.get_index_of(key.a().as_str())?;
            let ib = self.nodes.get_index_of(key.b().as_str())?;
            (ia != ib).then_some((ia, ib, forces.as_slice()))
        })
    }

    /// Copies node positions into the dense array.
    pub(crate) fn sync_positions(&mut self) {
        for (slot, node) in self.positions.iter_mut().zip(self.nodes.values()) {
            *slot = node.position;
        }
    }

    fn node_ref(&self, index: usize) -> NodeRef<'_> {
        let (id, node) = self
            .nodes
            .get_index(index)
            .expect("node index should be in range");
        NodeRef { id, index, node }
    }

    fn index_of_known(&self, id: &str) -> Result<usize> {
        self.nodes
            .get_index_of(id)
            .ok_or_else(|| Error::UnknownNode { id: id.into() })
    }

    fn endpoint_indices(&self, a: &str, b: &str) -> Result<(usize, usize)> {
        if a == b {
            return Err(Error::InvalidLink { id: a.into() });
        }
        Ok((self.index_of_known(a)?, self.index_of_known(b)?))
    }
}
