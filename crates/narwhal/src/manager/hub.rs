//! Hub-and-spoke placement.
//!
//! Every hub is the root of a tree. The children of a node at depth `layer` are spread evenly on
//! a circle of radius `radius / 2^layer` around it, rotated by a quarter of pi on even layers so
//! consecutive rings do not line up.

use std::f64::consts::{FRAC_PI_4, PI};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::engine::{CommandQueue, Engine};
use crate::error::{Error, Result, ensure_positive};
use crate::geom::{Vec2, vec2};
use crate::graph::{NodeId, NodeOptions};

use super::Manager;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct HubManager {
    radius: f64,
    hubs: FxIndexMap<NodeId, Vec2>,
    children: FxIndexMap<NodeId, Vec<NodeId>>,
    parents: FxIndexMap<NodeId, NodeId>,
    // Points not created in the engine yet.
    unplaced: IndexSet<NodeId, FxBuildHasher>,
    removed: Vec<NodeId>,
    dirty: bool,
}

impl HubManager {
    /// `radius` is the ring radius around hubs; deeper rings halve it per layer.
    pub fn new(radius: f64) -> Result<Self> {
        Ok(Self {
            radius: ensure_positive("radius", radius)?,
            hubs: FxIndexMap::default(),
            children: FxIndexMap::default(),
            parents: FxIndexMap::default(),
            unplaced: IndexSet::default(),
            removed: Vec::new(),
            dirty: false,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn hubs(&self) -> impl Iterator<Item = (&NodeId, Vec2)> {
        self.hubs.iter().map(|(id, pos)| (id, *pos))
    }

    pub fn children_of(&self, name: &str) -> &[NodeId] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds a standalone hub. Without a position, hubs are stacked in two columns.
    pub fn add_hub(&mut self, name: impl Into<NodeId>, position: Option<Vec2>) -> Result<()> {
        let name = name.into();
        self.ensure_new(&name)?;
        let count = self.hubs.len();
        let position =
            position.unwrap_or_else(|| vec2((count % 2) as f64, (count * 2) as f64));
        debug!(hub = %name, x = position.x, y = position.y, "add hub");
        self.hubs.insert(name.clone(), position);
        self.children.insert(name.clone(), Vec::new());
        self.unplaced.insert(name);
        self.dirty = true;
        Ok(())
    }

    /// Adds a point under an existing hub or point.
    pub fn add_point(&mut self, name: impl Into<NodeId>, under: &str) -> Result<()> {
        let name = name.into();
        self.ensure_new(&name)?;
        let Some((_, parent, siblings)) = self.children.get_full_mut(under) else {
            return Err(Error::UnknownNode { id: under.into() });
        };
        siblings.push(name.clone());
        self.parents.insert(name.clone(), parent.clone());
        self.children.insert(name.clone(), Vec::new());
        self.unplaced.insert(name);
        self.dirty = true;
        Ok(())
    }

    /// Removes a point (or hub) and everything below it.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if !self.children.contains_key(name) {
            return Err(Error::UnknownNode { id: name.into() });
        }
        if let Some(parent) = self.parents.shift_remove(name) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|s| s.as_str() != name);
            }
        }
        self.hubs.shift_remove(name);

        let mut stack = vec![NodeId::from(name)];
        while let Some(id) = stack.pop() {
            if let Some(below) = self.children.shift_remove(&id) {
                stack.extend(below);
            }
            self.parents.shift_remove(&id);
            // Never created: nothing to remove from the engine.
            if !self.unplaced.shift_remove(&id) {
                self.removed.push(id);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn ensure_new(&self, name: &NodeId) -> Result<()> {
        if self.children.contains_key(name) {
            return Err(Error::DuplicateNode { id: name.clone() });
        }
        Ok(())
    }

    fn ring(&self, layer: u32) -> (f64, f64) {
        let radius = self.radius / 2f64.powi(layer as i32);
        let phase = if layer % 2 == 0 { FRAC_PI_4 } else { 0.0 };
        (radius, phase)
    }

    fn place<L: Default>(
        &mut self,
        queue: &mut CommandQueue<L>,
        current: &NodeId,
        center: Vec2,
        layer: u32,
    ) {
        let subs = self.children_of(current.as_str()).to_vec();
        if subs.is_empty() {
            return;
        }
        let (radius, phase) = self.ring(layer);
        for (name, offset) in subs.iter().zip(circle_locations(radius, subs.len(), phase)) {
            let position = center + offset;
            if self.unplaced.shift_remove(name) {
                queue.add_node(name, position, NodeOptions::default());
                queue.add_link(current, name, L::default());
            } else {
                queue.set_destination(name, position);
            }
            self.place(queue, name, position, layer + 1);
        }
    }
}

impl<L: Default> Manager<L> for HubManager {
    fn on_frame(&mut self, _engine: &Engine<L>) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn update(&mut self, queue: &mut CommandQueue<L>) {
        for id in self.removed.drain(..) {
            queue.remove_node(id);
        }
        let hubs: Vec<(NodeId, Vec2)> = self.hubs.iter().map(|(id, p)| (id.clone(), *p)).collect();
        for (hub, position) in &hubs {
            if self.unplaced.shift_remove(hub) {
                queue.add_node(hub, *position, NodeOptions::default());
            }
            self.place(queue, hub, *position, 0);
        }
        self.dirty = false;
        debug!(queued = queue.len(), "hub layout refreshed");
    }
}

/// `n` points evenly spaced on a circle of radius `r`, starting at angle `phase`.
pub fn circle_locations(r: f64, n: usize, phase: f64) -> Vec<Vec2> {
    if n == 0 {
        return Vec::new();
    }
    let step = 2.0 * PI / n as f64;
    (0..n)
        .map(|i| {
            let angle = phase + step * i as f64;
            vec2(r * angle.cos(), r * angle.sin())
        })
        .collect()
}
