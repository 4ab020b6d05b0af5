use crate::force::Body;
use crate::geom::Vec2;
use crate::movement::Movement;

use super::NodeId;

/// Per-node creation options.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeOptions {
    pub is_static: bool,
    /// `None` uses the engine's default mass.
    pub mass: Option<f64>,
}

impl NodeOptions {
    pub fn fixed() -> Self {
        Self {
            is_static: true,
            mass: None,
        }
    }

    pub fn with_mass(mass: f64) -> Self {
        Self {
            is_static: false,
            mass: Some(mass),
        }
    }
}

/// Where a node stands in the per-tick state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Never moves.
    Static,
    /// No pending movement and no velocity.
    Settled,
    /// Following a movement or drifting under forces.
    Moving,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) mass: f64,
    pub(crate) is_static: bool,
    pub(crate) movement: Option<Movement>,
}

impl Node {
    pub(crate) fn new(position: Vec2, mass: f64, is_static: bool) -> Self {
        Self {
            position,
            velocity: Vec2::zeros(),
            mass,
            is_static,
            movement: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn movement(&self) -> Option<&Movement> {
        self.movement.as_ref()
    }

    pub fn motion(&self) -> Motion {
        if self.is_static {
            Motion::Static
        } else if self.movement.as_ref().is_some_and(|m| !m.is_finished())
            || self.velocity != Vec2::zeros()
        {
            Motion::Moving
        } else {
            Motion::Settled
        }
    }

    pub(crate) fn body(&self) -> Body {
        Body {
            position: self.position,
            velocity: self.velocity,
            mass: self.mass,
        }
    }
}

/// Borrowed view of a node together with its identity and current dense index.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) id: &'a NodeId,
    pub(crate) index: usize,
    pub(crate) node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a NodeId {
        self.id
    }

    /// Position in the dense array; changes when an earlier node is removed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn position(&self) -> Vec2 {
        self.node.position
    }

    pub fn is_static(&self) -> bool {
        self.node.is_static
    }

    pub fn motion(&self) -> Motion {
        self.node.motion()
    }
}
