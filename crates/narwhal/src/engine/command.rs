//! Deferred structural commands.
//!
//! Commands pushed onto a [`CommandQueue`] between frames are applied, in order, at the start of
//! the next [`Engine::tick`](super::Engine::tick).

use std::collections::VecDeque;
use std::sync::Arc;

use crate::force::Force;
use crate::geom::Vec2;
use crate::graph::{NodeId, NodeOptions};

#[derive(Debug, Clone)]
pub enum Command<L> {
    AddNode {
        id: NodeId,
        position: Vec2,
        options: NodeOptions,
    },
    RemoveNode {
        id: NodeId,
    },
    AddLink {
        a: NodeId,
        b: NodeId,
        meta: L,
    },
    RemoveLink {
        a: NodeId,
        b: NodeId,
    },
    AddForce {
        a: NodeId,
        b: NodeId,
        force: Arc<dyn Force>,
    },
    SetDestination {
        id: NodeId,
        destination: Vec2,
    },
    ClearDestination {
        id: NodeId,
    },
}

impl<L> Command<L> {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::AddNode { .. } => "add_node",
            Command::RemoveNode { .. } => "remove_node",
            Command::AddLink { .. } => "add_link",
            Command::RemoveLink { .. } => "remove_link",
            Command::AddForce { .. } => "add_force",
            Command::SetDestination { .. } => "set_destination",
            Command::ClearDestination { .. } => "clear_destination",
        }
    }
}

/// FIFO of pending commands.
#[derive(Debug, Clone)]
pub struct CommandQueue<L> {
    pending: VecDeque<Command<L>>,
}

impl<L> Default for CommandQueue<L> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<L> CommandQueue<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command<L>) -> &mut Self {
        self.pending.push_back(command);
        self
    }

    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        position: Vec2,
        options: NodeOptions,
    ) -> &mut Self {
        self.push(Command::AddNode {
            id: id.into(),
            position,
            options,
        })
    }

    pub fn remove_node(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.push(Command::RemoveNode { id: id.into() })
    }

    pub fn add_link(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>, meta: L) -> &mut Self {
        self.push(Command::AddLink {
            a: a.into(),
            b: b.into(),
            meta,
        })
    }

    pub fn remove_link(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> &mut Self {
        self.push(Command::RemoveLink {
            a: a.into(),
            b: b.into(),
        })
    }

    pub fn add_force(
        &mut self,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
        force: impl Force + 'static,
    ) -> &mut Self {
        self.push(Command::AddForce {
            a: a.into(),
            b: b.into(),
            force: Arc::new(force),
        })
    }

    pub fn set_destination(&mut self, id: impl Into<NodeId>, destination: Vec2) -> &mut Self {
        self.push(Command::SetDestination {
            id: id.into(),
            destination,
        })
    }

    pub fn clear_destination(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.push(Command::ClearDestination { id: id.into() })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command<L>> {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn pop_front(&mut self) -> Option<Command<L>> {
        self.pending.pop_front()
    }
}
