#![forbid(unsafe_code)]

//! Frame-driven 2D graph animation.
//!
//! `narwhal` keeps a graph of named nodes, undirected links and pairwise forces, and moves the
//! nodes one fixed logical step per [`Engine::tick`]. Two kinds of motion share the same tick:
//!
//! - force-driven nodes integrate the sum of their pairwise forces ([`Spring`], [`Repulsion`] or
//!   any [`Force`] implementation) with friction, using semi-implicit Euler;
//! - a node given a destination follows an eased [`Movement`] there, ignoring forces until it
//!   arrives.
//!
//! The engine never draws anything and never looks at a clock. A driver calls `tick()` once per
//! frame and reads [`Engine::positions`] / [`Engine::links`]; a [`Manager`] run by an
//! [`Animator`] can reshape the graph between frames through a [`CommandQueue`].

pub mod engine;
pub mod error;
pub mod force;
pub mod geom;
pub mod graph;
pub mod manager;
pub mod movement;

pub use engine::{Command, CommandQueue, Engine, EngineOptions, TickReport};
pub use error::{Error, Result};
pub use force::{Body, Force, MIN_DISTANCE, Repulsion, Spring};
pub use geom::{Vec2, vec2};
pub use graph::{Graph, Link, Motion, Node, NodeId, NodeOptions, NodeRef, PairKey};
pub use manager::{Animator, HubManager, Manager};
pub use movement::{Easing, Movement, MovementOptions};
