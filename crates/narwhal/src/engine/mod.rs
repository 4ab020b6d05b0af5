//! Frame-driven layout engine.
//!
//! [`Engine::tick`] advances every node by one fixed logical step:
//!
//! 1. pending commands from the [`CommandQueue`] are applied in order;
//! 2. every force pair is evaluated against a snapshot of the bodies taken before any node moves,
//!    once per endpoint;
//! 3. nodes with an active movement take its next point, other non-static nodes integrate their
//!    net force (semi-implicit Euler, with friction proportional to velocity);
//! 4. the dense position array and link endpoints are refreshed.
//!
//! Nothing is read back from a node moved earlier in the same tick, so the result does not
//! depend on iteration order.

mod command;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{Error, Result, ensure_positive};
use crate::force::{Body, Force};
use crate::geom::Vec2;
use crate::graph::{DEFAULT_MASS, Graph, Link, Motion, Node, NodeId, NodeOptions, NodeRef, PairKey};
use crate::movement::MovementOptions;

pub use command::{Command, CommandQueue};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Logical time advanced per tick.
    pub dt: f64,
    /// Velocity damping coefficient; the damping force is `-velocity * friction`.
    pub friction: f64,
    /// Mass of nodes created without an explicit one.
    pub default_mass: f64,
    pub movement: MovementOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            dt: 0.2,
            friction: 50.0,
            default_mass: DEFAULT_MASS,
            movement: MovementOptions::default(),
        }
    }
}

impl EngineOptions {
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_default_mass(mut self, mass: f64) -> Self {
        self.default_mass = mass;
        self
    }

    pub fn with_movement(mut self, movement: MovementOptions) -> Self {
        self.movement = movement;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("dt", self.dt)?;
        ensure_positive("mass", self.default_mass)?;
        // Zero friction is allowed (undamped).
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(Error::InvalidForceConfiguration {
                parameter: "friction",
                value: self.friction,
            });
        }
        Ok(())
    }
}

/// Outcome of one [`Engine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Frame number reached by this tick (the first tick reports `1`).
    pub frame: u64,
    /// Commands applied from the queue before integrating.
    pub commands: usize,
    pub moving: usize,
    pub settled: usize,
    pub fixed: usize,
}

#[derive(Debug)]
pub struct Engine<L = ()> {
    opts: EngineOptions,
    graph: Graph<L>,
    queue: CommandQueue<L>,
    frame: u64,
    net: Vec<Vec2>,
}

impl<L> Engine<L> {
    pub fn new(opts: EngineOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            graph: Graph::with_default_mass(opts.default_mass)?,
            opts,
            queue: CommandQueue::new(),
            frame: 0,
            net: Vec::new(),
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.opts
    }

    pub fn graph(&self) -> &Graph<L> {
        &self.graph
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Logical time: `frame * dt`.
    pub fn time(&self) -> f64 {
        self.frame as f64 * self.opts.dt
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        position: Vec2,
        options: NodeOptions,
    ) -> Result<NodeRef<'_>> {
        self.graph.add_node(id, position, options)
    }

    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        self.graph.remove_node(id)
    }

    pub fn get_node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.graph.get_node(id)
    }

    pub fn motion(&self, id: &str) -> Option<Motion> {
        self.graph.get_node(id).map(|n| n.motion())
    }

    pub fn add_link(&mut self, a: &str, b: &str, meta: L) -> Result<()> {
        self.graph.add_link(a, b, meta)
    }

    pub fn remove_link(&mut self, a: &str, b: &str) -> Result<Link<L>> {
        self.graph.remove_link(a, b)
    }

    pub fn add_force(&mut self, a: &str, b: &str, force: impl Force + 'static) -> Result<()> {
        self.graph.add_force(a, b, force)
    }

    /// Moves `id` toward `destination` using the engine's movement options.
    pub fn set_destination(&mut self, id: &str, destination: Vec2) -> Result<()> {
        self.graph
            .set_destination(id, destination, &self.opts.movement)
    }

    pub fn clear_destination(&mut self, id: &str) -> Result<()> {
        self.graph.clear_destination(id)
    }

    /// Positions ordered by dense node index, as of the last tick or structural change.
    pub fn positions(&self) -> &[Vec2] {
        self.graph.positions()
    }

    pub fn links(&self) -> impl Iterator<Item = (&PairKey, &Link<L>)> {
        self.graph.links()
    }

    /// Queues a command for the next tick.
    pub fn submit(&mut self, command: Command<L>) {
        self.queue.push(command);
    }

    pub fn queue(&self) -> &CommandQueue<L> {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut CommandQueue<L> {
        &mut self.queue
    }

    /// Applies a command immediately.
    pub fn apply(&mut self, command: Command<L>) -> Result<()> {
        match command {
            Command::AddNode {
                id,
                position,
                options,
            } => self.graph.add_node(id, position, options).map(|_| ()),
            Command::RemoveNode { id } => self.graph.remove_node(id.as_str()).map(|_| ()),
            Command::AddLink { a, b, meta } => self.graph.add_link(a.as_str(), b.as_str(), meta),
            Command::RemoveLink { a, b } => {
                self.graph.remove_link(a.as_str(), b.as_str()).map(|_| ())
            }
            Command::AddForce { a, b, force } => {
                self.graph
                    .add_boxed_force(a.as_str(), b.as_str(), Box::new(force))
            }
            Command::SetDestination { id, destination } => {
                self.set_destination(id.as_str(), destination)
            }
            Command::ClearDestination { id } => self.graph.clear_destination(id.as_str()),
        }
    }

    /// Advances the simulation by one frame.
    ///
    /// Queued commands are applied first. If one fails, the tick stops there: the error is
    /// returned, later commands stay queued and no node moves.
    pub fn tick(&mut self) -> Result<TickReport> {
        let commands = self.drain_queue()?;

        let Self {
            opts, graph, net, ..
        } = self;
        let (dt, friction) = (opts.dt, opts.friction);

        let bodies: Vec<Body> = graph.nodes().map(|n| n.node().body()).collect();
        net.clear();
        net.resize(bodies.len(), Vec2::zeros());
        for (ia, ib, forces) in graph.indexed_forces() {
            let (a, b) = (&bodies[ia], &bodies[ib]);
            for force in forces {
                net[ia] += force.force(b, a, b.position - a.position);
                net[ib] += force.force(a, b, a.position - b.position);
            }
        }

        let mut report = TickReport {
            frame: self.frame + 1,
            commands,
            ..Default::default()
        };
        for (node, net) in graph.nodes_mut().zip(net.iter()) {
            if !node.is_static {
                advance(node, *net, dt, friction);
            }
            match node.motion() {
                Motion::Static => report.fixed += 1,
                Motion::Settled => report.settled += 1,
                Motion::Moving => report.moving += 1,
            }
        }
        graph.sync_positions();
        graph.refresh_links();

        self.frame = report.frame;
        trace!(
            frame = report.frame,
            moving = report.moving,
            settled = report.settled,
            "tick"
        );
        Ok(report)
    }

    fn drain_queue(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Some(command) = self.queue.pop_front() {
            let kind = command.kind();
            if let Err(err) = self.apply(command) {
                warn!(
                    command = kind,
                    %err,
                    remaining = self.queue.len(),
                    "queued command failed"
                );
                return Err(err);
            }
            applied += 1;
        }
        Ok(applied)
    }
}

/// One step for a non-static node: follow the active movement if any, integrate otherwise.
fn advance(node: &mut Node, net: Vec2, dt: f64, friction: f64) {
    if let Some(movement) = node.movement.as_mut() {
        node.position = movement.next();
        node.velocity = Vec2::zeros();
        if movement.is_finished() {
            node.movement = None;
        }
        return;
    }
    let accel = (net - node.velocity * friction) / node.mass;
    node.velocity += accel * dt;
    node.position += node.velocity * dt;
}
