//! Frame loop glue between the engine and whatever decides where nodes should go.
//!
//! A [`Manager`] never touches the engine directly. After every tick it is shown the engine
//! read-only and may ask for a refresh; on a refresh it writes commands into the engine's queue,
//! which the next tick drains before integrating.

mod hub;

use crate::engine::{CommandQueue, Engine, TickReport};
use crate::error::Result;

pub use hub::{HubManager, circle_locations};

pub trait Manager<L> {
    /// Called after every tick. Returning `true` schedules [`Manager::update`].
    fn on_frame(&mut self, _engine: &Engine<L>) -> bool {
        false
    }

    /// Emits the commands that bring the graph to its desired shape.
    fn update(&mut self, queue: &mut CommandQueue<L>);
}

/// Owns an engine and a manager and drives them one frame at a time.
#[derive(Debug)]
pub struct Animator<L, M> {
    engine: Engine<L>,
    manager: M,
    needs_refresh: bool,
}

impl<L, M: Manager<L>> Animator<L, M> {
    pub fn new(engine: Engine<L>, manager: M) -> Self {
        Self {
            engine,
            manager,
            needs_refresh: false,
        }
    }

    pub fn engine(&self) -> &Engine<L> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<L> {
        &mut self.engine
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut M {
        &mut self.manager
    }

    pub fn into_parts(self) -> (Engine<L>, M) {
        (self.engine, self.manager)
    }

    /// Makes the manager recompute destinations after the next tick.
    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Ticks once, then lets the manager react.
    pub fn step(&mut self) -> Result<TickReport> {
        let report = self.engine.tick()?;
        if self.manager.on_frame(&self.engine) {
            self.needs_refresh = true;
        }
        if self.needs_refresh {
            self.manager.update(self.engine.queue_mut());
            self.needs_refresh = false;
        }
        Ok(report)
    }

    /// Steps `frames` times, handing the engine to `observer` after each frame.
    pub fn run<F>(&mut self, frames: u64, mut observer: F) -> Result<()>
    where
        F: FnMut(&Engine<L>, &TickReport),
    {
        for _ in 0..frames {
            let report = self.step()?;
            observer(&self.engine, &report);
        }
        Ok(())
    }
}
