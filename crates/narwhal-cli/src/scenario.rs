//! Headless versions of the demo animations.

use std::str::FromStr;

use narwhal::{
    CommandQueue, Engine, EngineOptions, HubManager, Manager, NodeId, NodeOptions, Spring, Vec2,
    vec2,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Four nodes pulled into an evenly spaced chain by stiff springs.
    #[default]
    Chain,
    /// Points hung off two hubs, growing and shrinking over time.
    Hub,
    /// Nodes and links created, moved and deleted on a fixed cycle.
    Churn,
}

impl FromStr for ScenarioKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chain" => Ok(Self::Chain),
            "hub" | "hubs" => Ok(Self::Hub),
            "churn" => Ok(Self::Churn),
            _ => Err(()),
        }
    }
}

impl ScenarioKind {
    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Chain => "chain",
            ScenarioKind::Hub => "hub",
            ScenarioKind::Churn => "churn",
        }
    }
}

pub const CHAIN_STIFFNESS: f64 = 2000.0;

/// Chord length between neighbours when `n` points sit evenly on a circle of radius `r`.
pub fn chord_length(r: f64, n: usize) -> f64 {
    let theta = 2.0 * std::f64::consts::PI / n as f64;
    (2.0 * r * r - 2.0 * r * r * theta.cos()).sqrt()
}

/// Builds the engine and manager for `kind`.
pub fn build(
    kind: ScenarioKind,
    opts: EngineOptions,
    seed: u64,
) -> narwhal::Result<(Engine<()>, Scenario)> {
    let mut engine = Engine::new(opts)?;
    let scenario = match kind {
        ScenarioKind::Chain => {
            let rest = chord_length(1.0, 3);
            for i in 0..4usize {
                let y = if i % 2 == 0 { 0.0 } else { 0.25 };
                engine.add_node(i + 1, vec2(i as f64, y), NodeOptions::default())?;
            }
            for i in 1..4usize {
                let (a, b) = (i.to_string(), (i + 1).to_string());
                engine.add_force(&a, &b, Spring::new(CHAIN_STIFFNESS, rest)?)?;
                engine.add_link(&a, &b, ())?;
            }
            Scenario::Chain
        }
        ScenarioKind::Hub => Scenario::Hub(GrowingHubs::new(seed)?),
        ScenarioKind::Churn => Scenario::Churn(Churn::new(20, seed)),
    };
    Ok((engine, scenario))
}

#[derive(Debug)]
pub enum Scenario {
    /// Physics only; nothing is ever queued.
    Chain,
    Hub(GrowingHubs),
    Churn(Churn),
}

impl Manager<()> for Scenario {
    fn on_frame(&mut self, engine: &Engine<()>) -> bool {
        match self {
            Scenario::Chain => false,
            Scenario::Hub(hubs) => hubs.on_frame(engine),
            Scenario::Churn(churn) => churn.on_frame(engine),
        }
    }

    fn update(&mut self, queue: &mut CommandQueue<()>) {
        match self {
            Scenario::Chain => {}
            Scenario::Hub(hubs) => hubs.update(queue),
            Scenario::Churn(churn) => churn.update(queue),
        }
    }
}

/// Grows a [`HubManager`] tree by one point every few frames and prunes a subtree now and then.
#[derive(Debug)]
pub struct GrowingHubs {
    layout: HubManager,
    rng: XorShift64Star,
    names: Vec<NodeId>,
    added: usize,
    every: u64,
}

impl GrowingHubs {
    const HUBS: [&'static str; 2] = ["west", "east"];

    pub fn new(seed: u64) -> narwhal::Result<Self> {
        let mut layout = HubManager::new(2.0)?;
        let mut names = Vec::new();
        for hub in Self::HUBS {
            layout.add_hub(hub, None)?;
            names.push(NodeId::from(hub));
        }
        let mut this = Self {
            layout,
            rng: XorShift64Star::new(seed),
            names,
            added: 0,
            every: 10,
        };
        for _ in 0..4 {
            this.grow()?;
        }
        Ok(this)
    }

    fn grow(&mut self) -> narwhal::Result<()> {
        let parent = self.names[self.rng.next_usize(self.names.len())].clone();
        let name = NodeId::from(format!("p{}", self.added));
        self.layout.add_point(&name, parent.as_str())?;
        self.names.push(name);
        self.added += 1;
        Ok(())
    }

    fn prune(&mut self) -> narwhal::Result<()> {
        let points = self.names.len() - Self::HUBS.len();
        if points == 0 {
            return Ok(());
        }
        let victim = self.names[Self::HUBS.len() + self.rng.next_usize(points)].clone();
        self.layout.remove(victim.as_str())?;
        let layout = &self.layout;
        self.names.retain(|n| layout.contains(n.as_str()));
        Ok(())
    }
}

impl Manager<()> for GrowingHubs {
    fn on_frame(&mut self, engine: &Engine<()>) -> bool {
        let frame = engine.frame();
        if frame % self.every == 0 {
            let changed = if frame % (self.every * 7) == 0 {
                self.prune()
            } else {
                self.grow()
            };
            if let Err(err) = changed {
                tracing::warn!(%err, frame, "hub scenario change rejected");
            }
        }
        Manager::<()>::on_frame(&mut self.layout, engine)
    }

    fn update(&mut self, queue: &mut CommandQueue<()>) {
        self.layout.update(queue);
    }
}

/// Every frame takes one action of a `period`-frame cycle: cycle `c` creates `node{c}`, links it
/// to the previous node, sends it somewhere random, and from cycle 6 on deletes the oldest node.
#[derive(Debug)]
pub struct Churn {
    period: usize,
    tick: usize,
    rng: XorShift64Star,
    alive: Vec<NodeId>,
}

impl Churn {
    pub fn new(period: usize, seed: u64) -> Self {
        Self {
            period: period.max(4),
            tick: 0,
            rng: XorShift64Star::new(seed),
            alive: Vec::new(),
        }
    }

    fn random_point(&mut self) -> Vec2 {
        vec2(self.rng.next_f64(), self.rng.next_f64())
    }
}

impl Manager<()> for Churn {
    fn on_frame(&mut self, _engine: &Engine<()>) -> bool {
        true
    }

    fn update(&mut self, queue: &mut CommandQueue<()>) {
        self.tick += 1;
        let cycle = self.tick / self.period;
        match self.tick % self.period {
            0 => {
                let id = NodeId::from(format!("node{cycle}"));
                let position = self.random_point();
                queue.add_node(&id, position, NodeOptions::default());
                self.alive.push(id);
            }
            1 if cycle > 1 && self.alive.len() >= 2 => {
                let n = self.alive.len();
                queue.add_link(&self.alive[n - 1], &self.alive[n - 2], ());
            }
            2 if cycle > 1 => {
                let destination = self.random_point();
                if let Some(last) = self.alive.last() {
                    queue.set_destination(last, destination);
                }
            }
            3 if cycle > 5 && !self.alive.is_empty() => {
                let oldest = self.alive.remove(0);
                queue.remove_node(oldest);
            }
            _ => {}
        }
    }
}

/// Small deterministic PRNG so scenario runs are reproducible from `--seed`.
#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    pub fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() % (upper as u64)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_of_a_triangle_on_the_unit_circle() {
        assert!((chord_length(1.0, 3) - 3f64.sqrt()).abs() < 1e-12);
        assert!((chord_length(1.0, 2) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rng_is_reproducible_and_in_range() {
        let mut a = XorShift64Star::new(7);
        let mut b = XorShift64Star::new(7);
        for _ in 0..100 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
            assert!(a.next_usize(5) < 5);
            b.next_usize(5);
        }
        assert_eq!(XorShift64Star::new(0).next_u64(), XorShift64Star::new(1).next_u64());
    }

    #[test]
    fn churn_cycle_creates_links_moves_and_deletes() {
        let mut churn = Churn::new(4, 1);
        let mut queue = CommandQueue::<()>::new();
        let mut kinds = Vec::new();
        for _ in 0..28 {
            churn.update(&mut queue);
            kinds.extend(queue.iter().map(|c| c.kind()));
            queue.clear();
        }
        assert_eq!(kinds.iter().filter(|k| **k == "add_node").count(), 7);
        assert!(kinds.contains(&"add_link"));
        assert!(kinds.contains(&"set_destination"));
        assert_eq!(kinds.iter().filter(|k| **k == "remove_node").count(), 1);
    }
}
