//! Pattern framework
//!
//! A pattern spawns a formation of hazards and drives it every tick. It owns
//! every hazard it creates (through [`PatternCore`]) and is complete once it
//! has stopped introducing hazards and none of its hazards are alive.
//!
//! Patterns only move their hazards through [`Hazard::steer`] and
//! [`Hazard::place`], which ignore frozen hazards, so a frozen hazard is
//! never repositioned by formation logic.

mod bouncing_ball;
mod bullet_hell;
mod clock_sweep;
mod containment_ring;
mod core_emitter;
mod cyclone;
mod gatling_point;
mod grid;
mod sweeper_line;
mod zombie_snow;

pub use bouncing_ball::BouncingBall;
pub use bullet_hell::BulletHell;
pub use clock_sweep::ClockSweep;
pub use containment_ring::ContainmentRing;
pub use core_emitter::{CoreEmitter, EmitterShape};
pub use cyclone::Cyclone;
pub use gatling_point::GatlingPoint;
pub use grid::{GridLayout, SparseGrid};
pub use sweeper_line::SweeperLine;
pub use zombie_snow::ZombieSnow;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Bounds, EdgeMode};
use super::hazard::{Hazard, HazardId, PatternTag};
use super::{Difficulty, SimRng};

/// Time lethal hazards of a time-boxed pattern survive after it stops
/// spawning, before they are retired
pub const LINGER_MS: f32 = 5000.0;

/// Registered pattern kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternKind {
    ZombieSnow,
    SweeperLine,
    SparseGrid,
    UltraSparseGrid,
    BouncingBall,
    GatlingPoint,
    BulletHell,
    ContainmentRing,
    Cyclone,
    ClockSweep,
    Spiral,
    CircleBurst,
    AimedStreams,
    Wave,
}

impl PatternKind {
    pub const ALL: [PatternKind; 14] = [
        PatternKind::ZombieSnow,
        PatternKind::SweeperLine,
        PatternKind::SparseGrid,
        PatternKind::UltraSparseGrid,
        PatternKind::BouncingBall,
        PatternKind::GatlingPoint,
        PatternKind::BulletHell,
        PatternKind::ContainmentRing,
        PatternKind::Cyclone,
        PatternKind::ClockSweep,
        PatternKind::Spiral,
        PatternKind::CircleBurst,
        PatternKind::AimedStreams,
        PatternKind::Wave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::ZombieSnow => "ZOMBIE_SNOW",
            PatternKind::SweeperLine => "SWEEPER_LINE",
            PatternKind::SparseGrid => "SPARSE_GRID",
            PatternKind::UltraSparseGrid => "ULTRA_SPARSE_GRID",
            PatternKind::BouncingBall => "BOUNCING_BALL",
            PatternKind::GatlingPoint => "GATLING_POINT",
            PatternKind::BulletHell => "BULLET_HELL",
            PatternKind::ContainmentRing => "CONTAINMENT_RING",
            PatternKind::Cyclone => "CYCLONE",
            PatternKind::ClockSweep => "CLOCK_SWEEP",
            PatternKind::Spiral => "SPIRAL",
            PatternKind::CircleBurst => "CIRCLE_BURST",
            PatternKind::AimedStreams => "AIMED_STREAMS",
            PatternKind::Wave => "WAVE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(s))
    }
}

/// State shared by every pattern: owned hazards and the elapsed-time counter
#[derive(Debug, Clone)]
pub struct PatternCore {
    tag: PatternTag,
    difficulty: Difficulty,
    hazards: Vec<Hazard>,
    /// Edge mode given to new hazards unless the pattern overrides it
    edges: EdgeMode,
    elapsed_ms: f32,
    next_serial: u32,
    started: bool,
}

impl PatternCore {
    pub fn new(tag: PatternTag, difficulty: Difficulty) -> Self {
        Self {
            tag,
            difficulty,
            hazards: Vec::new(),
            edges: EdgeMode::Wrap,
            elapsed_ms: 0.0,
            next_serial: 0,
            started: false,
        }
    }

    pub fn tag(&self) -> PatternTag {
        self.tag
    }

    pub fn kind(&self) -> PatternKind {
        self.tag.kind
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn edges(&self) -> EdgeMode {
        self.edges
    }

    /// Edge mode for hazards emitted from now on
    pub fn set_edges(&mut self, edges: EdgeMode) {
        self.edges = edges;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.started = true;
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed_ms += dt * 1000.0;
    }

    /// Create and track a new hazard. `configure` receives a fresh hazard at
    /// `pos` (carrying the core's edge mode) and returns it with velocity,
    /// radius or edge mode applied.
    pub fn emit(&mut self, pos: Vec2, configure: impl FnOnce(Hazard) -> Hazard) -> HazardId {
        let id = HazardId {
            pattern: self.tag.instance,
            serial: self.next_serial,
        };
        self.next_serial = self.next_serial.wrapping_add(1);
        self.hazards.push(configure(Hazard::new(id, self.tag, pos).with_edges(self.edges)));
        id
    }

    /// Every tracked hazard, including dead ones not yet pruned
    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn hazards_mut(&mut self) -> &mut [Hazard] {
        &mut self.hazards
    }

    pub fn live(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter().filter(|h| !h.is_dead())
    }

    pub fn live_mut(&mut self) -> impl Iterator<Item = &mut Hazard> {
        self.hazards.iter_mut().filter(|h| !h.is_dead())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn any_spawning(&self) -> bool {
        self.hazards.iter().any(Hazard::is_spawning)
    }

    pub fn get(&self, id: HazardId) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.id() == id)
    }

    pub fn get_mut(&mut self, id: HazardId) -> Option<&mut Hazard> {
        self.hazards.iter_mut().find(|h| h.id() == id)
    }

    /// Run the state machine of every hazard
    pub fn update_all(&mut self, dt: f32, bounds: Bounds, player: Vec2, rng: &mut SimRng) {
        for hazard in &mut self.hazards {
            hazard.update(dt, bounds, Some(player), rng);
        }
    }

    /// Kill lethal hazards that have left the arena by more than `margin`
    pub fn retire_outside(&mut self, bounds: Bounds, margin: f32) {
        for hazard in &mut self.hazards {
            if hazard.is_lethal() && bounds.is_outside(hazard.pos(), margin) {
                hazard.kill();
            }
        }
    }

    /// Kill every lethal or still-spawning hazard; frozen ones are left to thaw
    pub fn retire_unfrozen(&mut self) {
        for hazard in &mut self.hazards {
            if !hazard.is_frozen() {
                hazard.kill();
            }
        }
    }

    /// Drop dead hazards from the container
    pub fn prune_dead(&mut self) {
        self.hazards.retain(|h| !h.is_dead());
    }

    /// Force-kill and release every hazard
    pub fn clear(&mut self) {
        for hazard in &mut self.hazards {
            hazard.kill();
        }
        self.hazards.clear();
    }
}

/// A hazard formation
pub trait Pattern {
    fn core(&self) -> &PatternCore;

    fn core_mut(&mut self) -> &mut PatternCore;

    /// Set up the formation and create (or schedule) its hazards
    fn spawn(&mut self, origin: Vec2, bounds: Bounds, rng: &mut SimRng);

    /// Advance formation geometry and hazard kinematics
    fn update(&mut self, dt: f32, player: Vec2, bounds: Bounds, rng: &mut SimRng);

    /// Whether new hazards are still being introduced
    fn is_actively_spawning(&self) -> bool;

    fn kind(&self) -> PatternKind {
        self.core().kind()
    }

    fn start(&mut self) {
        self.core_mut().start();
    }

    /// Advance the elapsed-time counter
    fn tick(&mut self, dt: f32) {
        self.core_mut().tick(dt);
    }

    /// Done spawning and nothing it owns is still alive
    fn is_complete(&self) -> bool {
        !self.is_actively_spawning() && self.core().live_count() == 0
    }

    fn live_count(&self) -> usize {
        self.core().live_count()
    }

    fn clear(&mut self) {
        self.core_mut().clear();
    }
}

/// Velocity toward `target`, slowing linearly inside `slow_radius`.
/// Returns `None` when already on the target.
pub(crate) fn creep_toward(from: Vec2, target: Vec2, speed: f32, slow_radius: f32) -> Option<Vec2> {
    let delta = target - from;
    let dist = delta.length();
    let dir = delta.try_normalize()?;
    let speed = if dist > slow_radius { speed } else { speed * dist / slow_radius };
    Some(dir * speed)
}
