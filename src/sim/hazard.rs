//! Hazard ("dot") entity and its lifecycle state machine
//!
//! ```text
//! Spawning ──> Active ──freeze──> Frozen ──thaw──> Active (zombie)
//!     └──────────┴───────────────────┴──── kill ──> Dead
//! ```
//!
//! Position and velocity are private: owners steer through [`Hazard::steer`]
//! and [`Hazard::place`], which leave frozen and dead hazards untouched.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::geom::{Bounds, EdgeMode, bounce_in_bounds, seek};
use super::pattern::PatternKind;
use crate::consts::*;

/// Identifies the pattern instance that created a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternTag {
    pub kind: PatternKind,
    pub instance: u32,
}

/// Globally unique hazard id: owning pattern instance + serial within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HazardId {
    pub pattern: u32,
    pub serial: u32,
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardState {
    /// Harmless grow-in animation
    Spawning { elapsed_ms: f32 },
    /// Moving and lethal
    Active,
    /// Harmless, motionless, shatters on contact
    Frozen { elapsed_ms: f32 },
    /// Terminal
    Dead,
}

/// A circular hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    id: HazardId,
    owner: PatternTag,
    pos: Vec2,
    vel: Vec2,
    /// Fixed at construction
    radius: f32,
    state: HazardState,
    /// Set on thaw; the hazard then chases the player on its own
    zombie: bool,
    edges: EdgeMode,
    spawn_duration_ms: f32,
    /// Render-only jitter while a thaw is imminent
    #[serde(skip)]
    shake: Vec2,
}

impl Hazard {
    pub fn new(id: HazardId, owner: PatternTag, pos: Vec2) -> Self {
        Self {
            id,
            owner,
            pos,
            vel: Vec2::ZERO,
            radius: HAZARD_RADIUS,
            state: HazardState::Spawning { elapsed_ms: 0.0 },
            zombie: false,
            edges: EdgeMode::Wrap,
            spawn_duration_ms: SPAWN_ANIMATION_MS,
            shake: Vec2::ZERO,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_edges(mut self, edges: EdgeMode) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_spawn_duration(mut self, duration_ms: f32) -> Self {
        self.spawn_duration_ms = duration_ms;
        self
    }

    /// Start lethal immediately (bullets fired from an emitter)
    pub fn already_active(mut self) -> Self {
        self.state = HazardState::Active;
        self
    }

    pub fn id(&self) -> HazardId {
        self.id
    }

    pub fn owner(&self) -> PatternTag {
        self.owner
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn state(&self) -> HazardState {
        self.state
    }

    pub fn edges(&self) -> EdgeMode {
        self.edges
    }

    #[inline]
    pub fn is_lethal(&self) -> bool {
        matches!(self.state, HazardState::Active)
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        matches!(self.state, HazardState::Frozen { .. })
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self.state, HazardState::Dead)
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        matches!(self.state, HazardState::Spawning { .. })
    }

    /// Eligible for broad-phase collision
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.is_lethal() || self.is_frozen()
    }

    pub fn is_zombie(&self) -> bool {
        self.zombie
    }

    /// Collision radius; frozen hazards include their ice rim
    pub fn effective_radius(&self) -> f32 {
        self.radius + self.frozen_rim()
    }

    /// Ice rim thickness, melting linearly over the thaw duration
    pub fn frozen_rim(&self) -> f32 {
        match self.state {
            HazardState::Frozen { elapsed_ms } => {
                FROZEN_RIM_MAX * (1.0 - (elapsed_ms / THAW_DURATION_MS).min(1.0))
            }
            _ => 0.0,
        }
    }

    /// Draw scale: shrinks from `SPAWN_SCALE_MAX` to 1 while spawning
    pub fn spawn_scale(&self) -> f32 {
        match self.state {
            HazardState::Spawning { elapsed_ms } => {
                let progress = (elapsed_ms / self.spawn_duration_ms.max(1.0)).min(1.0);
                SPAWN_SCALE_MAX - (SPAWN_SCALE_MAX - 1.0) * progress
            }
            _ => 1.0,
        }
    }

    /// Render-only jitter offset
    pub fn shake_offset(&self) -> Vec2 {
        self.shake
    }

    /// Assign a new velocity. Ignored for frozen and dead hazards.
    pub fn steer(&mut self, vel: Vec2) {
        if self.accepts_motion() {
            self.vel = vel;
        }
    }

    /// Move to a position. Ignored for frozen and dead hazards.
    pub fn place(&mut self, pos: Vec2) {
        if self.accepts_motion() {
            self.pos = pos;
        }
    }

    /// Push by an offset (weapon fields). Ignored for frozen and dead hazards.
    pub fn displace(&mut self, delta: Vec2) {
        if self.accepts_motion() {
            self.pos += delta;
        }
    }

    /// Reflect off the arena walls. Ignored for frozen and dead hazards.
    pub fn bounce_in(&mut self, bounds: Bounds) -> bool {
        self.accepts_motion() && bounce_in_bounds(&mut self.pos, &mut self.vel, self.radius, bounds)
    }

    fn accepts_motion(&self) -> bool {
        !self.is_frozen() && !self.is_dead()
    }

    /// Freeze an active hazard. No-op in every other state.
    pub fn freeze(&mut self) {
        if self.is_lethal() {
            self.state = HazardState::Frozen { elapsed_ms: 0.0 };
            self.vel = Vec2::ZERO;
            self.shake = Vec2::ZERO;
        }
    }

    /// Thaw a frozen hazard into a player-seeking zombie. No-op otherwise.
    pub fn thaw(&mut self, player: Option<Vec2>) {
        if !self.is_frozen() {
            return;
        }
        self.state = HazardState::Active;
        self.zombie = true;
        self.shake = Vec2::ZERO;
        if let Some(v) = player.and_then(|target| seek(self.pos, target, ZOMBIE_SPEED)) {
            self.vel = v;
        }
    }

    /// Kill unconditionally. Idempotent.
    pub fn kill(&mut self) {
        self.state = HazardState::Dead;
        self.vel = Vec2::ZERO;
        self.shake = Vec2::ZERO;
    }

    /// Advance the state machine by one step
    pub fn update(&mut self, dt: f32, bounds: Bounds, player: Option<Vec2>, rng: &mut SimRng) {
        let dt_ms = dt * 1000.0;
        match self.state {
            HazardState::Spawning { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                self.state = if elapsed_ms >= self.spawn_duration_ms {
                    HazardState::Active
                } else {
                    HazardState::Spawning { elapsed_ms }
                };
            }
            HazardState::Frozen { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                self.state = HazardState::Frozen { elapsed_ms };

                let until_thaw = THAW_DURATION_MS - elapsed_ms;
                if until_thaw > 0.0 && until_thaw <= PRE_THAW_WARNING_MS {
                    let amplitude = THAW_SHAKE_AMPLITUDE * (1.0 - until_thaw / PRE_THAW_WARNING_MS);
                    self.shake = Vec2::new(
                        (rng.random::<f32>() - 0.5) * amplitude,
                        (rng.random::<f32>() - 0.5) * amplitude,
                    );
                } else {
                    self.shake = Vec2::ZERO;
                }

                if elapsed_ms >= THAW_DURATION_MS {
                    self.thaw(player);
                }
            }
            HazardState::Active => {
                if self.zombie {
                    if let Some(v) = player.and_then(|target| seek(self.pos, target, ZOMBIE_SPEED)) {
                        self.vel = v;
                    }
                }
                self.pos += self.vel * dt;
                self.edges.apply(&mut self.pos, bounds);
            }
            HazardState::Dead => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tag() -> PatternTag {
        PatternTag { kind: PatternKind::ZombieSnow, instance: 1 }
    }

    fn hazard_at(pos: Vec2) -> Hazard {
        Hazard::new(HazardId { pattern: 1, serial: 0 }, tag(), pos)
    }

    fn active_at(pos: Vec2) -> Hazard {
        hazard_at(pos).already_active()
    }

    fn bounds() -> Bounds {
        Bounds::new(400.0, 800.0)
    }

    fn is_defined(state: HazardState) -> bool {
        matches!(
            state,
            HazardState::Spawning { .. } | HazardState::Active | HazardState::Frozen { .. } | HazardState::Dead
        )
    }

    #[test]
    fn test_spawning_becomes_active() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut h = hazard_at(Vec2::new(50.0, 50.0));
        assert!(!h.is_lethal());
        assert!(!h.is_collidable());
        h.update(0.5, bounds(), None, &mut rng);
        assert!(h.is_spawning());
        assert!(h.spawn_scale() < SPAWN_SCALE_MAX && h.spawn_scale() > 1.0);
        h.update(0.5, bounds(), None, &mut rng);
        assert!(h.is_lethal());
        assert_eq!(h.spawn_scale(), 1.0);
    }

    #[test]
    fn test_spawning_does_not_move() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut h = hazard_at(Vec2::new(50.0, 50.0)).with_velocity(Vec2::new(100.0, 0.0));
        h.update(0.1, bounds(), None, &mut rng);
        assert_eq!(h.pos(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_active_integrates_and_wraps() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut h = active_at(Vec2::new(395.0, 10.0)).with_velocity(Vec2::new(100.0, 0.0));
        h.update(0.1, bounds(), None, &mut rng);
        assert!((h.pos().x - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_open_edges_leave_arena() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut h = active_at(Vec2::new(395.0, 10.0))
            .with_velocity(Vec2::new(100.0, 0.0))
            .with_edges(EdgeMode::Open);
        h.update(0.1, bounds(), None, &mut rng);
        assert!((h.pos().x - 405.0).abs() < 1e-3);
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut h = active_at(Vec2::ZERO);
        h.kill();
        assert!(h.is_dead());
        h.kill();
        assert!(h.is_dead());
    }

    #[test]
    fn test_kill_honoured_while_spawning_and_frozen() {
        let mut spawning = hazard_at(Vec2::ZERO);
        spawning.kill();
        assert!(spawning.is_dead());

        let mut frozen = active_at(Vec2::ZERO);
        frozen.freeze();
        frozen.kill();
        assert!(frozen.is_dead());
    }

    #[test]
    fn test_freeze_only_from_active() {
        let mut spawning = hazard_at(Vec2::ZERO);
        spawning.freeze();
        assert!(spawning.is_spawning());

        let mut dead = active_at(Vec2::ZERO);
        dead.kill();
        dead.freeze();
        assert!(dead.is_dead());

        let mut frozen = active_at(Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0));
        frozen.freeze();
        assert!(frozen.is_frozen());
        assert_eq!(frozen.vel(), Vec2::ZERO);
        let mut rng = SimRng::seed_from_u64(1);
        frozen.update(1.0, bounds(), None, &mut rng);
        frozen.freeze();
        // A second freeze does not reset the thaw timer
        assert!(matches!(frozen.state(), HazardState::Frozen { elapsed_ms } if elapsed_ms >= 999.0));
    }

    #[test]
    fn test_frozen_ignores_steering() {
        let mut h = active_at(Vec2::new(10.0, 10.0));
        h.freeze();
        h.steer(Vec2::new(100.0, 0.0));
        h.place(Vec2::new(200.0, 200.0));
        h.displace(Vec2::new(5.0, 5.0));
        assert_eq!(h.pos(), Vec2::new(10.0, 10.0));
        assert_eq!(h.vel(), Vec2::ZERO);
    }

    #[test]
    fn test_thaw_scenario_at_three_seconds() {
        let mut rng = SimRng::seed_from_u64(9);
        let player = Vec2::new(100.0, 300.0);
        let mut h = active_at(Vec2::new(100.0, 100.0));
        h.freeze();

        h.update(2.999, bounds(), Some(player), &mut rng);
        assert!(h.is_frozen());
        assert!(!h.is_lethal());

        h.update(0.001, bounds(), Some(player), &mut rng);
        assert!(h.is_lethal());
        assert!(h.is_zombie());
        let v = h.vel();
        assert!((v.length() - ZOMBIE_SPEED).abs() < 1e-3);
        assert!(v.y > 0.0 && v.x.abs() < 1e-3);
    }

    #[test]
    fn test_thaw_on_player_keeps_zero_velocity() {
        let mut h = active_at(Vec2::new(40.0, 40.0));
        h.freeze();
        h.thaw(Some(Vec2::new(40.0, 40.0)));
        assert!(h.is_lethal());
        assert_eq!(h.vel(), Vec2::ZERO);
    }

    #[test]
    fn test_shake_only_in_warning_window() {
        let mut rng = SimRng::seed_from_u64(4);
        let mut h = active_at(Vec2::new(40.0, 40.0));
        h.freeze();
        h.update(1.0, bounds(), None, &mut rng);
        assert_eq!(h.shake_offset(), Vec2::ZERO);
        h.update(1.9, bounds(), None, &mut rng);
        let s = h.shake_offset();
        assert!(s.x.abs() <= THAW_SHAKE_AMPLITUDE / 2.0 && s.y.abs() <= THAW_SHAKE_AMPLITUDE / 2.0);
        // Shake never moves the simulated position
        assert_eq!(h.pos(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_frozen_rim_melts() {
        let mut rng = SimRng::seed_from_u64(4);
        let mut h = active_at(Vec2::ZERO);
        h.freeze();
        assert_eq!(h.effective_radius(), HAZARD_RADIUS + FROZEN_RIM_MAX);
        h.update(1.5, bounds(), None, &mut rng);
        assert!((h.effective_radius() - (HAZARD_RADIUS + FROZEN_RIM_MAX / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_zombie_overrides_steering() {
        let mut rng = SimRng::seed_from_u64(2);
        let player = Vec2::new(0.0, 100.0);
        let mut h = active_at(Vec2::ZERO);
        h.freeze();
        h.thaw(Some(player));
        h.steer(Vec2::new(500.0, 0.0));
        h.update(0.1, Bounds::new(0.0, 0.0), Some(player), &mut rng);
        assert!(h.pos().x.abs() < 1e-3);
        assert!((h.pos().y - ZOMBIE_SPEED * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_state_machine_totality() {
        let mut rng = SimRng::seed_from_u64(11);
        let starts: Vec<Hazard> = {
            let spawning = hazard_at(Vec2::new(10.0, 10.0));
            let active = active_at(Vec2::new(10.0, 10.0));
            let mut frozen = active.clone();
            frozen.freeze();
            let mut dead = active.clone();
            dead.kill();
            vec![spawning, active, frozen, dead]
        };
        for start in &starts {
            for op in 0..4 {
                let mut h = start.clone();
                match op {
                    0 => h.kill(),
                    1 => h.freeze(),
                    2 => h.thaw(Some(Vec2::ZERO)),
                    _ => h.update(SIM_DT, bounds(), Some(Vec2::ZERO), &mut rng),
                }
                assert!(is_defined(h.state()));
                if start.is_dead() {
                    assert!(h.is_dead(), "dead is terminal");
                }
            }
        }
    }

    #[test]
    fn test_core_radius_fixed_at_construction() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut core = hazard_at(Vec2::ZERO).with_radius(CORE_HAZARD_RADIUS);
        core.update(2.0, bounds(), None, &mut rng);
        assert_eq!(core.radius(), CORE_HAZARD_RADIUS);
    }
}
