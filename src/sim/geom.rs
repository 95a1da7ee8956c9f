//! Arena geometry helpers
//!
//! Plain 2D arithmetic on top of `glam::Vec2`: bounds, torus wrapping,
//! the canonical circle-overlap test and degenerate-safe steering.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;

/// Arena size in pixels. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when the bounds describe a usable area
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// True if `pos` lies outside the arena by more than `margin`
    pub fn is_outside(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.width + margin
            || pos.y < -margin
            || pos.y > self.height + margin
    }

    /// Larger of the two sides
    pub fn max_side(&self) -> f32 {
        self.width.max(self.height)
    }
}

/// What happens when an entity crosses the arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Reappear on the opposite side
    #[default]
    Wrap,
    /// Stop at the edge
    Clamp,
    /// Leave the arena; the owner decides when to retire it
    Open,
}

impl EdgeMode {
    /// Edge behaviour of the arena itself: wrap, or stop at the walls
    pub fn arena(wrap: bool) -> Self {
        if wrap { EdgeMode::Wrap } else { EdgeMode::Clamp }
    }

    pub fn apply(self, pos: &mut Vec2, bounds: Bounds) {
        match self {
            EdgeMode::Wrap => wrap_in_place(pos, bounds),
            EdgeMode::Clamp => clamp_in_place(pos, bounds),
            EdgeMode::Open => {}
        }
    }
}

/// Torus-wrap a position into the arena. Invalid bounds leave it untouched.
pub fn wrap_in_place(pos: &mut Vec2, bounds: Bounds) {
    if !bounds.is_valid() || !pos.is_finite() {
        return;
    }
    pos.x = pos.x.rem_euclid(bounds.width);
    pos.y = pos.y.rem_euclid(bounds.height);
}

/// Clamp a position into the arena. Invalid bounds leave it untouched.
pub fn clamp_in_place(pos: &mut Vec2, bounds: Bounds) {
    if !bounds.is_valid() {
        return;
    }
    pos.x = pos.x.clamp(0.0, bounds.width);
    pos.y = pos.y.clamp(0.0, bounds.height);
}

/// Canonical circle test. Strict: touching circles do not collide.
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let radii = radius_a + radius_b;
    a.distance_squared(b) < radii * radii
}

/// Velocity of magnitude `speed` from `from` toward `to`.
///
/// Returns `None` when the two points coincide so callers keep their
/// current velocity instead of dividing by zero.
#[inline]
pub fn seek(from: Vec2, to: Vec2, speed: f32) -> Option<Vec2> {
    (to - from).try_normalize().map(|dir| dir * speed)
}

/// Random point inside the arena, `margin` away from every edge
pub fn random_position(bounds: Bounds, margin: f32, rng: &mut SimRng) -> Vec2 {
    let span_x = (bounds.width - margin * 2.0).max(0.0);
    let span_y = (bounds.height - margin * 2.0).max(0.0);
    Vec2::new(
        margin + rng.random::<f32>() * span_x,
        margin + rng.random::<f32>() * span_y,
    )
}

/// Reflect a moving body off the arena walls, keeping it `radius` inside.
/// Returns true if any wall was hit.
pub fn bounce_in_bounds(pos: &mut Vec2, vel: &mut Vec2, radius: f32, bounds: Bounds) -> bool {
    if !bounds.is_valid() {
        return false;
    }
    let (min_x, max_x) = (radius, (bounds.width - radius).max(radius));
    let (min_y, max_y) = (radius, (bounds.height - radius).max(radius));
    let mut hit = false;

    if pos.x <= min_x {
        pos.x = min_x;
        vel.x = vel.x.abs();
        hit = true;
    } else if pos.x >= max_x {
        pos.x = max_x;
        vel.x = -vel.x.abs();
        hit = true;
    }

    if pos.y <= min_y {
        pos.y = min_y;
        vel.y = vel.y.abs();
        hit = true;
    } else if pos.y >= max_y {
        pos.y = max_y;
        vel.y = -vel.y.abs();
        hit = true;
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_wrap_negative_and_overflow() {
        let bounds = Bounds::new(100.0, 200.0);
        let mut pos = Vec2::new(-10.0, 250.0);
        wrap_in_place(&mut pos, bounds);
        assert!((pos.x - 90.0).abs() < 1e-4);
        assert!((pos.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_ignores_degenerate_bounds() {
        let mut pos = Vec2::new(-10.0, 5.0);
        wrap_in_place(&mut pos, Bounds::new(0.0, 0.0));
        assert_eq!(pos, Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn test_tangent_circles_do_not_collide() {
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(13.0, 0.0), 8.0));
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(12.9, 0.0), 8.0));
    }

    #[test]
    fn test_seek_degenerate() {
        assert!(seek(Vec2::ONE, Vec2::ONE, 50.0).is_none());
        let v = seek(Vec2::ZERO, Vec2::new(0.0, 10.0), 50.0).unwrap();
        assert!((v - Vec2::new(0.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_bounce_reflects_velocity() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut pos = Vec2::new(-5.0, 50.0);
        let mut vel = Vec2::new(-30.0, 10.0);
        assert!(bounce_in_bounds(&mut pos, &mut vel, 4.0, bounds));
        assert_eq!(pos.x, 4.0);
        assert_eq!(vel, Vec2::new(30.0, 10.0));
    }

    #[test]
    fn test_random_position_respects_margin() {
        let mut rng = SimRng::seed_from_u64(3);
        let bounds = Bounds::new(300.0, 500.0);
        for _ in 0..200 {
            let p = random_position(bounds, 16.0, &mut rng);
            assert!(p.x >= 16.0 && p.x <= 284.0);
            assert!(p.y >= 16.0 && p.y <= 484.0);
        }
    }

    proptest! {
        #[test]
        fn prop_circle_test_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 0.0f32..50.0, rb in 0.0f32..50.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ra, b, rb), circles_overlap(b, rb, a, ra));
        }

        #[test]
        fn prop_exact_tangency_never_collides(
            r1 in 1u32..40, r2 in 1u32..40, horizontal in any::<bool>(),
        ) {
            // Integer radii keep the tangent distance exactly representable
            let (r1, r2) = (r1 as f32, r2 as f32);
            let offset = if horizontal { Vec2::new(r1 + r2, 0.0) } else { Vec2::new(0.0, r1 + r2) };
            prop_assert!(!circles_overlap(Vec2::ZERO, r1, offset, r2));
            prop_assert!(!circles_overlap(offset, r2, Vec2::ZERO, r1));
        }
    }
}
