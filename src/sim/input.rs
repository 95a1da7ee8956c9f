//! Per-tick input and the cross-thread velocity hand-off

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Desired player velocity (px/s)
    pub velocity: Vec2,
}

impl TickInput {
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

/// Single-writer/single-reader velocity slot.
///
/// An input thread publishes the latest velocity; the loop samples it once
/// per tick. Both components live in one `AtomicU64`, so a reader never sees
/// x from one write and y from another.
#[derive(Debug, Default)]
pub struct InputLatch {
    packed: AtomicU64,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn pack(v: Vec2) -> u64 {
        ((v.x.to_bits() as u64) << 32) | v.y.to_bits() as u64
    }

    #[inline]
    fn unpack(bits: u64) -> Vec2 {
        Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
    }

    /// Publish a new velocity
    pub fn publish(&self, velocity: Vec2) {
        self.packed.store(Self::pack(velocity), Ordering::Release);
    }

    /// Read the latest velocity as a value
    pub fn sample(&self) -> TickInput {
        TickInput::new(Self::unpack(self.packed.load(Ordering::Acquire)))
    }
}
