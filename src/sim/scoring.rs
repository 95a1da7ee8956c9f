//! Score keeping: kills plus a trickle of points for staying alive

use serde::{Deserialize, Serialize};

use crate::consts::{SCORE_PER_KILL, SCORE_TIME_DIVISOR_SECS, SIM_DT};

/// Ticks per survival point
const TICKS_PER_POINT: u64 = (SCORE_TIME_DIVISOR_SECS / SIM_DT + 0.5) as u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    kills: u64,
    ticks: u64,
}

impl Scoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn credit_kills(&mut self, kills: u32) {
        self.kills = self.kills.saturating_add(u64::from(kills));
    }

    pub fn kills(&self) -> u64 {
        self.kills
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn survival_secs(&self) -> f32 {
        self.ticks as f32 * SIM_DT
    }

    pub fn score(&self) -> u64 {
        self.kills.saturating_mul(SCORE_PER_KILL) + self.ticks / TICKS_PER_POINT
    }
}
