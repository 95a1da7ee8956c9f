//! Fixed-timestep scheduler
//!
//! Converts wall-clock deltas into a whole number of `SIM_DT` ticks. Ticks
//! are never skipped: when a frame would need more than `max_substeps`
//! ticks, the surplus stays in the accumulator and is consumed on later
//! frames. Pausing freezes the accumulator; resuming re-reads the clock so
//! the paused interval is never replayed.

use std::cell::Cell;
use std::time::Instant;

use crate::consts::{SIM_DT, SIM_DT_MS};

/// Absorbs f64 rounding from repeated subtraction of a non-terminating
/// tick length, so a backlog of exactly N ticks yields N ticks.
const TICK_EPSILON_MS: f64 = 1e-6;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Accumulator loop
#[derive(Debug)]
pub struct FixedStep<C: Clock> {
    clock: C,
    accumulator_ms: f64,
    last_time_ms: Option<f64>,
    paused: bool,
    max_substeps: u32,
    total_ticks: u64,
}

impl<C: Clock> FixedStep<C> {
    pub fn new(clock: C, max_substeps: u32) -> Self {
        Self {
            clock,
            accumulator_ms: 0.0,
            last_time_ms: None,
            paused: false,
            max_substeps: max_substeps.max(1),
            total_ticks: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Read the clock and run every tick that is due (up to the substep cap).
    /// Returns the number of ticks run.
    pub fn pump(&mut self, step: impl FnMut(f32)) -> u32 {
        let now = self.clock.now_ms();
        let delta = match self.last_time_ms {
            Some(last) => now - last,
            None => 0.0,
        };
        self.last_time_ms = Some(now);
        self.feed(delta, step)
    }

    /// Add an explicit wall-clock delta and run the ticks that are due
    pub fn feed(&mut self, delta_ms: f64, mut step: impl FnMut(f32)) -> u32 {
        if self.paused {
            return 0;
        }
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.accumulator_ms += delta_ms;
        }

        let mut ticks = 0;
        while self.accumulator_ms + TICK_EPSILON_MS >= SIM_DT_MS && ticks < self.max_substeps {
            step(SIM_DT);
            self.accumulator_ms = (self.accumulator_ms - SIM_DT_MS).max(0.0);
            ticks += 1;
        }
        self.total_ticks += ticks as u64;

        if ticks == self.max_substeps && self.accumulator_ms + TICK_EPSILON_MS >= SIM_DT_MS {
            log::debug!(
                "Catch-up capped at {} ticks, {:.1} ms carried over",
                self.max_substeps,
                self.accumulator_ms
            );
        }
        ticks
    }

    /// Freeze the accumulator
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue from the current clock reading; the paused interval is dropped
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_time_ms = Some(self.clock.now_ms());
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time waiting to be simulated (ms)
    pub fn backlog_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator_ms / SIM_DT_MS).clamp(0.0, 1.0) as f32
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain<C: Clock>(step: &mut FixedStep<C>) -> u64 {
        while step.feed(0.0, |_| {}) > 0 {}
        step.total_ticks()
    }

    #[test]
    fn test_33ms_whole_vs_halves() {
        let mut whole = FixedStep::new(ManualClock::new(), 8);
        let mut halves = FixedStep::new(ManualClock::new(), 8);
        assert_eq!(whole.feed(33.0, |_| {}), 1);
        assert_eq!(halves.feed(16.5, |_| {}), 0);
        assert_eq!(halves.feed(16.5, |_| {}), 1);
        assert!((whole.backlog_ms() - halves.backlog_ms()).abs() < 1e-9);
    }

    #[test]
    fn test_exact_multiple_runs_all_ticks() {
        let mut step = FixedStep::new(ManualClock::new(), 8);
        assert_eq!(step.feed(50.0, |_| {}), 3);
    }

    #[test]
    fn test_step_receives_fixed_dt() {
        let mut step = FixedStep::new(ManualClock::new(), 8);
        let mut seen = Vec::new();
        step.feed(40.0, |dt| seen.push(dt));
        assert_eq!(seen, vec![SIM_DT, SIM_DT]);
    }

    #[test]
    fn test_cap_carries_backlog() {
        let mut step = FixedStep::new(ManualClock::new(), 4);
        // 10 ticks of time in one frame
        assert_eq!(step.feed(SIM_DT_MS * 10.0 + 1.0, |_| {}), 4);
        assert_eq!(step.feed(0.0, |_| {}), 4);
        assert_eq!(step.feed(0.0, |_| {}), 2);
        assert_eq!(step.feed(0.0, |_| {}), 0);
        assert_eq!(step.total_ticks(), 10);
    }

    #[test]
    fn test_pump_reads_clock() {
        let clock = ManualClock::new();
        let mut step = FixedStep::new(&clock, 8);
        assert_eq!(step.pump(|_| {}), 0);
        clock.advance(34.0);
        assert_eq!(step.pump(|_| {}), 2);
    }

    #[test]
    fn test_pause_freezes_and_resume_skips_gap() {
        let clock = ManualClock::new();
        let mut step = FixedStep::new(&clock, 8);
        step.pump(|_| {});
        clock.advance(10.0);
        step.pump(|_| {});
        step.pause();

        clock.advance(5_000.0);
        assert_eq!(step.pump(|_| {}), 0);
        assert!((step.backlog_ms() - 10.0).abs() < 1e-9);

        clock.advance(5_000.0);
        step.resume();
        assert_eq!(step.pump(|_| {}), 0);
        clock.advance(7.0);
        assert_eq!(step.pump(|_| {}), 1);
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let clock = ManualClock::new();
        clock.set(100.0);
        let mut step = FixedStep::new(&clock, 8);
        step.pump(|_| {});
        clock.set(50.0);
        assert_eq!(step.pump(|_| {}), 0);
        assert_eq!(step.backlog_ms(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_tick_count(
            deltas in prop::collection::vec(0u32..200, 1..40),
        ) {
            let total: u32 = deltas.iter().sum();

            let mut chunked = FixedStep::new(ManualClock::new(), 8);
            for d in &deltas {
                chunked.feed(*d as f64, |_| {});
            }
            let mut single = FixedStep::new(ManualClock::new(), 8);
            single.feed(total as f64, |_| {});

            prop_assert_eq!(drain(&mut chunked), drain(&mut single));
            prop_assert!((chunked.backlog_ms() - single.backlog_ms()).abs() < 1e-6);
            prop_assert!(chunked.backlog_ms() < SIM_DT_MS);
        }
    }
}
