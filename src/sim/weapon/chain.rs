//! Chain reaction propagation
//!
//! Breadth-first expansion over an implicit proximity graph. The root node
//! is ignited with a hit radius; every eligible hazard inside it is killed
//! and becomes a child node one level deeper with a smaller radius. Nodes
//! created in one pass are only expanded in the next pass, and passes are
//! at least [`HOP_DELAY_MS`] apart, so the chain visibly hops outward.
//!
//! Propagation stops when a pass creates no new node or every pending node
//! sits at the depth cap. Each node corresponds to one killed hazard from a
//! finite eligible set, so the number of passes is bounded by that set.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::hazard::{Hazard, HazardId};

/// Minimum delay between expansion passes
pub const HOP_DELAY_MS: f32 = 80.0;
/// Nodes stay visible this long after the chain settles
pub const FADE_MS: f32 = 600.0;
/// Per-depth radius falloff of child nodes
pub const DEPTH_FALLOFF: f32 = 0.92;

/// One expanding hit region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainNode {
    pub pos: Vec2,
    pub radius: f32,
    pub depth: u32,
    pub activated_ms: f32,
    /// Index of the node that spawned this one. Attribution only.
    pub parent: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ChainReaction {
    nodes: Vec<ChainNode>,
    /// First node not yet expanded
    frontier: usize,
    hop_radius: f32,
    max_depth: u32,
    eligible: HashSet<HazardId>,
    elapsed_ms: f32,
    since_pass_ms: f32,
    settled_ms: Option<f32>,
    kills: u32,
}

impl ChainReaction {
    /// `eligible` is the set of hazards the chain may ever electrify
    pub fn new(eligible: HashSet<HazardId>, hop_radius: f32, max_depth: u32) -> Self {
        Self {
            nodes: Vec::new(),
            frontier: 0,
            hop_radius,
            max_depth,
            eligible,
            elapsed_ms: 0.0,
            since_pass_ms: 0.0,
            settled_ms: None,
            kills: 0,
        }
    }

    /// Create the root node and electrify everything inside it.
    /// Returns the kills made. Ignored once the chain has started.
    pub fn ignite(&mut self, pos: Vec2, radius: f32, hazards: &mut [&mut Hazard]) -> u32 {
        if !self.nodes.is_empty() {
            return 0;
        }
        self.nodes.push(ChainNode {
            pos,
            radius,
            depth: 0,
            activated_ms: self.elapsed_ms,
            parent: None,
        });
        self.frontier = 1;
        self.since_pass_ms = 0.0;
        let kills = self.electrify(0, hazards);
        log::debug!("chain ignited at {pos:?} r={radius:.1}: {kills} kills");
        kills
    }

    pub fn is_ignited(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// No further expansion will happen
    pub fn is_settled(&self) -> bool {
        self.settled_ms.is_some()
    }

    /// Settled and faded out
    pub fn is_complete(&self) -> bool {
        self.settled_ms
            .is_some_and(|settled| self.elapsed_ms - settled >= FADE_MS)
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Deepest level reached so far
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Advance time and run at most one expansion pass. Returns the kills
    /// made this step.
    pub fn update(&mut self, dt: f32, hazards: &mut [&mut Hazard]) -> u32 {
        let dt_ms = dt * 1000.0;
        self.elapsed_ms += dt_ms;
        if !self.is_ignited() || self.is_settled() {
            return 0;
        }
        self.since_pass_ms += dt_ms;
        if self.since_pass_ms < HOP_DELAY_MS {
            return 0;
        }
        self.since_pass_ms = 0.0;

        let end = self.nodes.len();
        let start = std::mem::replace(&mut self.frontier, end);
        let mut kills = 0;
        for index in start..end {
            if self.nodes[index].depth < self.max_depth {
                kills += self.electrify(index, hazards);
            }
        }

        if self.nodes.len() == end {
            self.settled_ms = Some(self.elapsed_ms);
            log::debug!(
                "chain settled: {} nodes, depth {}, {} kills",
                self.nodes.len(),
                self.depth(),
                self.kills
            );
        } else {
            log::debug!("chain pass: {} new nodes, {kills} kills", self.nodes.len() - end);
        }
        kills
    }

    /// Kill eligible hazards inside node `index`, spawning child nodes
    fn electrify(&mut self, index: usize, hazards: &mut [&mut Hazard]) -> u32 {
        let node = self.nodes[index];
        let depth = node.depth + 1;
        let radius = self.hop_radius * DEPTH_FALLOFF.powi(depth as i32 - 1);
        let mut kills = 0;

        for hazard in hazards.iter_mut() {
            if hazard.is_dead() || !self.eligible.contains(&hazard.id()) {
                continue;
            }
            if hazard.pos().distance(node.pos) > node.radius {
                continue;
            }
            hazard.kill();
            kills += 1;
            self.nodes.push(ChainNode {
                pos: hazard.pos(),
                radius,
                depth,
                activated_ms: self.elapsed_ms,
                parent: Some(index),
            });
        }
        self.kills += kills;
        kills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::weapon::snapshot_ids;
    use crate::sim::weapon::test_support::*;
    use proptest::prelude::*;

    fn line(count: usize, spacing: f32) -> Vec<Hazard> {
        hazards_at(
            &(0..count)
                .map(|i| Vec2::new(10.0 + i as f32 * spacing, 100.0))
                .collect::<Vec<_>>(),
        )
    }

    fn run_chain(chain: &mut ChainReaction, hazards: &mut [Hazard], max_ticks: usize) -> usize {
        for tick in 0..max_ticks {
            if chain.is_complete() {
                return tick;
            }
            chain.update(SIM_DT, &mut refs(hazards));
        }
        max_ticks
    }

    #[test]
    fn test_root_kills_inside_radius_only() {
        let mut hazards = line(3, 50.0);
        let mut chain = ChainReaction::new(snapshot_ids(&refs(&mut hazards)), 1.0, 10);
        let kills = chain.ignite(Vec2::new(10.0, 100.0), 50.0, &mut refs(&mut hazards));
        assert_eq!(kills, 2);
        assert!(hazards[0].is_dead() && hazards[1].is_dead());
        assert!(!hazards[2].is_dead());
        assert_eq!(chain.nodes().len(), 3);
        assert_eq!(chain.nodes()[1].parent, Some(0));
    }

    #[test]
    fn test_hops_one_level_per_pass() {
        let mut hazards = line(5, 20.0);
        let mut chain = ChainReaction::new(snapshot_ids(&refs(&mut hazards)), 35.0, 100);
        chain.ignite(Vec2::new(10.0, 100.0), 1.0, &mut refs(&mut hazards));
        assert_eq!(chain.kills(), 1);

        // Nothing happens before the hop delay
        chain.update(0.05, &mut refs(&mut hazards));
        assert_eq!(chain.kills(), 1);
        chain.update(0.05, &mut refs(&mut hazards));
        assert_eq!(chain.kills(), 2);
        assert_eq!(chain.depth(), 2);
        for _ in 0..3 {
            chain.update(0.1, &mut refs(&mut hazards));
        }
        assert_eq!(chain.kills(), 5);
        assert!(!chain.is_settled());
        chain.update(0.1, &mut refs(&mut hazards));
        assert!(chain.is_settled());
        assert!(!chain.is_complete());
        chain.update(0.7, &mut refs(&mut hazards));
        assert!(chain.is_complete());
    }

    #[test]
    fn test_depth_cap_stops_propagation() {
        let mut hazards = line(10, 30.0);
        let mut chain = ChainReaction::new(snapshot_ids(&refs(&mut hazards)), 35.0, 3);
        chain.ignite(Vec2::new(10.0, 100.0), 1.0, &mut refs(&mut hazards));
        run_chain(&mut chain, &mut hazards, 600);
        assert!(chain.is_complete());
        assert_eq!(chain.depth(), 3);
        assert_eq!(chain.kills(), 3);
    }

    #[test]
    fn test_child_radius_shrinks_with_depth() {
        let mut hazards = line(4, 30.0);
        let mut chain = ChainReaction::new(snapshot_ids(&refs(&mut hazards)), 40.0, 100);
        chain.ignite(Vec2::new(10.0, 100.0), 1.0, &mut refs(&mut hazards));
        run_chain(&mut chain, &mut hazards, 600);
        for node in &chain.nodes()[1..] {
            let expected = 40.0 * DEPTH_FALLOFF.powi(node.depth as i32 - 1);
            assert!((node.radius - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ignores_hazards_outside_snapshot() {
        let mut hazards = line(3, 20.0);
        let mut chain = ChainReaction::new(snapshot_ids(&refs(&mut hazards[..2])), 25.0, 100);
        chain.ignite(Vec2::new(10.0, 100.0), 1.0, &mut refs(&mut hazards));
        run_chain(&mut chain, &mut hazards, 600);
        assert_eq!(chain.kills(), 2);
        assert!(!hazards[2].is_dead());
    }

    #[test]
    fn test_empty_field_settles() {
        let mut hazards: Vec<Hazard> = Vec::new();
        let mut chain = ChainReaction::new(HashSet::new(), 40.0, 1000);
        assert!(!chain.is_complete());
        chain.ignite(Vec2::ZERO, 100.0, &mut refs(&mut hazards));
        let ticks = run_chain(&mut chain, &mut hazards, 600);
        assert!(chain.is_complete());
        assert!(ticks < 60);
    }

    proptest! {
        #[test]
        fn prop_chain_terminates_within_available(
            points in prop::collection::vec((0.0f32..400.0, 0.0f32..800.0), 0..120),
            hop in 5.0f32..120.0,
            max_depth in 1u32..1000,
        ) {
            let mut hazards = hazards_at(&points.iter().map(|&(x, y)| Vec2::new(x, y)).collect::<Vec<_>>());
            let available = hazards.len();
            let mut chain = ChainReaction::new(snapshot_ids(&refs(&mut hazards)), hop, max_depth);
            chain.ignite(Vec2::new(200.0, 400.0), 100.0, &mut refs(&mut hazards));
            // At most one pass per 5 ticks and one pass per killed hazard
            let budget = (available + 2) * 6 + 60;
            let ticks = run_chain(&mut chain, &mut hazards, budget);
            prop_assert!(chain.is_complete(), "not complete after {ticks} ticks");
            prop_assert!(chain.kills() as usize <= available);
            prop_assert!(chain.depth() <= max_depth);
        }
    }
}
