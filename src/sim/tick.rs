//! Fixed timestep simulation tick
//!
//! One call advances a [`Simulation`] by exactly one step, in this order:
//! player, patterns (and scheduling), broad-phase rebuild, player collisions,
//! pickups, weapons, retirement of completed patterns and weapons.

use rand::Rng;

use super::collision::first_orb_hit;
use super::geom::circles_overlap;
use super::hazard::HazardId;
use super::input::TickInput;
use super::state::{Phase, SimEvent, Simulation, live_refs};
use super::weapon::WeaponKind;

/// Advance the simulation by one fixed timestep
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f32) {
    if sim.phase == Phase::GameOver {
        return;
    }

    if let Some(bounds) = sim.pending_bounds.take() {
        log::info!("Arena resized to {}x{}", bounds.width, bounds.height);
        sim.bounds = bounds;
    }
    sim.scoring.record_tick();

    sim.player.update(dt, input.velocity, sim.bounds, sim.settings.wrap);

    update_patterns(sim, dt);
    schedule_patterns(sim, dt);

    sim.grid.rebuild(sim.patterns.iter().flat_map(|p| p.core().hazards()));
    if collide_player(sim) {
        return;
    }

    collect_pickup(sim);
    update_weapons(sim, dt);
    retire_completed(sim);
}

fn update_patterns(sim: &mut Simulation, dt: f32) {
    let player = sim.player.pos;
    for pattern in &mut sim.patterns {
        pattern.tick(dt);
        pattern.update(dt, player, sim.bounds, &mut sim.rng);
        pattern.core_mut().prune_dead();
    }
}

/// Start a new pattern when the interval timer runs out, or early once the
/// arena has been idle for a while
fn schedule_patterns(sim: &mut Simulation, dt: f32) {
    let dt_ms = dt * 1000.0;
    sim.pattern_timer_ms -= dt_ms;

    if sim.patterns.iter().any(|p| p.is_actively_spawning()) {
        sim.idle_ms = 0.0;
    } else {
        sim.idle_ms += dt_ms;
    }
    let warmed_up = sim.scoring.survival_secs() * 1000.0 >= sim.settings.first_pattern_delay_ms;
    let idle = warmed_up && sim.idle_ms >= sim.settings.idle_spawn_delay_ms;
    if sim.pattern_timer_ms > 0.0 && !idle {
        return;
    }

    let kinds: Vec<_> = sim.pattern_registry.kinds().collect();
    if let Some(kind) = sim.select_next_pattern(&kinds) {
        // Failures are logged by spawn_pattern and never stop the run
        let _ = sim.spawn_pattern(kind, sim.player.pos);
    }

    let interval = sim.settings.pattern_interval_for_score(sim.score());
    let spread = sim.settings.pattern_interval_jitter_ms * 0.5;
    let jitter = if spread > 0.0 {
        sim.rng.random_range(-spread..=spread)
    } else {
        0.0
    };
    sim.pattern_timer_ms = (interval + jitter).max(0.0);
    sim.idle_ms = 0.0;
}

/// Shatter frozen hazards the player touches; a lethal one ends the run.
/// Returns true on game over.
fn collide_player(sim: &mut Simulation) -> bool {
    let hits = sim.grid.query_all(sim.player.pos, sim.player.hitbox_radius);

    if let Some(lethal) = hits.iter().find(|e| e.lethal) {
        game_over(sim, Some(lethal.id));
        return true;
    }

    for entry in hits {
        let shattered = sim
            .patterns
            .iter_mut()
            .filter(|p| p.core().tag().instance == entry.id.pattern)
            .find_map(|p| p.core_mut().get_mut(entry.id))
            .filter(|h| h.is_frozen());
        if let Some(hazard) = shattered {
            hazard.kill();
            sim.scoring.credit_kills(1);
            sim.events.push(SimEvent::HazardShattered {
                id: entry.id,
                pos: entry.pos,
            });
        }
    }
    false
}

fn collect_pickup(sim: &mut Simulation) {
    let kinds: Vec<WeaponKind> = sim.weapon_registry.kinds().collect();
    sim.pickups
        .refill(sim.bounds, sim.player.pos, &kinds, &mut sim.rng);

    let Some(index) = first_orb_hit(sim.player.pos, sim.player.hitbox_radius, sim.pickups.orbs()) else {
        return;
    };
    if let Some(orb) = sim.pickups.take(index) {
        // Failures are logged by activate_weapon
        let _ = sim.activate_weapon(orb.kind);
    }
}

fn update_weapons(sim: &mut Simulation, dt: f32) {
    let mut caught = false;
    for active in &mut sim.weapons {
        let weapon = active.weapon.as_mut();
        if let Some(body) = weapon.body() {
            if circles_overlap(sim.player.pos, sim.player.hitbox_radius, body.pos, body.radius) {
                weapon.nudge(&sim.player);
            }
        }

        weapon.tick(dt);
        let mut hazards = live_refs(&mut sim.patterns);
        weapon.update(dt, &sim.player, &mut hazards, sim.bounds);

        if weapon.endangers_player() {
            log::info!("Player caught in {} blast", weapon.kind().as_str());
            caught = true;
        }
    }
    if caught {
        game_over(sim, None);
    }
}

fn retire_completed(sim: &mut Simulation) {
    let mut index = 0;
    while index < sim.weapons.len() {
        if !sim.weapons[index].weapon.is_complete() {
            index += 1;
            continue;
        }
        let active = sim.weapons.remove(index);
        let kind = active.weapon.kind();
        let kills = active.weapon.killed_count();
        sim.scoring.credit_kills(kills);
        log::info!("Weapon {} finished with {kills} kills", kind.as_str());
        sim.events.push(SimEvent::WeaponFinished {
            handle: active.handle,
            kind,
            kills,
        });
    }

    for pattern in &mut sim.patterns {
        pattern.core_mut().prune_dead();
    }
    let events = &mut sim.events;
    sim.patterns.retain(|pattern| {
        if !pattern.is_complete() {
            return true;
        }
        let tag = pattern.core().tag();
        log::info!("Pattern {} #{} completed", tag.kind.as_str(), tag.instance);
        events.push(SimEvent::PatternCompleted { tag });
        false
    });
}

fn game_over(sim: &mut Simulation, by: Option<HazardId>) {
    sim.phase = Phase::GameOver;
    log::info!(
        "Game over: score {} after {:.1} s",
        sim.score(),
        sim.scoring.survival_secs()
    );
    sim.events.push(SimEvent::PlayerKilled {
        by,
        pos: sim.player.pos,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::consts::SIM_DT;
    use crate::sim::geom::Bounds;
    use crate::sim::pattern::PatternKind;
    use crate::sim::registry::{PatternRegistry, WeaponRegistry};
    use glam::Vec2;

    fn quiet_settings() -> Settings {
        Settings {
            weapon_orb_count: 0,
            ..Settings::default()
        }
    }

    fn run(sim: &mut Simulation, seconds: f32) {
        let ticks = (seconds / SIM_DT).round() as usize;
        for _ in 0..ticks {
            tick(sim, &TickInput::default(), SIM_DT);
        }
    }

    /// Simulation whose only pattern is a single frozen or active hazard
    /// under the player
    fn sim_with_grid_under_player() -> Simulation {
        let mut sim = Simulation::with_defaults(Settings {
            first_pattern_delay_ms: 1.0e9,
            ..quiet_settings()
        });
        sim.spawn_pattern(PatternKind::SparseGrid, Vec2::ZERO).unwrap();
        let target = sim.live_hazards().next().map(|h| h.pos()).unwrap();
        sim.player.pos = target;
        sim
    }

    #[test]
    fn test_first_pattern_after_delay() {
        let mut sim = Simulation::with_defaults(quiet_settings());
        run(&mut sim, 2.9);
        assert!(sim.active_pattern_kinds().is_empty());
        run(&mut sim, 0.2);
        assert_eq!(sim.active_pattern_kinds().len(), 1);
        assert!(
            sim.drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::PatternSpawned { .. }))
        );
    }

    #[test]
    fn test_spawning_hazard_is_harmless() {
        let mut sim = sim_with_grid_under_player();
        // Grid hazards spend their first second spawning
        tick(&mut sim, &TickInput::default(), SIM_DT);
        assert_eq!(sim.phase, Phase::Playing);
    }

    #[test]
    fn test_lethal_contact_ends_run() {
        let mut sim = sim_with_grid_under_player();
        run(&mut sim, 1.1);
        assert!(sim.is_game_over());
        let events = sim.drain_events();
        assert!(matches!(
            events.last(),
            Some(SimEvent::PlayerKilled { by: Some(_), .. })
        ));

        // Further ticks do nothing
        let ticks = sim.scoring.ticks();
        run(&mut sim, 1.0);
        assert_eq!(sim.scoring.ticks(), ticks);
    }

    #[test]
    fn test_frozen_contact_shatters_and_scores() {
        let mut sim = sim_with_grid_under_player();
        // Keep the player clear until the grid is live, then freeze and touch
        sim.player.pos = Vec2::new(-500.0, -500.0);
        sim.settings.wrap = false;
        run(&mut sim, 1.1);
        let mut hazards = live_refs(&mut sim.patterns);
        for hazard in hazards.iter_mut() {
            hazard.freeze();
        }
        drop(hazards);

        let target = sim.live_hazards().next().map(|h| h.pos()).unwrap();
        sim.player.pos = target;
        tick(&mut sim, &TickInput::default(), SIM_DT);
        assert_eq!(sim.phase, Phase::Playing);
        assert_eq!(sim.scoring.kills(), 1);
        assert!(
            sim.drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::HazardShattered { .. }))
        );
    }

    #[test]
    fn test_pickup_activates_weapon_and_credits_kills() {
        let mut sim = Simulation::with_defaults(Settings {
            first_pattern_delay_ms: 1.0e9,
            ..Settings::default()
        });
        tick(&mut sim, &TickInput::default(), SIM_DT);
        assert_eq!(sim.pickups.orbs().len(), 3);

        let orb = sim.pickups.orbs()[0];
        sim.player.pos = orb.pos;
        tick(&mut sim, &TickInput::default(), SIM_DT);
        let events = sim.drain_events();
        assert!(events.iter().any(
            |e| matches!(e, SimEvent::WeaponActivated { kind, .. } if *kind == orb.kind)
        ));
        // Refilled on the following tick
        tick(&mut sim, &TickInput::default(), SIM_DT);
        assert_eq!(sim.pickups.orbs().len(), 3);
    }

    #[test]
    fn test_weapon_kills_scored_on_completion() {
        let mut sim = Simulation::with_defaults(Settings {
            first_pattern_delay_ms: 1.0e9,
            ..quiet_settings()
        });
        sim.spawn_pattern(PatternKind::SparseGrid, Vec2::ZERO).unwrap();
        sim.player.pos = Vec2::new(-500.0, -500.0);
        sim.settings.wrap = false;
        run(&mut sim, 1.1);
        let live_before = sim.live_hazards().count();

        sim.player.pos = Vec2::new(200.0, 400.0);
        let handle = sim.activate_weapon(WeaponKind::KineticBomb).unwrap();
        // Kinetic blast covers 180 px around the player
        run(&mut sim, 0.2);
        assert!(sim.weapon(handle).is_some());
        let live_after = sim.live_hazards().count();
        assert!(live_after < live_before);
        assert_eq!(sim.scoring.kills(), 0, "credited only once finished");

        run(&mut sim, 1.0);
        assert!(sim.weapon(handle).is_none());
        assert_eq!(sim.scoring.kills() as usize, live_before - sim.live_hazards().count());
    }

    #[test]
    fn test_nuclear_blast_can_end_run() {
        let mut sim = Simulation::with_defaults(Settings {
            first_pattern_delay_ms: 1.0e9,
            ..quiet_settings()
        });
        sim.activate_weapon(WeaponKind::NuclearBomb).unwrap();
        run(&mut sim, 3.2);
        assert!(sim.is_game_over());
        assert!(matches!(
            sim.drain_events().last(),
            Some(SimEvent::PlayerKilled { by: None, .. })
        ));
    }

    #[test]
    fn test_resize_applies_next_tick() {
        let mut sim = Simulation::with_defaults(quiet_settings());
        sim.resize(Bounds::new(300.0, 500.0));
        assert_eq!(sim.bounds, Bounds::new(400.0, 800.0));
        tick(&mut sim, &TickInput::default(), SIM_DT);
        assert_eq!(sim.bounds, Bounds::new(300.0, 500.0));
    }

    #[test]
    fn test_completed_patterns_are_retired() {
        let mut sim = Simulation::with_defaults(Settings {
            first_pattern_delay_ms: 1.0e9,
            ..quiet_settings()
        });
        let tag = sim.spawn_pattern(PatternKind::SparseGrid, Vec2::ZERO).unwrap();
        sim.player.pos = Vec2::new(-500.0, -500.0);
        sim.settings.wrap = false;
        for pattern in &mut sim.patterns {
            pattern.clear();
        }
        tick(&mut sim, &TickInput::default(), SIM_DT);
        assert!(sim.active_pattern_kinds().is_empty());
        assert!(
            sim.drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::PatternCompleted { tag: t } if *t == tag))
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let play = |seed: u64| {
            let mut sim = Simulation::with_defaults(Settings {
                seed,
                ..Settings::default()
            });
            let input = TickInput::new(Vec2::new(120.0, -60.0));
            for _ in 0..900 {
                tick(&mut sim, &input, SIM_DT);
            }
            (
                sim.score(),
                sim.active_pattern_kinds(),
                sim.live_hazards().map(|h| h.pos()).collect::<Vec<_>>(),
            )
        };
        assert_eq!(play(42), play(42));
    }

    #[test]
    fn test_empty_registries_run_quietly() {
        let mut sim = Simulation::new(Settings::default(), PatternRegistry::new(), WeaponRegistry::new());
        run(&mut sim, 10.0);
        assert_eq!(sim.phase, Phase::Playing);
        assert!(sim.pickups.orbs().is_empty());
        assert_eq!(sim.score(), 1);
    }
}
