//! Dotstorm headless runner
//!
//! Plays one seeded run with a simple autopilot and logs what happens.
//!
//! Usage: `dotstorm [settings.json] [max_seconds]`

use glam::Vec2;

use dotstorm::Settings;
use dotstorm::consts::SIM_DT_MS;
use dotstorm::sim::{FixedStep, ManualClock, SimEvent, Simulation, TickInput};

/// Autopilot flees anything lethal inside this radius
const DANGER_RADIUS: f32 = 120.0;
/// Cruise speed toward pickups (px/s)
const CRUISE_SPEED: f32 = 250.0;
/// Flee speed (px/s)
const FLEE_SPEED: f32 = 600.0;
const DEFAULT_MAX_SECS: f64 = 300.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load settings from {path}: {e}, using defaults");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let max_secs = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_MAX_SECS);

    log::info!("Dotstorm starting (seed {:#x})", settings.seed);
    let mut stepper = FixedStep::new(ManualClock::new(), settings.max_substeps);
    let mut sim = Simulation::with_defaults(settings);

    let mut elapsed_ms = 0.0;
    while !sim.is_game_over() && elapsed_ms < max_secs * 1000.0 {
        stepper.clock().advance(SIM_DT_MS);
        elapsed_ms += SIM_DT_MS;
        stepper.pump(|dt| {
            let input = autopilot(&sim);
            sim.advance(&input, dt);
        });
        report(&mut sim);
    }

    log::info!(
        "Run over after {:.1} s: score {} ({} kills, {} ticks)",
        sim.scoring.survival_secs(),
        sim.score(),
        sim.scoring.kills(),
        stepper.total_ticks()
    );
}

/// Run from the closest lethal hazard, otherwise drift toward the nearest orb
fn autopilot(sim: &Simulation) -> TickInput {
    let player = sim.player.pos;

    let threat = sim
        .live_hazards()
        .filter(|h| h.is_lethal())
        .map(|h| (h.pos(), h.pos().distance(player)))
        .filter(|(_, d)| *d < DANGER_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((pos, _)) = threat {
        let away = (player - pos).normalize_or(Vec2::Y);
        return TickInput::new(away * FLEE_SPEED);
    }

    let orb = sim
        .pickups
        .orbs()
        .iter()
        .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)));
    match orb {
        Some(orb) => TickInput::new((orb.pos - player).normalize_or_zero() * CRUISE_SPEED),
        None => TickInput::default(),
    }
}

fn report(sim: &mut Simulation) {
    for event in sim.drain_events() {
        match event {
            SimEvent::WeaponActivated { kind, .. } => {
                log::info!("Picked up {}", kind.as_str());
            }
            SimEvent::HazardShattered { pos, .. } => {
                log::debug!("Shattered frozen dot at ({:.0}, {:.0})", pos.x, pos.y);
            }
            SimEvent::PlayerKilled { by, pos } => match by {
                Some(id) => log::info!(
                    "Hit by dot {}#{} at ({:.0}, {:.0})",
                    id.pattern,
                    id.serial,
                    pos.x,
                    pos.y
                ),
                None => log::info!("Caught in a blast at ({:.0}, {:.0})", pos.x, pos.y),
            },
            other => log::debug!("{other:?}"),
        }
    }
}
