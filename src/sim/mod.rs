//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (patterns by instance, hazards by spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geom;
pub mod hazard;
pub mod input;
pub mod pattern;
pub mod pickup;
pub mod player;
pub mod registry;
pub mod scheduler;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod weapon;

use serde::{Deserialize, Serialize};

/// Seeded RNG used by every simulation component
pub type SimRng = rand_pcg::Pcg32;

/// Difficulty tier, derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Pick the value for this tier
    pub fn pick<T>(self, easy: T, medium: T, hard: T) -> T {
        match self {
            Difficulty::Easy => easy,
            Difficulty::Medium => medium,
            Difficulty::Hard => hard,
        }
    }
}

pub use collision::{GridEntry, SpatialGrid};
pub use geom::{Bounds, EdgeMode, circles_overlap};
pub use hazard::{Hazard, HazardId, HazardState, PatternTag};
pub use input::{InputLatch, TickInput};
pub use pattern::{Pattern, PatternCore, PatternKind};
pub use pickup::{PickupField, WeaponOrb};
pub use player::Player;
pub use registry::{PatternRegistry, WeaponRegistry};
pub use scheduler::{Clock, FixedStep, ManualClock, SystemClock};
pub use scoring::Scoring;
pub use state::{Phase, SimEvent, Simulation, WeaponHandle};
pub use tick::tick;
pub use weapon::{Weapon, WeaponCore, WeaponKind};
