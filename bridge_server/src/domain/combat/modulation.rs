// Shield/beam modulation and the damage multiplier table.

use serde::{Deserialize, Serialize};

pub const MODULATION_STEPS: u8 = 8;

/// Damage per second of beam fire, indexed by modular distance between
/// shield and beam modulation. Equal modulation is absorbed best.
pub const DAMAGE_MULTIPLIERS: [f32; 5] = [0.5, 1.0, 1.5, 2.5, 4.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Modulation(u8);

impl Modulation {
    /// Values outside `0..8` wrap around.
    pub fn new(value: u8) -> Self {
        Self(value % MODULATION_STEPS)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Distance on the modulation ring, in `0..=4`.
    pub fn distance(self, other: Modulation) -> u8 {
        let d = self.0.abs_diff(other.0);
        d.min(MODULATION_STEPS - d)
    }
}

impl From<u8> for Modulation {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Modulation> for u8 {
    fn from(m: Modulation) -> Self {
        m.0
    }
}

pub fn damage_multiplier(shield: Modulation, beam: Modulation) -> f32 {
    DAMAGE_MULTIPLIERS[shield.distance(beam) as usize]
}
