// Engineering: power allocation, subsystem health and repairs.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI};

pub const DEFAULT_POWER_LEVEL: u32 = 100;
pub const MAX_POWER_LEVEL: u32 = 200;
pub const POWER_BUDGET: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subsystem {
    Impulse,
    Jump,
    Shields,
    Weapons,
}

impl Subsystem {
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Impulse,
        Subsystem::Jump,
        Subsystem::Shields,
        Subsystem::Weapons,
    ];

    fn index(self) -> usize {
        match self {
            Subsystem::Impulse => 0,
            Subsystem::Jump => 1,
            Subsystem::Shields => 2,
            Subsystem::Weapons => 3,
        }
    }

    /// Subsystem exposed to a hit arriving from `relative_bearing` (ship-local, radians).
    pub fn facing(relative_bearing: f32) -> Subsystem {
        let a = crate::domain::math::wrap_angle(relative_bearing);
        if a.abs() <= FRAC_PI_4 {
            Subsystem::Weapons
        } else if a.abs() >= PI - FRAC_PI_4 {
            Subsystem::Impulse
        } else if a > 0.0 {
            Subsystem::Shields
        } else {
            Subsystem::Jump
        }
    }
}

#[derive(Debug, Clone)]
pub struct PowerHandler {
    levels: [u32; 4],
    health: [f32; 4],
    repairing: Option<Subsystem>,
    repair_speed: f32,
}

impl PowerHandler {
    pub fn new(repair_speed: f32) -> Self {
        Self {
            levels: [DEFAULT_POWER_LEVEL; 4],
            health: [1.0; 4],
            repairing: None,
            repair_speed,
        }
    }

    pub fn level(&self, system: Subsystem) -> u32 {
        self.levels[system.index()]
    }

    pub fn health(&self, system: Subsystem) -> f32 {
        self.health[system.index()]
    }

    /// Multiplier applied to the subsystem's rates.
    pub fn boost(&self, system: Subsystem) -> f32 {
        self.level(system) as f32 / 100.0 * self.health(system)
    }

    /// Sets a level, clamped to the per-system maximum and to what the budget leaves.
    pub fn set_level(&mut self, system: Subsystem, level: u32) -> u32 {
        let others: u32 = Subsystem::ALL
            .iter()
            .filter(|s| **s != system)
            .map(|s| self.level(*s))
            .sum();
        let available = POWER_BUDGET.saturating_sub(others);
        let level = level.min(MAX_POWER_LEVEL).min(available);
        self.levels[system.index()] = level;
        level
    }

    pub fn damage(&mut self, system: Subsystem, amount: f32) {
        let h = &mut self.health[system.index()];
        *h = (*h - amount.max(0.0)).clamp(0.0, 1.0);
    }

    pub fn is_damaged(&self, system: Subsystem) -> bool {
        self.health(system) < 1.0
    }

    pub fn repairing(&self) -> Option<Subsystem> {
        self.repairing
    }

    /// Starts repairing a damaged subsystem. One repair at a time.
    pub fn start_repair(&mut self, system: Subsystem) -> bool {
        if self.repairing.is_some() || !self.is_damaged(system) {
            return false;
        }
        self.repairing = Some(system);
        true
    }

    pub fn update(&mut self, dt: f32) {
        let Some(system) = self.repairing else {
            return;
        };
        let h = &mut self.health[system.index()];
        *h = (*h + self.repair_speed * dt).min(1.0);
        if *h >= 1.0 {
            self.repairing = None;
        }
    }
}
