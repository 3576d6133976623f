// Repair and shield AIs.

use crate::domain::contacts::Contact;
use crate::domain::ship::{Ship, Subsystem};
use crate::domain::tuning::AiTuning;

use super::Timer;

/// Order in which damaged subsystems get repaired.
pub const REPAIR_PRIORITY: [Subsystem; 4] = [
    Subsystem::Impulse,
    Subsystem::Shields,
    Subsystem::Weapons,
    Subsystem::Jump,
];

#[derive(Debug, Clone)]
pub struct RepairAi {
    timer: Timer,
}

impl RepairAi {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.repair_interval),
        }
    }

    pub fn update(&mut self, dt: f32, ship: &mut Ship) {
        if !self.timer.tick(dt) || ship.power.repairing().is_some() {
            return;
        }
        if let Some(system) = REPAIR_PRIORITY
            .into_iter()
            .find(|s| ship.power.is_damaged(*s))
        {
            ship.power.start_repair(system);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShieldAi {
    timer: Timer,
}

impl ShieldAi {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.shield_interval),
        }
    }

    pub fn update(&mut self, dt: f32, ship: &mut Ship, contacts: &[Contact], tuning: &AiTuning) {
        if !self.timer.tick(dt) {
            return;
        }
        let threatened = contacts
            .iter()
            .any(|c| c.is_ship() && c.hostile && c.distance <= tuning.shield_threat_radius);
        if threatened {
            ship.shield.raise();
        } else {
            ship.shield.lower();
        }
    }
}
