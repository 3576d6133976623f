// Lock and scan AIs: pick the nearest eligible contact and start the handler.

use crate::domain::contacts::{Contact, nearest};
use crate::domain::ship::Ship;
use crate::domain::tuning::AiTuning;

use super::Timer;

#[derive(Debug, Clone)]
pub struct LockAi {
    timer: Timer,
}

impl LockAi {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.lock_interval),
        }
    }

    pub fn reset(&mut self) {
        self.timer.expire();
    }

    pub fn update(&mut self, dt: f32, ship: &mut Ship, contacts: &[Contact]) {
        if !self.timer.tick(dt) {
            return;
        }

        if let Some(lock) = ship.lock() {
            let target = lock.target();
            let still_in_scope = contacts.iter().any(|c| c.id == target && c.in_scope);
            if !still_in_scope {
                ship.abort_lock();
            }
            return;
        }

        if let Some(target) = nearest(contacts, |c| c.is_ship() && c.hostile && c.in_scope) {
            ship.start_lock(target.id);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanAi {
    timer: Timer,
}

impl ScanAi {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.scan_interval),
        }
    }

    pub fn update(&mut self, dt: f32, ship: &mut Ship, contacts: &[Contact]) {
        if !self.timer.tick(dt) || ship.scan().is_some() {
            return;
        }
        if let Some(target) = nearest(contacts, |c| c.is_ship() && c.faction.is_none()) {
            ship.start_scan(target.id);
        }
    }
}
