// Non-player ship AI: behavior state machine plus independently scheduled components.

pub mod behavior;
pub mod evade;
pub mod helm;
pub mod homing;
pub mod patrol;
pub mod targeting;
pub mod upkeep;

pub use behavior::{AiState, Behavior, Category, next_behavior};
pub use helm::{HelmAi, TurningProfile};

use crate::domain::contacts::Contact;
use crate::domain::ship::Ship;
use crate::domain::tuning::AiTuning;
use evade::EvadeAi;
use glam::Vec2;
use homing::HomingAi;
use patrol::PatrolAi;
use targeting::{LockAi, ScanAi};
use upkeep::{RepairAi, ShieldAi};

/// Re-evaluation schedule of one component. Fires on the first tick after creation.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    interval: f32,
    elapsed: f32,
}

impl Timer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: interval,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Makes the next `tick` fire.
    pub fn expire(&mut self) {
        self.elapsed = self.interval;
    }
}

/// Heading and throttle requested by a movement component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Course {
    pub rotation: f32,
    pub throttle: f32,
}

pub struct ShipAi {
    tuning: AiTuning,
    behavior: Behavior,
    behavior_timer: Timer,
    helm: HelmAi,
    homing: HomingAi,
    evade: EvadeAi,
    patrol: PatrolAi,
    lock: LockAi,
    scan: ScanAi,
    repair: RepairAi,
    shield: ShieldAi,
}

impl ShipAi {
    pub fn new(profile: TurningProfile, patrol_path: Vec<Vec2>, tuning: AiTuning) -> Self {
        Self {
            behavior: Behavior::Idle,
            behavior_timer: Timer::new(tuning.behavior_interval),
            helm: HelmAi::new(profile, &tuning),
            homing: HomingAi::new(&tuning),
            evade: EvadeAi::new(&tuning),
            patrol: PatrolAi::new(patrol_path, &tuning),
            lock: LockAi::new(&tuning),
            scan: ScanAi::new(&tuning),
            repair: RepairAi::new(&tuning),
            shield: ShieldAi::new(&tuning),
            tuning,
        }
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn helm(&self) -> &HelmAi {
        &self.helm
    }

    /// One AI tick for `ship`, given the contact list built for it this tick.
    pub fn update(&mut self, dt: f32, ship: &mut Ship, contacts: &[Contact]) {
        if self.behavior_timer.tick(dt) {
            let state = AiState {
                aggressive: ship.faction.is_aggressive(),
                hostile_in_range: contacts.iter().any(|c| c.is_ship() && c.hostile),
                shield_ratio: ship.shield.ratio(),
                time_since_damage: ship.shield.time_since_damage(),
            };
            let next = next_behavior(self.behavior, &state, &self.tuning);
            if next != self.behavior {
                tracing::debug!(ship_id = %ship.id, from = ?self.behavior, to = ?next, "ai behavior changed");
                self.behavior = next;
                self.homing.reset();
                self.evade.reset();
                self.patrol.reset();
                self.lock.reset();
            }
        }

        let category = self.behavior.category();
        let course = match category {
            Category::Idle => {
                self.helm.clear_target();
                ship.set_throttle(0.0);
                None
            }
            Category::Patrol => self.patrol.update(dt, &ship.pose, &self.tuning),
            Category::Evade => self.evade.update(dt, &ship.pose, contacts),
            Category::Attack => self.homing.update(dt, &ship.pose, contacts, &self.tuning),
        };
        if let Some(course) = course {
            self.helm.set_target(course.rotation);
            ship.set_throttle(course.throttle);
        }

        if category == Category::Attack {
            self.lock.update(dt, ship, contacts);
        } else if ship.lock().is_some() {
            ship.abort_lock();
        }
        if category != Category::Idle {
            self.scan.update(dt, ship, contacts);
        }
        self.repair.update(dt, ship);
        self.shield.update(dt, ship, contacts, &self.tuning);
        self.helm.update(dt, ship, &self.tuning);
    }
}
