// Beam weapon handler: Idle -> Firing -> Recharging per mount.

use crate::domain::combat::Modulation;
use crate::domain::math::{angle_diff, bearing, local_to_world};
use crate::domain::physics::Pose;
use crate::domain::tuning::BeamMount;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "progress")]
pub enum BeamStatus {
    Idle,
    Firing(f32),
    Recharging(f32),
}

#[derive(Debug, Clone)]
pub struct BeamHandler {
    mount: BeamMount,
    status: BeamStatus,
    modulation: Modulation,
    firing_speed: f32,
    recharge_speed: f32,
}

impl BeamHandler {
    pub fn new(mount: BeamMount, firing_speed: f32, recharge_speed: f32) -> Self {
        Self {
            mount,
            status: BeamStatus::Idle,
            modulation: Modulation::default(),
            firing_speed,
            recharge_speed,
        }
    }

    pub fn status(&self) -> BeamStatus {
        self.status
    }

    pub fn mount(&self) -> &BeamMount {
        &self.mount
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    pub fn set_modulation(&mut self, modulation: Modulation) {
        self.modulation = modulation;
    }

    pub fn is_firing(&self) -> bool {
        matches!(self.status, BeamStatus::Firing(_))
    }

    /// World-space emitter position for the given ship pose.
    pub fn origin(&self, ship: &Pose) -> Vec2 {
        local_to_world(ship.position, ship.rotation, self.mount.offset)
    }

    /// Range and arc check only; obstruction and lock are checked by the caller.
    pub fn covers(&self, ship: &Pose, target: Vec2) -> bool {
        let origin = self.origin(ship);
        if origin.distance(target) > self.mount.range {
            return false;
        }
        let center = ship.rotation + self.mount.orientation;
        angle_diff(center, bearing(origin, target)).abs() <= self.mount.arc / 2.0
    }

    /// Advances the beam one tick.
    ///
    /// `engagement` carries the damage multiplier when the locked target is legal this tick
    /// and `None` otherwise. Returns the damage to deliver to the target this tick.
    pub fn update(&mut self, dt: f32, boost: f32, engagement: Option<f32>) -> Option<f32> {
        match self.status {
            BeamStatus::Idle => {
                let multiplier = engagement?;
                self.fire(0.0, dt, boost, multiplier)
            }
            BeamStatus::Firing(progress) => match engagement {
                Some(multiplier) => self.fire(progress, dt, boost, multiplier),
                None => {
                    self.status = BeamStatus::Recharging(0.0);
                    None
                }
            },
            BeamStatus::Recharging(progress) => {
                let progress = progress + self.recharge_speed * boost * dt;
                self.status = if progress < 1.0 {
                    BeamStatus::Recharging(progress)
                } else if engagement.is_some() {
                    BeamStatus::Firing(0.0)
                } else {
                    BeamStatus::Idle
                };
                None
            }
        }
    }

    fn fire(&mut self, progress: f32, dt: f32, boost: f32, multiplier: f32) -> Option<f32> {
        let progress = progress + self.firing_speed * boost * dt;
        self.status = if progress >= 1.0 {
            BeamStatus::Recharging(0.0)
        } else {
            BeamStatus::Firing(progress)
        };
        Some(dt * multiplier)
    }
}
