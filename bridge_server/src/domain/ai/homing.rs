// Homing AI: closes in on the nearest hostile during Attack.

use crate::domain::contacts::{Contact, nearest};
use crate::domain::math::bearing;
use crate::domain::physics::Pose;
use crate::domain::ship::MAX_COMMAND;
use crate::domain::tuning::AiTuning;
use glam::Vec2;

use super::{Course, Timer};

const MIN_CLOSING_SPEED: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct HomingAi {
    timer: Timer,
}

impl HomingAi {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.homing_interval),
        }
    }

    pub fn reset(&mut self) {
        self.timer.expire();
    }

    pub fn update(
        &mut self,
        dt: f32,
        own: &Pose,
        contacts: &[Contact],
        tuning: &AiTuning,
    ) -> Option<Course> {
        if !self.timer.tick(dt) {
            return None;
        }
        let target = nearest(contacts, |c| c.is_ship() && c.hostile)?;

        let aim = if target.distance > tuning.homing_direct_aim_distance {
            intercept_point(own, target)
        } else {
            target.position
        };
        let throttle = if target.distance <= tuning.homing_strike_range {
            tuning.homing_strike_throttle
        } else {
            MAX_COMMAND
        };

        Some(Course {
            rotation: bearing(own.position, aim),
            throttle,
        })
    }
}

/// Where the target will be by the time the gap closes at the current closing speed.
fn intercept_point(own: &Pose, target: &Contact) -> Vec2 {
    let offset = target.position - own.position;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return target.position;
    }
    let line = offset / distance;
    let closing = (own.velocity - target.velocity).dot(line);
    let closing = closing.max(own.velocity.length()).max(MIN_CLOSING_SPEED);
    target.position + target.velocity * (distance / closing)
}
