// Jump drive: charge, jump, recharge.

use crate::domain::tuning::JumpTuning;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "progress")]
pub enum JumpState {
    Ready,
    Jumping(f32),
    Recharging(f32),
}

#[derive(Debug, Clone)]
pub struct JumpDrive {
    tuning: JumpTuning,
    state: JumpState,
    distance: f32,
}

impl JumpDrive {
    pub fn new(tuning: JumpTuning) -> Self {
        Self {
            tuning,
            state: JumpState::Ready,
            distance: tuning.min_distance,
        }
    }

    pub fn state(&self) -> JumpState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, JumpState::Ready)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn min_distance(&self) -> f32 {
        self.tuning.min_distance
    }

    pub fn max_distance(&self) -> f32 {
        self.tuning.max_distance
    }

    /// Selects the jump distance as a ratio of the drive's range.
    pub fn set_distance_ratio(&mut self, ratio: f32) {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        self.distance =
            self.tuning.min_distance + ratio * (self.tuning.max_distance - self.tuning.min_distance);
    }

    /// Starts charging a jump. Only possible from `Ready`.
    pub fn start(&mut self) -> bool {
        if self.is_ready() {
            self.state = JumpState::Jumping(0.0);
            true
        } else {
            false
        }
    }

    /// Cancels a jump in progress without recharge penalty.
    pub fn abort(&mut self) -> bool {
        if matches!(self.state, JumpState::Jumping(_)) {
            self.state = JumpState::Ready;
            true
        } else {
            false
        }
    }

    /// Advances the drive. Returns the distance to move forward when a jump completes.
    pub fn update(&mut self, dt: f32, boost: f32) -> Option<f32> {
        match self.state {
            JumpState::Ready => None,
            JumpState::Jumping(progress) => {
                let progress = progress + self.tuning.jumping_speed * boost * dt;
                if progress >= 1.0 {
                    self.state = JumpState::Recharging(0.0);
                    Some(
                        self.distance
                            .clamp(self.tuning.min_distance, self.tuning.max_distance),
                    )
                } else {
                    self.state = JumpState::Jumping(progress);
                    None
                }
            }
            JumpState::Recharging(progress) => {
                let progress = progress + self.tuning.recharge_speed * boost * dt;
                self.state = if progress >= 1.0 {
                    JumpState::Ready
                } else {
                    JumpState::Recharging(progress)
                };
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive() -> JumpDrive {
        JumpDrive::new(JumpTuning {
            min_distance: 500.0,
            max_distance: 3000.0,
            jumping_speed: 0.5,
            recharge_speed: 0.25,
        })
    }

    #[test]
    fn when_jump_completes_then_distance_is_returned_and_drive_recharges() {
        let mut drive = drive();
        drive.set_distance_ratio(1.0);
        assert!(drive.start());

        assert_eq!(drive.update(1.0, 1.0), None);
        assert_eq!(drive.update(1.0, 1.0), Some(3000.0));
        assert_eq!(drive.state(), JumpState::Recharging(0.0));
        assert!(!drive.start());
    }

    #[test]
    fn when_recharge_reaches_one_then_drive_is_ready_again() {
        let mut drive = drive();
        drive.start();
        drive.update(2.0, 1.0);
        for _ in 0..4 {
            drive.update(1.0, 1.0);
        }
        assert!(drive.is_ready());
    }

    #[test]
    fn when_ratio_out_of_range_then_distance_is_clamped_to_drive_range() {
        let mut drive = drive();
        drive.set_distance_ratio(7.0);
        assert_eq!(drive.distance(), 3000.0);
        drive.set_distance_ratio(-1.0);
        assert_eq!(drive.distance(), 500.0);
        drive.set_distance_ratio(f32::NAN);
        assert_eq!(drive.distance(), 500.0);
    }

    #[test]
    fn when_jump_aborted_then_drive_returns_to_ready() {
        let mut drive = drive();
        drive.start();
        drive.update(0.5, 1.0);
        assert!(drive.abort());
        assert!(drive.is_ready());
        assert!(!drive.abort());
    }
}
