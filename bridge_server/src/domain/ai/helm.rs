// Helm AI: turns the ship toward a requested heading without overshooting.

use crate::domain::ObjectId;
use crate::domain::math::angle_diff;
use crate::domain::physics::{BodyShape, PhysicsEngine, Pose};
use crate::domain::ship::{MAX_COMMAND, Ship};
use crate::domain::tuning::{AiTuning, ShipClass};

use super::Timer;

const SPIN_UP_SECONDS: f32 = 10.0;
const COAST_SECONDS: f32 = 10.0;

/// How far a ship of one class keeps turning after the rudder is released, by angular speed.
///
/// Measured once per class by spinning a scratch body up at full rudder and letting it coast.
#[derive(Debug, Clone)]
pub struct TurningProfile {
    // (angular speed, remaining coast angle), ascending by speed.
    samples: Vec<(f32, f32)>,
}

impl TurningProfile {
    pub fn measure(class: ShipClass, dt: f32) -> Self {
        let tuning = class.tuning();
        let id = ObjectId::from_raw(1);
        let mut physics = PhysicsEngine::new();
        physics.add_body(
            id,
            BodyShape::Circle {
                radius: tuning.radius,
            },
            tuning.density,
            Pose::default(),
        );

        let spin_up = (SPIN_UP_SECONDS / dt).ceil() as usize;
        for _ in 0..spin_up {
            physics.apply_force_torque(id, 0.0, MAX_COMMAND * tuning.rudder_factor);
            physics.step(dt);
        }
        physics.apply_force_torque(id, 0.0, 0.0);

        let coast = (COAST_SECONDS / dt).ceil() as usize;
        let mut trace = Vec::with_capacity(coast);
        let mut turned = 0.0;
        let mut last_rotation = physics.pose(id).map(|p| p.rotation).unwrap_or_default();
        for _ in 0..coast {
            let Some(pose) = physics.pose(id) else {
                break;
            };
            turned += angle_diff(last_rotation, pose.rotation);
            last_rotation = pose.rotation;
            trace.push((pose.angular_velocity.abs(), turned));
            physics.step(dt);
        }

        let total = turned;
        let mut samples: Vec<(f32, f32)> = trace
            .into_iter()
            .map(|(speed, at)| (speed, (total - at).abs()))
            .collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { samples }
    }

    /// Rotation still to come if the rudder is released at `angular_speed`.
    pub fn neutral_point(&self, angular_speed: f32) -> f32 {
        let speed = angular_speed.abs();
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        if speed <= first.0 {
            return first.1;
        }
        if speed >= last.0 {
            if last.0 <= f32::EPSILON {
                return last.1;
            }
            return last.1 * speed / last.0;
        }

        let upper = self.samples.partition_point(|s| s.0 < speed);
        let (lo, hi) = (self.samples[upper - 1], self.samples[upper]);
        let span = hi.0 - lo.0;
        if span <= f32::EPSILON {
            return hi.1;
        }
        lo.1 + (hi.1 - lo.1) * (speed - lo.0) / span
    }

    pub fn max_coast(&self) -> f32 {
        self.samples.last().map(|s| s.1).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct HelmAi {
    timer: Timer,
    target_rotation: Option<f32>,
    profile: TurningProfile,
}

impl HelmAi {
    pub fn new(profile: TurningProfile, tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.helm_interval),
            target_rotation: None,
            profile,
        }
    }

    pub fn target_rotation(&self) -> Option<f32> {
        self.target_rotation
    }

    pub fn set_target(&mut self, rotation: f32) {
        self.target_rotation = Some(rotation);
    }

    pub fn clear_target(&mut self) {
        self.target_rotation = None;
    }

    pub fn update(&mut self, dt: f32, ship: &mut Ship, tuning: &AiTuning) {
        if !self.timer.tick(dt) {
            return;
        }
        let Some(target) = self.target_rotation else {
            ship.set_rudder(0.0);
            return;
        };
        let rudder = self.rudder_for(&ship.pose, target, tuning);
        ship.set_rudder(rudder);
    }

    /// Full rudder beyond the neutral point, reduced rudder inside it, nothing when on heading.
    pub fn rudder_for(&self, pose: &Pose, target: f32, tuning: &AiTuning) -> f32 {
        let error = angle_diff(pose.rotation, target);
        if error.abs() <= tuning.helm_tolerance {
            return 0.0;
        }

        let direction = error.signum();
        let turning_toward = pose.angular_velocity * error > 0.0;
        let speed = pose.angular_velocity.abs();
        // Rotation that happens before the next evaluation counts toward the coast.
        let release = self.profile.neutral_point(speed) + speed * self.timer.interval();
        if !turning_toward || error.abs() > release {
            direction * MAX_COMMAND
        } else {
            direction * tuning.helm_reduced_rudder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ship::{Faction, ShipKind};
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 30.0;

    #[test]
    fn when_profile_measured_then_faster_turns_coast_further() {
        let profile = TurningProfile::measure(ShipClass::Cruiser, DT);

        let slow = profile.neutral_point(0.1);
        let fast = profile.neutral_point(0.8);

        assert!(fast > slow);
        assert!(profile.max_coast() > 0.0);
        assert_eq!(profile.neutral_point(0.0), profile.neutral_point(-0.0));
    }

    #[test]
    fn when_far_off_heading_then_helm_uses_full_rudder() {
        let tuning = AiTuning::default();
        let helm = HelmAi::new(TurningProfile::measure(ShipClass::Cruiser, DT), &tuning);

        let rudder = helm.rudder_for(&Pose::default(), FRAC_PI_2 + 1.0, &tuning);
        assert_eq!(rudder, MAX_COMMAND);

        let rudder = helm.rudder_for(&Pose::default(), -2.0, &tuning);
        assert_eq!(rudder, -MAX_COMMAND);
    }

    #[test]
    fn when_turning_toward_heading_then_rudder_drops_from_full_to_reduced_to_zero() {
        let tuning = AiTuning::default();
        let profile = TurningProfile::measure(ShipClass::Cruiser, DT);
        let neutral = profile.neutral_point(0.5);
        let helm = HelmAi::new(profile, &tuning);
        let pose = Pose {
            angular_velocity: 0.5,
            ..Pose::default()
        };

        assert_eq!(helm.rudder_for(&pose, neutral + 0.3, &tuning), MAX_COMMAND);
        let inside = (tuning.helm_tolerance + neutral) / 2.0;
        assert_eq!(
            helm.rudder_for(&pose, inside, &tuning),
            tuning.helm_reduced_rudder
        );
        assert_eq!(helm.rudder_for(&pose, 0.01, &tuning), 0.0);
    }

    #[test]
    fn when_turning_away_from_heading_then_helm_uses_full_rudder_back() {
        let tuning = AiTuning::default();
        let helm = HelmAi::new(TurningProfile::measure(ShipClass::Cruiser, DT), &tuning);
        let pose = Pose {
            angular_velocity: 0.5,
            ..Pose::default()
        };

        assert_eq!(helm.rudder_for(&pose, -0.1, &tuning), -MAX_COMMAND);
    }

    #[test]
    fn when_within_tolerance_then_rudder_is_zero() {
        let tuning = AiTuning::default();
        let helm = HelmAi::new(TurningProfile::measure(ShipClass::Cruiser, DT), &tuning);

        assert_eq!(helm.rudder_for(&Pose::default(), 0.01, &tuning), 0.0);
    }

    #[test]
    fn when_helm_steers_for_a_while_then_ship_settles_on_heading() {
        let tuning = AiTuning::default();
        let mut physics = PhysicsEngine::new();
        let mut ship = Ship::spawn(
            ObjectId::from_raw(1),
            "Drifter",
            ShipClass::Cruiser,
            ShipKind::NonPlayer,
            Faction::Trader,
            Pose::default(),
            &mut physics,
        );
        let mut helm = HelmAi::new(TurningProfile::measure(ShipClass::Cruiser, DT), &tuning);
        helm.set_target(FRAC_PI_2);

        for _ in 0..(20.0 / DT) as usize {
            physics.step(DT);
            ship.update(DT, &mut physics);
            helm.update(DT, &mut ship, &tuning);
        }

        assert!(angle_diff(ship.pose.rotation, FRAC_PI_2).abs() < 0.1);
        assert!(ship.pose.angular_velocity.abs() < 0.2);
    }
}
