// Self-propelled torpedo objects.

use crate::domain::ObjectId;
use crate::domain::physics::{BodyShape, PhysicsEngine, Pose};
use crate::domain::ship::Faction;
use crate::domain::tuning::TorpedoTuning;

#[derive(Debug, Clone)]
pub struct Torpedo {
    pub id: ObjectId,
    pub owner: ObjectId,
    pub faction: Faction,
    pub pose: Pose,
    burn_time: f32,
    tuning: TorpedoTuning,
}

impl Torpedo {
    /// Creates the torpedo and its physics body.
    pub fn launch(
        id: ObjectId,
        owner: ObjectId,
        faction: Faction,
        pose: Pose,
        tuning: TorpedoTuning,
        physics: &mut PhysicsEngine,
    ) -> Self {
        physics.add_body(
            id,
            BodyShape::Circle {
                radius: tuning.radius,
            },
            tuning.density,
            pose,
        );
        physics.apply_force_torque(id, tuning.thrust, 0.0);
        Self {
            id,
            owner,
            faction,
            pose,
            burn_time: 0.0,
            tuning,
        }
    }

    pub fn radius(&self) -> f32 {
        self.tuning.radius
    }

    pub fn damage(&self) -> f32 {
        self.tuning.damage
    }

    pub fn burn_time(&self) -> f32 {
        self.burn_time
    }

    /// Pulls the post-step pose and keeps the motor burning.
    /// Returns false once the burn time is exhausted.
    pub fn update(&mut self, dt: f32, physics: &mut PhysicsEngine) -> bool {
        if let Some(pose) = physics.pose(self.id) {
            self.pose = pose;
        }
        self.burn_time += dt;
        if self.burn_time >= self.tuning.max_burn_time {
            return false;
        }
        physics.apply_force_torque(self.id, self.tuning.thrust, 0.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_burn_time_exhausted_then_torpedo_reports_dead() {
        let mut physics = PhysicsEngine::new();
        let tuning = TorpedoTuning {
            max_burn_time: 1.0,
            ..TorpedoTuning::default()
        };
        let mut torpedo = Torpedo::launch(
            ObjectId::from_raw(5),
            ObjectId::from_raw(1),
            Faction::Federation,
            Pose::default(),
            tuning,
            &mut physics,
        );

        physics.step(0.5);
        assert!(torpedo.update(0.5, &mut physics));
        physics.step(0.5);
        assert!(!torpedo.update(0.5, &mut physics));
    }

    #[test]
    fn when_burning_then_torpedo_accelerates_forward() {
        let mut physics = PhysicsEngine::new();
        let mut torpedo = Torpedo::launch(
            ObjectId::from_raw(5),
            ObjectId::from_raw(1),
            Faction::Federation,
            Pose::default(),
            TorpedoTuning::default(),
            &mut physics,
        );

        for _ in 0..10 {
            physics.step(0.1);
            torpedo.update(0.1, &mut physics);
        }

        assert!(torpedo.pose.velocity.x > 10.0);
        assert!(torpedo.pose.position.x > 0.0);
    }
}
