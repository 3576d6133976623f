// Patrol AI: loops over a fixed path.

use crate::domain::math::bearing;
use crate::domain::physics::Pose;
use crate::domain::tuning::AiTuning;
use glam::Vec2;

use super::{Course, Timer};

#[derive(Debug, Clone)]
pub struct PatrolAi {
    timer: Timer,
    path: Vec<Vec2>,
    next: usize,
}

impl PatrolAi {
    pub fn new(path: Vec<Vec2>, tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.patrol_interval),
            path,
            next: 0,
        }
    }

    pub fn reset(&mut self) {
        self.timer.expire();
    }

    pub fn next_point(&self) -> Option<Vec2> {
        self.path.get(self.next).copied()
    }

    pub fn update(&mut self, dt: f32, own: &Pose, tuning: &AiTuning) -> Option<Course> {
        if !self.timer.tick(dt) || self.path.is_empty() {
            return None;
        }
        if own.position.distance(self.path[self.next]) <= tuning.patrol_proximity {
            self.next = (self.next + 1) % self.path.len();
        }
        Some(Course {
            rotation: bearing(own.position, self.path[self.next]),
            throttle: tuning.patrol_throttle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(500.0, 0.0),
            Vec2::new(500.0, 500.0),
            Vec2::new(0.0, 500.0),
        ]
    }

    #[test]
    fn when_far_from_point_then_patrol_heads_for_it() {
        let tuning = AiTuning::default();
        let mut patrol = PatrolAi::new(square(), &tuning);

        let course = patrol
            .update(0.0, &Pose::default(), &tuning)
            .expect("course");

        assert!(course.rotation.abs() < 1e-4);
        assert_eq!(course.throttle, tuning.patrol_throttle);
    }

    #[test]
    fn when_last_point_reached_then_patrol_wraps_to_first() {
        let tuning = AiTuning::default();
        let mut patrol = PatrolAi::new(square(), &tuning);

        for point in square() {
            patrol.reset();
            patrol.update(0.0, &Pose::at(point, 0.0), &tuning);
        }

        assert_eq!(patrol.next_point(), Some(Vec2::new(500.0, 0.0)));
    }

    #[test]
    fn when_path_is_empty_then_patrol_is_a_no_op() {
        let tuning = AiTuning::default();
        let mut patrol = PatrolAi::new(Vec::new(), &tuning);

        assert!(patrol.update(1.0, &Pose::default(), &tuning).is_none());
    }
}
