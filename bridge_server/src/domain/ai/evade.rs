// Evade AI: runs from the nearest ship it cannot vouch for.

use crate::domain::contacts::{Contact, nearest};
use crate::domain::math::bearing;
use crate::domain::physics::Pose;
use crate::domain::ship::MAX_COMMAND;
use crate::domain::tuning::AiTuning;

use super::{Course, Timer};

#[derive(Debug, Clone)]
pub struct EvadeAi {
    timer: Timer,
}

impl EvadeAi {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            timer: Timer::new(tuning.evade_interval),
        }
    }

    pub fn reset(&mut self) {
        self.timer.expire();
    }

    pub fn update(&mut self, dt: f32, own: &Pose, contacts: &[Contact]) -> Option<Course> {
        if !self.timer.tick(dt) {
            return None;
        }
        let threat = nearest(contacts, Contact::is_threat)?;
        Some(Course {
            rotation: bearing(threat.position, own.position),
            throttle: MAX_COMMAND,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObjectId;
    use crate::domain::contacts::ContactKind;
    use crate::domain::ship::Faction;
    use glam::Vec2;

    fn contact(raw: u64, x: f32, faction: Option<Faction>, hostile: bool) -> Contact {
        Contact {
            id: ObjectId::from_raw(raw),
            kind: ContactKind::Ship,
            position: Vec2::new(x, 0.0),
            velocity: Vec2::ZERO,
            bearing: 0.0,
            distance: x.abs(),
            faction,
            hostile,
            in_scope: true,
        }
    }

    #[test]
    fn when_threat_is_ahead_then_evade_turns_to_reciprocal_at_full_throttle() {
        let tuning = AiTuning::default();
        let mut evade = EvadeAi::new(&tuning);
        let contacts = vec![
            contact(2, 50.0, Some(Faction::Trader), false),
            contact(3, 200.0, None, false),
        ];

        let course = evade
            .update(0.0, &Pose::default(), &contacts)
            .expect("course");

        assert!((course.rotation.abs() - std::f32::consts::PI).abs() < 1e-4);
        assert_eq!(course.throttle, MAX_COMMAND);
    }

    #[test]
    fn when_only_friendlies_around_then_evade_has_no_course() {
        let tuning = AiTuning::default();
        let mut evade = EvadeAi::new(&tuning);
        let contacts = vec![contact(2, 50.0, Some(Faction::Trader), false)];

        assert!(evade.update(0.0, &Pose::default(), &contacts).is_none());
    }
}
