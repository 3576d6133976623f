// Shield handler: strength cycle, modulation and the first stage of the damage pipeline.

use crate::domain::combat::Modulation;
use crate::domain::tuning::ShieldTuning;

#[derive(Debug, Clone)]
pub struct ShieldHandler {
    tuning: ShieldTuning,
    strength: f32,
    up: bool,
    modulation: Modulation,
    // Set for the tick in which the shield absorbed something (visual cue).
    activated: bool,
    time_since_damage: f32,
}

impl ShieldHandler {
    pub fn new(tuning: ShieldTuning) -> Self {
        Self {
            tuning,
            strength: tuning.max_strength,
            up: false,
            modulation: Modulation::default(),
            activated: false,
            time_since_damage: f32::MAX,
        }
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn max_strength(&self) -> f32 {
        self.tuning.max_strength
    }

    pub fn ratio(&self) -> f32 {
        if self.tuning.max_strength <= 0.0 {
            return 0.0;
        }
        self.strength / self.tuning.max_strength
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    pub fn set_modulation(&mut self, modulation: Modulation) {
        self.modulation = modulation;
    }

    pub fn time_since_damage(&self) -> f32 {
        self.time_since_damage
    }

    pub fn failure_threshold(&self) -> f32 {
        self.tuning.max_strength * self.tuning.failure_ratio
    }

    pub fn can_activate(&self) -> bool {
        self.strength >= self.tuning.max_strength * self.tuning.activation_ratio
            && self.strength > self.failure_threshold()
    }

    /// Raises shields if there is enough strength. Returns whether shields are up.
    pub fn raise(&mut self) -> bool {
        if !self.up && self.can_activate() {
            self.up = true;
        }
        self.up
    }

    pub fn lower(&mut self) {
        self.up = false;
    }

    pub fn toggle(&mut self) {
        if self.up {
            self.lower();
        } else {
            self.raise();
        }
    }

    pub fn update(&mut self, dt: f32, boost: f32) {
        self.activated = false;
        self.time_since_damage = (self.time_since_damage + dt).min(f32::MAX);

        if self.up {
            self.strength -= self.tuning.decay_speed / boost.max(0.1) * dt;
        } else {
            self.strength += self.tuning.recharge_speed * boost * dt;
        }
        self.clamp_and_check_failure();
    }

    /// Absorbs as much of `damage` as the shield can and returns the overflow for the hull.
    pub fn absorb(&mut self, damage: f32) -> f32 {
        if damage <= 0.0 {
            return 0.0;
        }
        self.time_since_damage = 0.0;

        if !self.up {
            return damage;
        }

        let absorbed = damage.min(self.strength);
        self.strength -= absorbed;
        if absorbed > 0.0 {
            self.activated = true;
        }
        self.clamp_and_check_failure();
        damage - absorbed
    }

    fn clamp_and_check_failure(&mut self) {
        self.strength = self.strength.clamp(0.0, self.tuning.max_strength);
        if self.up && self.strength <= self.failure_threshold() {
            self.up = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning() -> ShieldTuning {
        ShieldTuning {
            max_strength: 40.0,
            recharge_speed: 2.0,
            decay_speed: 0.5,
            activation_ratio: 0.25,
            failure_ratio: 0.1,
        }
    }

    #[test]
    fn when_shield_is_down_then_damage_passes_through() {
        let mut shield = ShieldHandler::new(tuning());
        let overflow = shield.absorb(10.0);

        assert_eq!(overflow, 10.0);
        assert_eq!(shield.strength(), 40.0);
        assert!(!shield.is_activated());
        assert_eq!(shield.time_since_damage(), 0.0);
    }

    #[test]
    fn when_damage_exceeds_strength_then_excess_overflows_and_shield_fails() {
        let mut shield = ShieldHandler::new(tuning());
        assert!(shield.raise());

        let overflow = shield.absorb(50.0);

        assert_eq!(overflow, 10.0);
        assert_eq!(shield.strength(), 0.0);
        assert!(!shield.is_up());
        assert!(shield.is_activated());
    }

    #[test]
    fn when_strength_drops_to_failure_threshold_then_shield_goes_down() {
        let mut shield = ShieldHandler::new(tuning());
        shield.raise();

        shield.absorb(36.0);
        assert_eq!(shield.strength(), 4.0);
        assert!(!shield.is_up());
    }

    #[test]
    fn when_strength_stays_above_threshold_then_shield_stays_up() {
        let mut shield = ShieldHandler::new(tuning());
        shield.raise();

        shield.absorb(30.0);
        assert_eq!(shield.strength(), 10.0);
        assert!(shield.is_up());
    }

    #[test]
    fn when_strength_is_below_activation_then_raise_is_refused() {
        let mut shield = ShieldHandler::new(tuning());
        shield.raise();
        shield.absorb(32.0);
        shield.lower();

        assert!(!shield.raise());
    }

    #[test]
    fn when_activated_tick_passes_then_visual_cue_clears() {
        let mut shield = ShieldHandler::new(tuning());
        shield.raise();
        shield.absorb(1.0);
        assert!(shield.is_activated());

        shield.update(0.1, 1.0);
        assert!(!shield.is_activated());
    }

    proptest! {
        #[test]
        fn strength_always_stays_within_bounds(
            ops in proptest::collection::vec((0.0f32..60.0, 0.0f32..2.0, any::<bool>()), 1..50)
        ) {
            let mut shield = ShieldHandler::new(tuning());
            for (damage, dt, toggle) in ops {
                if toggle {
                    shield.toggle();
                }
                shield.absorb(damage);
                shield.update(dt, 1.0);
                prop_assert!(shield.strength() >= 0.0);
                prop_assert!(shield.strength() <= shield.max_strength());
                if shield.is_up() {
                    prop_assert!(shield.strength() > shield.failure_threshold());
                }
            }
        }
    }
}
