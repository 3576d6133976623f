/// Evaluation intervals and thresholds for non-player ship AI.

#[derive(Debug, Clone, Copy)]
pub struct AiTuning {
    pub behavior_interval: f32,
    pub helm_interval: f32,
    pub homing_interval: f32,
    pub evade_interval: f32,
    pub patrol_interval: f32,
    pub lock_interval: f32,
    pub scan_interval: f32,
    pub repair_interval: f32,
    pub shield_interval: f32,

    /// Rotation error (rad) the helm treats as "on heading".
    pub helm_tolerance: f32,
    /// Rudder used between the neutral point and the tolerance band.
    pub helm_reduced_rudder: f32,

    /// Beyond this distance homing aims at the intercept point instead of the target.
    pub homing_direct_aim_distance: f32,
    /// Within this distance homing throttles down.
    pub homing_strike_range: f32,
    pub homing_strike_throttle: f32,

    pub patrol_proximity: f32,
    pub patrol_throttle: f32,

    /// Hostiles inside this radius make the shield AI raise shields.
    pub shield_threat_radius: f32,

    /// Shield ratio below which a recently hit attacker breaks off.
    pub evade_shield_ratio: f32,
    /// Shield ratio at which an evading ship turns back to attack.
    pub recover_shield_ratio: f32,
    /// "Recently hit" window in seconds.
    pub recent_damage_window: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            behavior_interval: 1.0,
            helm_interval: 0.1,
            homing_interval: 0.5,
            evade_interval: 0.5,
            patrol_interval: 1.0,
            lock_interval: 1.0,
            scan_interval: 2.0,
            repair_interval: 5.0,
            shield_interval: 1.0,

            helm_tolerance: 0.02,
            helm_reduced_rudder: 10.0,

            homing_direct_aim_distance: 400.0,
            homing_strike_range: 200.0,
            homing_strike_throttle: 20.0,

            patrol_proximity: 100.0,
            patrol_throttle: 60.0,

            shield_threat_radius: 600.0,

            evade_shield_ratio: 0.25,
            recover_shield_ratio: 0.75,
            recent_damage_window: 10.0,
        }
    }
}
