// Per-class ship tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    Cruiser,
    Corvette,
    Freighter,
}

/// Beam weapon mount in ship-local coordinates.
#[derive(Debug, Clone, Copy)]
pub struct BeamMount {
    pub offset: Vec2,
    /// Mount heading relative to the ship's nose.
    pub orientation: f32,
    /// Full arc width in radians, centered on `orientation`.
    pub arc: f32,
    pub range: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TubeMount {
    pub offset: Vec2,
    pub orientation: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct ShieldTuning {
    pub max_strength: f32,
    /// Strength regained per second while down, at boost 1.
    pub recharge_speed: f32,
    /// Strength lost per second while up, at boost 1.
    pub decay_speed: f32,
    /// Fraction of max strength needed to raise shields.
    pub activation_ratio: f32,
    /// Fraction of max strength at or below which shields fail.
    pub failure_ratio: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct JumpTuning {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Jump progress per second at boost 1.
    pub jumping_speed: f32,
    /// Recharge progress per second at boost 1.
    pub recharge_speed: f32,
}

#[derive(Debug, Clone)]
pub struct ShipTuning {
    pub radius: f32,
    pub density: f32,
    pub max_hull: f32,

    /// Thrust units per second the engines follow the throttle with.
    pub thrust_responsiveness: f32,
    pub ahead_thrust_factor: f32,
    pub reverse_thrust_factor: f32,
    pub rudder_factor: f32,

    pub lock_speed: f32,
    pub scan_speed: f32,
    pub sensor_range: f32,
    pub scope_range: f32,

    pub shield: ShieldTuning,
    pub jump: JumpTuning,

    pub beams: Vec<BeamMount>,
    pub beam_firing_speed: f32,
    pub beam_recharge_speed: f32,

    pub tubes: Vec<TubeMount>,
    pub tube_reload_speed: f32,
    pub magazine_capacity: u32,

    /// Subsystem health restored per second.
    pub repair_speed: f32,
}

impl ShipClass {
    pub fn tuning(self) -> ShipTuning {
        match self {
            ShipClass::Cruiser => ShipTuning {
                radius: 12.0,
                density: 1.0,
                max_hull: 100.0,
                thrust_responsiveness: 25.0,
                ahead_thrust_factor: 0.4,
                reverse_thrust_factor: 0.2,
                rudder_factor: 0.02,
                lock_speed: 0.25,
                scan_speed: 0.2,
                sensor_range: 2000.0,
                scope_range: 800.0,
                shield: ShieldTuning {
                    max_strength: 40.0,
                    recharge_speed: 2.0,
                    decay_speed: 0.5,
                    activation_ratio: 0.25,
                    failure_ratio: 0.1,
                },
                jump: JumpTuning {
                    min_distance: 500.0,
                    max_distance: 3000.0,
                    jumping_speed: 0.5,
                    recharge_speed: 0.1,
                },
                beams: vec![
                    BeamMount {
                        offset: Vec2::new(10.0, 4.0),
                        orientation: 0.0,
                        arc: FRAC_PI_2,
                        range: 300.0,
                    },
                    BeamMount {
                        offset: Vec2::new(10.0, -4.0),
                        orientation: 0.0,
                        arc: FRAC_PI_2,
                        range: 300.0,
                    },
                ],
                beam_firing_speed: 0.5,
                beam_recharge_speed: 0.25,
                tubes: vec![
                    TubeMount {
                        offset: Vec2::new(14.0, 2.0),
                        orientation: 0.0,
                    },
                    TubeMount {
                        offset: Vec2::new(14.0, -2.0),
                        orientation: 0.0,
                    },
                ],
                tube_reload_speed: 0.2,
                magazine_capacity: 8,
                repair_speed: 0.05,
            },
            ShipClass::Corvette => ShipTuning {
                radius: 8.0,
                density: 1.0,
                max_hull: 60.0,
                thrust_responsiveness: 40.0,
                ahead_thrust_factor: 0.5,
                reverse_thrust_factor: 0.25,
                rudder_factor: 0.03,
                lock_speed: 0.2,
                scan_speed: 0.25,
                sensor_range: 1500.0,
                scope_range: 700.0,
                shield: ShieldTuning {
                    max_strength: 25.0,
                    recharge_speed: 1.5,
                    decay_speed: 0.25,
                    activation_ratio: 0.25,
                    failure_ratio: 0.1,
                },
                jump: JumpTuning {
                    min_distance: 300.0,
                    max_distance: 1500.0,
                    jumping_speed: 0.5,
                    recharge_speed: 0.05,
                },
                beams: vec![BeamMount {
                    offset: Vec2::new(7.0, 0.0),
                    orientation: 0.0,
                    arc: FRAC_PI_2,
                    range: 250.0,
                }],
                beam_firing_speed: 0.5,
                beam_recharge_speed: 0.2,
                tubes: Vec::new(),
                tube_reload_speed: 0.0,
                magazine_capacity: 0,
                repair_speed: 0.03,
            },
            ShipClass::Freighter => ShipTuning {
                radius: 16.0,
                density: 1.5,
                max_hull: 120.0,
                thrust_responsiveness: 15.0,
                ahead_thrust_factor: 0.25,
                reverse_thrust_factor: 0.1,
                rudder_factor: 0.01,
                lock_speed: 0.1,
                scan_speed: 0.1,
                sensor_range: 1200.0,
                scope_range: 500.0,
                shield: ShieldTuning {
                    max_strength: 30.0,
                    recharge_speed: 1.0,
                    decay_speed: 0.25,
                    activation_ratio: 0.25,
                    failure_ratio: 0.1,
                },
                jump: JumpTuning {
                    min_distance: 500.0,
                    max_distance: 2000.0,
                    jumping_speed: 0.25,
                    recharge_speed: 0.05,
                },
                beams: Vec::new(),
                beam_firing_speed: 0.0,
                beam_recharge_speed: 0.0,
                tubes: Vec::new(),
                tube_reload_speed: 0.0,
                magazine_capacity: 0,
                repair_speed: 0.03,
            },
        }
    }
}
