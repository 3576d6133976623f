// Top-level NPC behavior state machine.

use crate::domain::tuning::AiTuning;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    Idle,
    PeacefulPatrol,
    PeacefulEvade,
    CombatPatrol,
    Attack,
    CombatEvade,
}

/// What the component AIs branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Idle,
    Patrol,
    Evade,
    Attack,
}

impl Behavior {
    pub fn category(self) -> Category {
        match self {
            Behavior::Idle => Category::Idle,
            Behavior::PeacefulPatrol | Behavior::CombatPatrol => Category::Patrol,
            Behavior::PeacefulEvade | Behavior::CombatEvade => Category::Evade,
            Behavior::Attack => Category::Attack,
        }
    }
}

/// Observable facts the state machine decides on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiState {
    pub aggressive: bool,
    pub hostile_in_range: bool,
    pub shield_ratio: f32,
    pub time_since_damage: f32,
}

impl AiState {
    fn recently_damaged(&self, tuning: &AiTuning) -> bool {
        self.time_since_damage <= tuning.recent_damage_window
    }
}

pub fn next_behavior(current: Behavior, state: &AiState, tuning: &AiTuning) -> Behavior {
    let under_fire = state.recently_damaged(tuning);

    if !state.aggressive {
        // Peaceful ships never leave the peaceful pair of states.
        return if state.hostile_in_range || under_fire {
            Behavior::PeacefulEvade
        } else {
            Behavior::PeacefulPatrol
        };
    }

    match current {
        Behavior::Idle | Behavior::PeacefulPatrol | Behavior::PeacefulEvade => {
            Behavior::CombatPatrol
        }
        Behavior::CombatPatrol => {
            if state.hostile_in_range {
                Behavior::Attack
            } else {
                Behavior::CombatPatrol
            }
        }
        Behavior::Attack => {
            if under_fire && state.shield_ratio < tuning.evade_shield_ratio {
                Behavior::CombatEvade
            } else if state.hostile_in_range {
                Behavior::Attack
            } else {
                Behavior::CombatPatrol
            }
        }
        Behavior::CombatEvade => {
            if state.shield_ratio >= tuning.recover_shield_ratio {
                if state.hostile_in_range {
                    Behavior::Attack
                } else {
                    Behavior::CombatPatrol
                }
            } else if !under_fire && !state.hostile_in_range {
                Behavior::CombatPatrol
            } else {
                Behavior::CombatEvade
            }
        }
    }
}
