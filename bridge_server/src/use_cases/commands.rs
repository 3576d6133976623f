// Client context and the command layer in front of the world.
//
// Every command is checked against the sender's context (which ship, which station)
// before it touches the world. Rejections are typed so the actor can log them.

use crate::domain::combat::Modulation;
use crate::domain::physics::Pose;
use crate::domain::scenario::player_spawn_point;
use crate::domain::ship::{Faction, ShipKind, Subsystem};
use crate::domain::tuning::ShipClass;
use crate::domain::{ObjectId, World};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    Helm,
    Weapons,
    Navigation,
    Engineering,
    MainScreen,
}

/// Where a connected client currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientContext {
    #[default]
    ShipSelection,
    Aboard {
        ship_id: ObjectId,
        station: Station,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    SpawnShip { name: String },
    JoinShip { ship_id: ObjectId, station: Station },
    ExitShip,
    ChangeStation(Station),
    TogglePause,

    SetThrottle(f32),
    SetRudder(f32),
    StartJump,
    StopJump,

    SetJumpDistance(f32),
    AddWaypoint(Vec2),
    DeleteWaypoint(u32),
    StartScan(ObjectId),
    AbortScan,

    StartLock(ObjectId),
    AbortLock,
    ToggleShields,
    SetShieldModulation(u8),
    SetBeamModulation(u8),
    ReloadTube(usize),
    LaunchTube(usize),

    SetPower { system: Subsystem, level: u32 },
    StartRepair(Subsystem),
}

impl ClientCommand {
    /// Station a command must come from; `None` for context-level commands.
    pub fn required_station(&self) -> Option<Station> {
        use ClientCommand::*;
        match self {
            SpawnShip { .. } | JoinShip { .. } | ExitShip | ChangeStation(_) | TogglePause => None,
            SetThrottle(_) | SetRudder(_) | StartJump | StopJump => Some(Station::Helm),
            SetJumpDistance(_) | AddWaypoint(_) | DeleteWaypoint(_) | StartScan(_) | AbortScan => {
                Some(Station::Navigation)
            }
            StartLock(_)
            | AbortLock
            | ToggleShields
            | SetShieldModulation(_)
            | SetBeamModulation(_)
            | ReloadTube(_)
            | LaunchTube(_) => Some(Station::Weapons),
            SetPower { .. } | StartRepair(_) => Some(Station::Engineering),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("client is not aboard a ship")]
    NotAboard,
    #[error("command needs the {required:?} station, client is at {actual:?}")]
    WrongStation { required: Station, actual: Station },
    #[error("ship {0} not found")]
    ShipNotFound(ObjectId),
    #[error("object {0} cannot be targeted")]
    InvalidTarget(ObjectId),
    #[error("waypoint {0} not found")]
    WaypointNotFound(u32),
    #[error("tube {0} not found")]
    TubeNotFound(usize),
    #[error("{0}")]
    Unavailable(&'static str),
}

/// Applies one command for a client. Context-level commands update `context` in place.
pub fn apply_command(
    world: &mut World,
    context: &mut ClientContext,
    command: ClientCommand,
) -> Result<(), CommandError> {
    match command {
        ClientCommand::TogglePause => {
            world.toggle_pause();
            return Ok(());
        }
        ClientCommand::SpawnShip { name } => {
            let index = world
                .ships()
                .filter(|s| s.kind == ShipKind::Player)
                .count() as u32;
            let ship_id = world.spawn_ship(
                name,
                ShipClass::Cruiser,
                ShipKind::Player,
                Faction::Federation,
                Pose::at(player_spawn_point(index), 0.0),
            );
            *context = ClientContext::Aboard {
                ship_id,
                station: Station::Helm,
            };
            return Ok(());
        }
        ClientCommand::JoinShip { ship_id, station } => {
            if !world.ship(ship_id).is_some_and(|s| s.kind == ShipKind::Player) {
                return Err(CommandError::ShipNotFound(ship_id));
            }
            *context = ClientContext::Aboard { ship_id, station };
            return Ok(());
        }
        ClientCommand::ExitShip => {
            *context = ClientContext::ShipSelection;
            return Ok(());
        }
        ClientCommand::ChangeStation(next) => {
            let ClientContext::Aboard { station, .. } = context else {
                return Err(CommandError::NotAboard);
            };
            *station = next;
            return Ok(());
        }
        _ => {}
    }

    let ClientContext::Aboard { ship_id, station } = *context else {
        return Err(CommandError::NotAboard);
    };
    if let Some(required) = command.required_station() {
        if required != station {
            return Err(CommandError::WrongStation {
                required,
                actual: station,
            });
        }
    }
    apply_ship_command(world, ship_id, command)
}

fn apply_ship_command(
    world: &mut World,
    ship_id: ObjectId,
    command: ClientCommand,
) -> Result<(), CommandError> {
    // Targets are validated against the ship's own sensor picture.
    let target_check = match &command {
        ClientCommand::StartLock(target) => Some((*target, true)),
        ClientCommand::StartScan(target) => Some((*target, false)),
        _ => None,
    };
    if let Some((target, needs_scope)) = target_check {
        let visible = world
            .contacts_for(ship_id)
            .into_iter()
            .any(|c| c.id == target && c.is_ship() && (!needs_scope || c.in_scope));
        if !visible {
            return Err(CommandError::InvalidTarget(target));
        }
    }

    let ship = world
        .ship_mut(ship_id)
        .ok_or(CommandError::ShipNotFound(ship_id))?;

    match command {
        ClientCommand::SetThrottle(value) => ship.set_throttle(value),
        ClientCommand::SetRudder(value) => ship.set_rudder(value),
        ClientCommand::StartJump => {
            if !ship.jump_drive.start() {
                return Err(CommandError::Unavailable("jump drive is not ready"));
            }
        }
        ClientCommand::StopJump => {
            if !ship.jump_drive.abort() {
                return Err(CommandError::Unavailable("no jump in progress"));
            }
        }
        ClientCommand::SetJumpDistance(ratio) => ship.jump_drive.set_distance_ratio(ratio),
        ClientCommand::AddWaypoint(position) => {
            if !position.is_finite() {
                return Err(CommandError::Unavailable("waypoint position is not finite"));
            }
            ship.waypoints.add(position);
        }
        ClientCommand::DeleteWaypoint(index) => {
            if !ship.waypoints.delete(index) {
                return Err(CommandError::WaypointNotFound(index));
            }
        }
        ClientCommand::StartScan(target) => {
            if !ship.start_scan(target) {
                return Err(CommandError::InvalidTarget(target));
            }
        }
        ClientCommand::AbortScan => ship.abort_scan(),
        ClientCommand::StartLock(target) => {
            if !ship.start_lock(target) {
                return Err(CommandError::InvalidTarget(target));
            }
        }
        ClientCommand::AbortLock => ship.abort_lock(),
        ClientCommand::ToggleShields => ship.shield.toggle(),
        ClientCommand::SetShieldModulation(value) => {
            ship.set_shield_modulation(Modulation::new(value))
        }
        ClientCommand::SetBeamModulation(value) => ship.set_beam_modulation(Modulation::new(value)),
        ClientCommand::ReloadTube(index) => {
            if index >= ship.tubes.len() {
                return Err(CommandError::TubeNotFound(index));
            }
            if !ship.reload_tube(index) {
                return Err(CommandError::Unavailable("tube cannot be reloaded"));
            }
        }
        ClientCommand::LaunchTube(index) => {
            if index >= ship.tubes.len() {
                return Err(CommandError::TubeNotFound(index));
            }
            if !ship.launch_tube(index) {
                return Err(CommandError::Unavailable("tube is not ready"));
            }
        }
        ClientCommand::SetPower { system, level } => {
            ship.power.set_level(system, level);
        }
        ClientCommand::StartRepair(system) => {
            if !ship.power.start_repair(system) {
                return Err(CommandError::Unavailable("repair not possible"));
            }
        }
        ClientCommand::SpawnShip { .. }
        | ClientCommand::JoinShip { .. }
        | ClientCommand::ExitShip
        | ClientCommand::ChangeStation(_)
        | ClientCommand::TogglePause => {}
    }
    Ok(())
}
