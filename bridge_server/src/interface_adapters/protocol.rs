// Wire protocol DTOs and conversions for bridge client messages.

use crate::domain::ObjectId;
use crate::domain::ship::Subsystem;
use crate::use_cases::snapshot::StationView;
use crate::use_cases::{ClientCommand, Station};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Assigned identity for the connection, sent once right after upgrade.
    Identity {
        client_id: String,
    },
    // Station view for the client's current context; `counter` must be acknowledged.
    Snapshot {
        counter: u64,
        paused: bool,
        view: StationView,
    },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Ack { counter: u64 },

    SpawnShip { name: String },
    JoinShip { ship_id: u64, station: Station },
    ExitShip,
    ChangeStation { station: Station },
    TogglePause,

    SetThrottle { value: f32 },
    SetRudder { value: f32 },
    StartJump,
    StopJump,

    SetJumpDistance { ratio: f32 },
    AddWaypoint { x: f32, y: f32 },
    DeleteWaypoint { index: u32 },
    StartScan { target: u64 },
    AbortScan,

    StartLock { target: u64 },
    AbortLock,
    ToggleShields,
    SetShieldModulation { value: u8 },
    SetBeamModulation { value: u8 },
    ReloadTube { tube: usize },
    LaunchTube { tube: usize },

    SetPower { system: Subsystem, level: u32 },
    StartRepair { system: Subsystem },
}

/// What an inbound message asks the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientIntent {
    Ack(u64),
    Command(ClientCommand),
}

impl From<ClientMessage> for ClientIntent {
    fn from(message: ClientMessage) -> Self {
        use ClientMessage as M;
        let command = match message {
            M::Ack { counter } => return ClientIntent::Ack(counter),
            M::SpawnShip { name } => ClientCommand::SpawnShip { name },
            M::JoinShip { ship_id, station } => ClientCommand::JoinShip {
                ship_id: ObjectId::from_raw(ship_id),
                station,
            },
            M::ExitShip => ClientCommand::ExitShip,
            M::ChangeStation { station } => ClientCommand::ChangeStation(station),
            M::TogglePause => ClientCommand::TogglePause,
            M::SetThrottle { value } => ClientCommand::SetThrottle(value),
            M::SetRudder { value } => ClientCommand::SetRudder(value),
            M::StartJump => ClientCommand::StartJump,
            M::StopJump => ClientCommand::StopJump,
            M::SetJumpDistance { ratio } => ClientCommand::SetJumpDistance(ratio),
            M::AddWaypoint { x, y } => ClientCommand::AddWaypoint(Vec2::new(x, y)),
            M::DeleteWaypoint { index } => ClientCommand::DeleteWaypoint(index),
            M::StartScan { target } => ClientCommand::StartScan(ObjectId::from_raw(target)),
            M::AbortScan => ClientCommand::AbortScan,
            M::StartLock { target } => ClientCommand::StartLock(ObjectId::from_raw(target)),
            M::AbortLock => ClientCommand::AbortLock,
            M::ToggleShields => ClientCommand::ToggleShields,
            M::SetShieldModulation { value } => ClientCommand::SetShieldModulation(value),
            M::SetBeamModulation { value } => ClientCommand::SetBeamModulation(value),
            M::ReloadTube { tube } => ClientCommand::ReloadTube(tube),
            M::LaunchTube { tube } => ClientCommand::LaunchTube(tube),
            M::SetPower { system, level } => ClientCommand::SetPower { system, level },
            M::StartRepair { system } => ClientCommand::StartRepair(system),
        };
        ClientIntent::Command(command)
    }
}
