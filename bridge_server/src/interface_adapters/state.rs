use crate::use_cases::GameHandle;
use std::time::Duration;

/// Per-connection snapshot delivery settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    // How often a session asks the world for a fresh snapshot.
    pub snapshot_interval: Duration,
    // Unacknowledged snapshots allowed before sending pauses.
    pub max_in_flight: usize,
}

#[derive(Debug, Clone)]
pub struct AppState {
    // Mailbox access to the single world actor.
    pub game: GameHandle,
    pub session: SessionSettings,
}
