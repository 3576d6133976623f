// Use-case level messages into the world actor.

use crate::use_cases::commands::ClientCommand;
use crate::use_cases::snapshot::SnapshotFrame;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum GameEvent {
    Connect {
        client_id: u64,
    },
    Disconnect {
        client_id: u64,
    },
    Command {
        client_id: u64,
        command: ClientCommand,
    },
    /// Answered from the world as it is when the message is processed.
    Snapshot {
        client_id: u64,
        reply: oneshot::Sender<SnapshotFrame>,
    },
}
