// Use cases layer: the world actor and per-client workflows around it.

pub mod commands;
pub mod game;
pub mod handle;
pub mod session;
pub mod snapshot;
pub mod types;

pub use commands::{ClientCommand, ClientContext, CommandError, Station};
pub use handle::{GameHandle, GameSettings};
pub use session::SnapshotThrottle;
pub use snapshot::{SnapshotFrame, StationView};
pub use types::GameEvent;
