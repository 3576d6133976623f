// Spawning the world actor and the handle sessions use to reach it.

use crate::domain::scenario::ScenarioSettings;
use crate::use_cases::game::{Game, world_task};
use crate::use_cases::types::GameEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

/// Settings for the world actor.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Capacity for inbound client events.
    pub mailbox_capacity: usize,
    /// Fixed tick interval for the simulation.
    pub tick_interval: Duration,
    pub scenario: ScenarioSettings,
}

/// Cloneable access to a running world actor.
#[derive(Debug, Clone)]
pub struct GameHandle {
    /// Sender for events into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    shutdown: Arc<Notify>,
}

impl GameHandle {
    /// Populates a world and spawns its task on the current runtime.
    pub fn spawn(settings: &GameSettings) -> Self {
        let (input_tx, input_rx) = mpsc::channel::<GameEvent>(settings.mailbox_capacity);
        let shutdown = Arc::new(Notify::new());
        let game = Game::new(settings.tick_interval.as_secs_f32(), &settings.scenario);

        tokio::spawn(world_task(
            game,
            input_rx,
            settings.tick_interval,
            shutdown.clone(),
        ));

        Self { input_tx, shutdown }
    }

    /// Stops the world task after the message it is currently handling.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
