// World actor: the only place the world is mutated.

use super::types::GameEvent;
use crate::domain::World;
use crate::domain::scenario::{ScenarioSettings, populate};
use crate::use_cases::commands::{ClientContext, apply_command};
use crate::use_cases::snapshot::{SnapshotFrame, build_frame};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// World state plus the context of every connected client.
pub struct Game {
    world: World,
    clients: HashMap<u64, ClientContext>,
}

impl Game {
    pub fn new(dt: f32, scenario: &ScenarioSettings) -> Self {
        let mut world = World::new(dt);
        populate(&mut world, scenario);
        Self::from_world(world)
    }

    pub fn from_world(world: World) -> Self {
        Self {
            world,
            clients: HashMap::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn context(&self, client_id: u64) -> Option<ClientContext> {
        self.clients.get(&client_id).copied()
    }

    pub fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::Connect { client_id } => {
                info!(client_id, "client connected");
                self.clients.insert(client_id, ClientContext::default());
            }
            GameEvent::Disconnect { client_id } => {
                // Leaving releases the station; the ship stays in the world.
                if let Some(context) = self.clients.remove(&client_id) {
                    info!(client_id, ?context, "client disconnected");
                }
            }
            GameEvent::Command { client_id, command } => {
                let Some(context) = self.clients.get_mut(&client_id) else {
                    debug!(client_id, "command from unknown client dropped");
                    return;
                };
                if let Err(error) = apply_command(&mut self.world, context, command) {
                    debug!(client_id, %error, "command rejected");
                }
            }
            GameEvent::Snapshot { client_id, reply } => {
                let _ = reply.send(self.snapshot(client_id));
            }
        }
    }

    /// Builds the frame for `client_id`; unknown clients see ship selection.
    pub fn snapshot(&self, client_id: u64) -> SnapshotFrame {
        let context = self.context(client_id).unwrap_or_default();
        build_frame(&self.world, &context)
    }

    pub fn step(&mut self) {
        let report = self.world.step();
        for id in &report.destroyed {
            debug!(%id, tick = self.world.tick(), "object destroyed");
        }
    }
}

pub async fn world_task(
    mut game: Game,
    mut input_rx: mpsc::Receiver<GameEvent>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    // Drive the fixed-step loop; late ticks are dropped rather than bunched.
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {
                game.step();
            }
            event = input_rx.recv() => {
                match event {
                    Some(event) => game.handle(event),
                    None => break,
                }
            }
        }
    }

    info!(tick = game.world().tick(), "world task stopped");
}
