// Initial world population and scripted triggers.

use crate::domain::ObjectId;
use crate::domain::math::spiral_point;
use crate::domain::physics::Pose;
use crate::domain::ship::Faction;
use crate::domain::tuning::ShipClass;
use crate::domain::world::World;
use glam::Vec2;
use tracing::info;

const ASTEROID_SPACING: f32 = 260.0;
const PIRATE_BASE_DISTANCE: f32 = 2500.0;
const TRADER_BASE_DISTANCE: f32 = 1200.0;
const PATROL_RADIUS: f32 = 600.0;
/// Seconds without any pirate left before the next wave arrives.
pub const REINFORCEMENT_DELAY: f32 = 30.0;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioSettings {
    pub pirates: u32,
    pub traders: u32,
    pub asteroids: u32,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            pirates: 3,
            traders: 2,
            asteroids: 12,
        }
    }
}

/// Fills a fresh world. Placement is deterministic.
pub fn populate(world: &mut World, settings: &ScenarioSettings) {
    for i in 0..settings.asteroids {
        let radius = 15.0 + (i * 7 % 25) as f32;
        // Skip the innermost spiral slots so the player spawn area stays clear.
        world.spawn_asteroid(spiral_point(i + 4, ASTEROID_SPACING), radius);
    }

    for i in 0..settings.traders {
        let base = Vec2::from_angle(i as f32 * 2.4 + 1.0) * TRADER_BASE_DISTANCE;
        world.spawn_npc(
            format!("Trader {}", i + 1),
            ShipClass::Freighter,
            Faction::Trader,
            Pose::at(base, 0.0),
            patrol_square(base, PATROL_RADIUS),
        );
    }

    spawn_pirate_wave(world, settings.pirates, 0);

    if settings.pirates > 0 {
        world.add_trigger(Trigger::PirateReinforcements(Reinforcements::new(
            settings.pirates,
            REINFORCEMENT_DELAY,
        )));
    }

    info!(
        pirates = settings.pirates,
        traders = settings.traders,
        asteroids = settings.asteroids,
        "scenario populated"
    );
}

/// Where the `index`-th player ship appears.
pub fn player_spawn_point(index: u32) -> Vec2 {
    spiral_point(index, 60.0)
}

pub fn spawn_pirate_wave(world: &mut World, count: u32, wave: u32) -> Vec<ObjectId> {
    let base = Vec2::from_angle(wave as f32 * 2.4) * PIRATE_BASE_DISTANCE;
    (0..count)
        .map(|i| {
            let position = base + spiral_point(i, 60.0);
            world.spawn_npc(
                format!("Pirate {}-{}", wave + 1, i + 1),
                ShipClass::Corvette,
                Faction::Pirate,
                Pose::at(position, 0.0),
                patrol_square(base, PATROL_RADIUS),
            )
        })
        .collect()
}

fn patrol_square(center: Vec2, half_size: f32) -> Vec<Vec2> {
    vec![
        center + Vec2::new(half_size, half_size),
        center + Vec2::new(-half_size, half_size),
        center + Vec2::new(-half_size, -half_size),
        center + Vec2::new(half_size, -half_size),
    ]
}

/// Respawns a pirate wave once the map has been clear of pirates for `delay` seconds.
#[derive(Debug, Clone)]
pub struct Reinforcements {
    wave_size: u32,
    delay: f32,
    clear_for: f32,
    waves: u32,
}

impl Reinforcements {
    pub fn new(wave_size: u32, delay: f32) -> Self {
        Self {
            wave_size,
            delay,
            clear_for: 0.0,
            waves: 0,
        }
    }

    pub fn waves(&self) -> u32 {
        self.waves
    }

    fn evaluate(&mut self, world: &mut World, dt: f32) {
        if world.count_faction(Faction::Pirate) > 0 {
            self.clear_for = 0.0;
            return;
        }
        self.clear_for += dt;
        if self.clear_for < self.delay {
            return;
        }
        self.clear_for = 0.0;
        self.waves += 1;
        let spawned = spawn_pirate_wave(world, self.wave_size, self.waves);
        info!(wave = self.waves, ships = spawned.len(), "pirate reinforcements arrived");
    }
}

#[derive(Debug, Clone)]
pub enum Trigger {
    PirateReinforcements(Reinforcements),
}

impl Trigger {
    pub fn evaluate(&mut self, world: &mut World, dt: f32) {
        match self {
            Trigger::PirateReinforcements(r) => r.evaluate(world, dt),
        }
    }
}
