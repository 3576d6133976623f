// Authoritative world state and its fixed simulation step.
//
// Only the world actor holds a `World`; every mutation goes through it on the actor's task.

use crate::domain::ai::{Behavior, ShipAi, TurningProfile};
use crate::domain::combat::{LaunchOrder, Torpedo, damage_multiplier};
use crate::domain::contacts::{self, Contact, ContactKind, Observed};
use crate::domain::ids::IdAllocator;
use crate::domain::math::{heading_vector, local_to_world};
use crate::domain::physics::{BodyShape, PhysicsEngine, Pose};
use crate::domain::scenario::Trigger;
use crate::domain::ship::{Faction, Ship, ShipKind, Subsystem};
use crate::domain::tuning::{AiTuning, ShipClass, TorpedoTuning};
use crate::domain::ObjectId;
use glam::Vec2;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

const ASTEROID_DENSITY: f32 = 5.0;
/// Extra distance at which a torpedo counts as touching its victim.
const TORPEDO_HIT_MARGIN: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: ObjectId,
    pub pose: Pose,
    pub radius: f32,
}

pub enum WorldObject {
    Ship(Box<Ship>),
    Torpedo(Torpedo),
    Asteroid(Asteroid),
}

impl WorldObject {
    pub fn id(&self) -> ObjectId {
        match self {
            WorldObject::Ship(s) => s.id,
            WorldObject::Torpedo(t) => t.id,
            WorldObject::Asteroid(a) => a.id,
        }
    }

    pub fn pose(&self) -> Pose {
        match self {
            WorldObject::Ship(s) => s.pose,
            WorldObject::Torpedo(t) => t.pose,
            WorldObject::Asteroid(a) => a.pose,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            WorldObject::Ship(s) => s.radius(),
            WorldObject::Torpedo(t) => t.radius(),
            WorldObject::Asteroid(a) => a.radius,
        }
    }

    pub fn kind(&self) -> ContactKind {
        match self {
            WorldObject::Ship(_) => ContactKind::Ship,
            WorldObject::Torpedo(_) => ContactKind::Torpedo,
            WorldObject::Asteroid(_) => ContactKind::Asteroid,
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match self {
            WorldObject::Ship(s) => Some(&**s),
            _ => None,
        }
    }

    fn observed(&self) -> Observed {
        Observed {
            id: self.id(),
            kind: self.kind(),
            pose: self.pose(),
            faction: self.as_ship().map(|s| s.faction),
        }
    }
}

/// What happened during one step, for logging and client notices.
#[derive(Debug, Default)]
pub struct StepReport {
    pub destroyed: Vec<ObjectId>,
    pub launched: Vec<ObjectId>,
}

pub struct World {
    objects: BTreeMap<ObjectId, WorldObject>,
    ais: BTreeMap<ObjectId, ShipAi>,
    physics: PhysicsEngine,
    ids: IdAllocator,
    profiles: HashMap<ShipClass, TurningProfile>,
    ai_tuning: AiTuning,
    torpedo_tuning: TorpedoTuning,
    triggers: Vec<Trigger>,
    dt: f32,
    tick: u64,
    paused: bool,
}

impl World {
    pub fn new(dt: f32) -> Self {
        Self {
            objects: BTreeMap::new(),
            ais: BTreeMap::new(),
            physics: PhysicsEngine::new(),
            ids: IdAllocator::default(),
            profiles: HashMap::new(),
            ai_tuning: AiTuning::default(),
            torpedo_tuning: TorpedoTuning::default(),
            triggers: Vec::new(),
            dt,
            tick: 0,
            paused: false,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    pub fn spawn_ship(
        &mut self,
        name: impl Into<String>,
        class: ShipClass,
        kind: ShipKind,
        faction: Faction,
        pose: Pose,
    ) -> ObjectId {
        let id = self.ids.allocate();
        let ship = Ship::spawn(id, name, class, kind, faction, pose, &mut self.physics);
        self.objects.insert(id, WorldObject::Ship(Box::new(ship)));
        id
    }

    /// Spawns a non-player ship driven by its own AI along `patrol_path`.
    pub fn spawn_npc(
        &mut self,
        name: impl Into<String>,
        class: ShipClass,
        faction: Faction,
        pose: Pose,
        patrol_path: Vec<Vec2>,
    ) -> ObjectId {
        let id = self.spawn_ship(name, class, ShipKind::NonPlayer, faction, pose);
        let dt = self.dt;
        let profile = self
            .profiles
            .entry(class)
            .or_insert_with(|| TurningProfile::measure(class, dt))
            .clone();
        self.ais
            .insert(id, ShipAi::new(profile, patrol_path, self.ai_tuning));
        id
    }

    pub fn spawn_asteroid(&mut self, position: Vec2, radius: f32) -> ObjectId {
        let id = self.ids.allocate();
        let pose = Pose::at(position, 0.0);
        self.physics
            .add_body(id, BodyShape::Circle { radius }, ASTEROID_DENSITY, pose);
        self.objects
            .insert(id, WorldObject::Asteroid(Asteroid { id, pose, radius }));
        id
    }

    /// Removes an object and every weak reference other ships hold to it.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if self.objects.remove(&id).is_none() {
            return false;
        }
        self.physics.remove_body(id);
        self.ais.remove(&id);
        for object in self.objects.values_mut() {
            if let WorldObject::Ship(ship) = object {
                ship.forget_target(id);
            }
        }
        true
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    pub fn ship(&self, id: ObjectId) -> Option<&Ship> {
        self.objects.get(&id).and_then(WorldObject::as_ship)
    }

    pub fn ship_mut(&mut self, id: ObjectId) -> Option<&mut Ship> {
        match self.objects.get_mut(&id) {
            Some(WorldObject::Ship(ship)) => Some(&mut **ship),
            _ => None,
        }
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.objects.values().filter_map(WorldObject::as_ship)
    }

    pub fn count_faction(&self, faction: Faction) -> usize {
        self.ships().filter(|s| s.faction == faction).count()
    }

    pub fn behavior_of(&self, id: ObjectId) -> Option<Behavior> {
        self.ais.get(&id).map(ShipAi::behavior)
    }

    /// Sensor picture of `observer`, nearest first. Empty when the observer is gone.
    pub fn contacts_for(&self, observer: ObjectId) -> Vec<Contact> {
        let Some(ship) = self.ship(observer) else {
            return Vec::new();
        };
        contacts::observe(ship, self.objects.values().map(WorldObject::observed))
    }

    /// Advances the world by one fixed step unless paused.
    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport::default();
        if self.paused {
            return report;
        }
        let dt = self.dt;
        self.tick += 1;

        self.physics.step(dt);

        let mut expired = Vec::new();
        let mut launches: Vec<(ObjectId, LaunchOrder)> = Vec::new();
        for object in self.objects.values_mut() {
            match object {
                WorldObject::Torpedo(torpedo) => {
                    if !torpedo.update(dt, &mut self.physics) {
                        expired.push(torpedo.id);
                    }
                }
                WorldObject::Ship(ship) => {
                    let out = ship.update(dt, &mut self.physics);
                    if let Some(distance) = out.jumped {
                        debug!(ship_id = %ship.id, distance, "jump completed");
                    }
                    if let Some(target) = out.scanned {
                        debug!(ship_id = %ship.id, target = %target, "scan completed");
                    }
                    launches.extend(out.launches.into_iter().map(|order| (ship.id, order)));
                }
                WorldObject::Asteroid(asteroid) => {
                    if let Some(pose) = self.physics.pose(asteroid.id) {
                        asteroid.pose = pose;
                    }
                }
            }
        }

        self.update_ais(dt);
        self.resolve_beams(dt);

        for (owner, order) in launches {
            if let Some(id) = self.launch_torpedo(owner, order) {
                report.launched.push(id);
            }
        }
        self.resolve_torpedo_hits(&mut expired);

        let wrecked = self
            .ships()
            .filter(|s| s.is_destroyed())
            .map(|s| s.id)
            .collect::<Vec<_>>();
        for id in &wrecked {
            if let Some(ship) = self.ship(*id) {
                info!(ship_id = %id, name = %ship.name, "ship destroyed");
            }
        }
        for id in expired.into_iter().chain(wrecked) {
            if self.remove(id) {
                report.destroyed.push(id);
            }
        }

        let mut triggers = std::mem::take(&mut self.triggers);
        for trigger in &mut triggers {
            trigger.evaluate(self, dt);
        }
        triggers.append(&mut self.triggers);
        self.triggers = triggers;

        report
    }

    fn update_ais(&mut self, dt: f32) {
        // Contacts are built from the state before any AI acts this tick.
        let pictures: Vec<(ObjectId, Vec<Contact>)> = self
            .ais
            .keys()
            .map(|id| (*id, self.contacts_for(*id)))
            .collect();

        for (id, contacts) in pictures {
            let (Some(ai), Some(WorldObject::Ship(ship))) =
                (self.ais.get_mut(&id), self.objects.get_mut(&id))
            else {
                continue;
            };
            ai.update(dt, ship, &contacts);
        }
    }

    fn resolve_beams(&mut self, dt: f32) {
        let mut hits: Vec<(ObjectId, Vec2, f32)> = Vec::new();
        let ids: Vec<ObjectId> = self.ships().map(|s| s.id).collect();

        for id in ids {
            let engagements = self.beam_engagements(id);
            let Some(ship) = self.ship_mut(id) else {
                continue;
            };
            let boost = ship.power.boost(Subsystem::Weapons);
            let source = ship.pose.position;
            let target = ship.locked_target();
            for (beam, engagement) in ship.beams.iter_mut().zip(engagements) {
                if let (Some(damage), Some(target)) = (beam.update(dt, boost, engagement), target) {
                    hits.push((target, source, damage));
                }
            }
        }

        for (target, source, damage) in hits {
            if let Some(ship) = self.ship_mut(target) {
                ship.take_damage(damage, Some(source));
            }
        }
    }

    /// Per-beam damage multiplier if the beam may fire at the locked target this tick.
    fn beam_engagements(&self, id: ObjectId) -> Vec<Option<f32>> {
        let Some(ship) = self.ship(id) else {
            return Vec::new();
        };
        let target = ship.locked_target().and_then(|t| self.ship(t));

        ship.beams
            .iter()
            .map(|beam| {
                let target = target?;
                let aim = target.pose.position;
                if !beam.covers(&ship.pose, aim) {
                    return None;
                }
                let ignore = HashSet::from([ship.id, target.id]);
                if !self
                    .physics
                    .raycast_obstructions(beam.origin(&ship.pose), aim, &ignore)
                    .is_empty()
                {
                    return None;
                }
                Some(damage_multiplier(target.shield.modulation(), beam.modulation()))
            })
            .collect()
    }

    fn launch_torpedo(&mut self, owner: ObjectId, order: LaunchOrder) -> Option<ObjectId> {
        let ship = self.ship(owner)?;
        let tuning = self.torpedo_tuning;
        let rotation = ship.pose.rotation + order.mount.orientation;
        let heading = heading_vector(rotation);
        let position = local_to_world(ship.pose.position, ship.pose.rotation, order.mount.offset)
            + heading * (tuning.radius * 2.0);
        let pose = Pose {
            position,
            rotation,
            velocity: ship.pose.velocity + heading * tuning.launch_speed,
            angular_velocity: 0.0,
        };
        let faction = ship.faction;

        let id = self.ids.allocate();
        let torpedo = Torpedo::launch(id, owner, faction, pose, tuning, &mut self.physics);
        self.objects.insert(id, WorldObject::Torpedo(torpedo));
        debug!(ship_id = %owner, torpedo_id = %id, "torpedo launched");
        Some(id)
    }

    fn resolve_torpedo_hits(&mut self, expired: &mut Vec<ObjectId>) {
        let mut hits: Vec<(ObjectId, ObjectId, f32, Vec2)> = Vec::new();
        for object in self.objects.values() {
            let WorldObject::Torpedo(torpedo) = object else {
                continue;
            };
            let at = torpedo.pose.position;
            let struck = self.objects.values().find(|other| {
                !matches!(other, WorldObject::Torpedo(_))
                    && other.id() != torpedo.owner
                    && other.pose().position.distance(at)
                        <= other.radius() + torpedo.radius() + TORPEDO_HIT_MARGIN
            });
            if let Some(struck) = struck {
                hits.push((torpedo.id, struck.id(), torpedo.damage(), at));
            }
        }

        for (torpedo, target, damage, at) in hits {
            expired.push(torpedo);
            if let Some(ship) = self.ship_mut(target) {
                let hull = ship.take_damage(damage, Some(at));
                debug!(ship_id = %target, torpedo_id = %torpedo, hull_damage = hull, "torpedo hit");
            }
        }
    }
}
