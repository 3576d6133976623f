// Ship domain model: command state, smoothed thrust and the owned subsystem handlers.

pub mod faction;
pub mod jump;
pub mod power;
pub mod progress;
pub mod shield;
pub mod waypoints;

pub use faction::{Faction, ScanLevel};
pub use jump::{JumpDrive, JumpState};
pub use power::{PowerHandler, Subsystem};
pub use progress::{LockHandler, ProgressHandler, ScanHandler};
pub use shield::ShieldHandler;
pub use waypoints::Waypoints;

use crate::domain::ObjectId;
use crate::domain::combat::{BeamHandler, LaunchOrder, Magazine, TubeHandler};
use crate::domain::math::{angle_diff, bearing, heading_vector};
use crate::domain::physics::{BodyShape, PhysicsEngine, Pose};
use crate::domain::tuning::{ShipClass, ShipTuning};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Maximum number of trail samples kept for scope rendering.
pub const TRAIL_LENGTH: usize = 10;
/// Minimum seconds between two trail samples.
pub const TRAIL_INTERVAL: f32 = 1.0;

pub const MAX_COMMAND: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipKind {
    Player,
    NonPlayer,
}

/// Moves `current` toward `target` by at most `rate * dt`, clamped to the command range.
pub fn smooth_thrust(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let max_step = rate * dt;
    let next = current + (target - current).clamp(-max_step, max_step);
    next.clamp(-MAX_COMMAND, MAX_COMMAND)
}

fn sanitize_command(value: f32) -> Option<f32> {
    value
        .is_finite()
        .then(|| value.clamp(-MAX_COMMAND, MAX_COMMAND))
}

/// Side effects of one ship update that the world has to act on.
#[derive(Debug, Default)]
pub struct ShipUpdate {
    pub launches: Vec<LaunchOrder>,
    pub jumped: Option<f32>,
    pub scanned: Option<ObjectId>,
}

pub struct Ship {
    pub id: ObjectId,
    pub name: String,
    pub class: ShipClass,
    pub kind: ShipKind,
    pub faction: Faction,
    pub pose: Pose,
    tuning: ShipTuning,

    throttle: f32,
    rudder: f32,
    thrust: f32,
    hull: f32,

    pub shield: ShieldHandler,
    pub jump_drive: JumpDrive,
    pub power: PowerHandler,
    pub beams: Vec<BeamHandler>,
    pub tubes: Vec<TubeHandler>,
    pub magazine: Magazine,
    pub waypoints: Waypoints,

    lock: Option<LockHandler>,
    scan: Option<ScanHandler>,
    scan_levels: HashMap<ObjectId, ScanLevel>,

    trail: VecDeque<Vec2>,
    since_trail_sample: f32,
}

impl Ship {
    /// Builds a ship of `class` and registers its body with the physics engine.
    pub fn spawn(
        id: ObjectId,
        name: impl Into<String>,
        class: ShipClass,
        kind: ShipKind,
        faction: Faction,
        pose: Pose,
        physics: &mut PhysicsEngine,
    ) -> Self {
        let tuning = class.tuning();
        physics.add_body(
            id,
            BodyShape::Circle {
                radius: tuning.radius,
            },
            tuning.density,
            pose,
        );

        let beams = tuning
            .beams
            .iter()
            .map(|m| BeamHandler::new(*m, tuning.beam_firing_speed, tuning.beam_recharge_speed))
            .collect();
        let tubes = tuning
            .tubes
            .iter()
            .map(|m| TubeHandler::new(*m, tuning.tube_reload_speed))
            .collect();

        Self {
            id,
            name: name.into(),
            class,
            kind,
            faction,
            pose,
            throttle: 0.0,
            rudder: 0.0,
            thrust: 0.0,
            hull: tuning.max_hull,
            shield: ShieldHandler::new(tuning.shield),
            jump_drive: JumpDrive::new(tuning.jump),
            power: PowerHandler::new(tuning.repair_speed),
            beams,
            tubes,
            magazine: Magazine::new(tuning.magazine_capacity),
            waypoints: Waypoints::default(),
            lock: None,
            scan: None,
            scan_levels: HashMap::new(),
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            since_trail_sample: 0.0,
            tuning,
        }
    }

    pub fn tuning(&self) -> &ShipTuning {
        &self.tuning
    }

    pub fn radius(&self) -> f32 {
        self.tuning.radius
    }

    pub fn sensor_range(&self) -> f32 {
        self.tuning.sensor_range
    }

    pub fn scope_range(&self) -> f32 {
        self.tuning.scope_range
    }

    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    pub fn rudder(&self) -> f32 {
        self.rudder
    }

    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    /// Non-finite input is ignored; everything else is clamped to `[-100, 100]`.
    pub fn set_throttle(&mut self, value: f32) {
        if let Some(v) = sanitize_command(value) {
            self.throttle = v;
        }
    }

    pub fn set_rudder(&mut self, value: f32) {
        if let Some(v) = sanitize_command(value) {
            self.rudder = v;
        }
    }

    pub fn hull(&self) -> f32 {
        self.hull
    }

    pub fn max_hull(&self) -> f32 {
        self.tuning.max_hull
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull <= 0.0
    }

    pub fn trail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.trail.iter().copied()
    }

    pub fn lock(&self) -> Option<&LockHandler> {
        self.lock.as_ref()
    }

    /// Target of a completed lock, if any.
    pub fn locked_target(&self) -> Option<ObjectId> {
        self.lock
            .as_ref()
            .filter(|l| l.is_complete())
            .map(|l| l.target())
    }

    /// Starts locking onto `target`. Re-locking the current target keeps its progress.
    pub fn start_lock(&mut self, target: ObjectId) -> bool {
        if target == self.id {
            return false;
        }
        if self.lock.as_ref().is_some_and(|l| l.target() == target) {
            return true;
        }
        self.lock = Some(LockHandler::new(target, self.tuning.lock_speed));
        true
    }

    pub fn abort_lock(&mut self) {
        self.lock = None;
    }

    pub fn scan(&self) -> Option<&ScanHandler> {
        self.scan.as_ref()
    }

    /// Starts scanning `target` unless it is already fully known.
    pub fn start_scan(&mut self, target: ObjectId) -> bool {
        if target == self.id {
            return false;
        }
        let level = self.scan_level(target);
        if level.next() == level {
            return false;
        }
        if self.scan.as_ref().is_some_and(|s| s.target() == target) {
            return true;
        }
        self.scan = Some(ScanHandler::new(target, self.tuning.scan_speed));
        true
    }

    pub fn abort_scan(&mut self) {
        self.scan = None;
    }

    pub fn scan_level(&self, target: ObjectId) -> ScanLevel {
        self.scan_levels.get(&target).copied().unwrap_or_default()
    }

    /// Drops lock/scan handlers whose target is no longer in the world.
    pub fn forget_target(&mut self, target: ObjectId) {
        if self.lock.as_ref().is_some_and(|l| l.target() == target) {
            self.lock = None;
        }
        if self.scan.as_ref().is_some_and(|s| s.target() == target) {
            self.scan = None;
        }
        self.scan_levels.remove(&target);
    }

    pub fn set_shield_modulation(&mut self, modulation: crate::domain::combat::Modulation) {
        self.shield.set_modulation(modulation);
    }

    pub fn set_beam_modulation(&mut self, modulation: crate::domain::combat::Modulation) {
        for beam in &mut self.beams {
            beam.set_modulation(modulation);
        }
    }

    /// Starts reloading tube `index` from the shared magazine.
    pub fn reload_tube(&mut self, index: usize) -> bool {
        match self.tubes.get_mut(index) {
            Some(tube) => tube.request_reload(&mut self.magazine),
            None => false,
        }
    }

    pub fn launch_tube(&mut self, index: usize) -> bool {
        self.tubes
            .get_mut(index)
            .is_some_and(|tube| tube.request_launch())
    }

    /// Fixed-step update. Expects the physics engine to have been stepped already.
    pub fn update(&mut self, dt: f32, physics: &mut PhysicsEngine) -> ShipUpdate {
        let mut out = ShipUpdate::default();

        // (1) progress handlers and subsystems
        self.power.update(dt);
        self.shield.update(dt, self.power.boost(Subsystem::Shields));
        if let Some(lock) = self.lock.as_mut() {
            lock.update(dt, 1.0);
        }
        if let Some(scan) = self.scan.as_mut() {
            scan.update(dt, 1.0);
            if scan.is_complete() {
                let target = scan.target();
                let level = self.scan_level(target).next();
                self.scan_levels.insert(target, level);
                self.scan = None;
                out.scanned = Some(target);
            }
        }
        if let Some(distance) = self
            .jump_drive
            .update(dt, self.power.boost(Subsystem::Jump))
        {
            physics.teleport(self.id, heading_vector(self.pose.rotation) * distance);
            out.jumped = Some(distance);
        }
        let weapons_boost = self.power.boost(Subsystem::Weapons);
        for tube in &mut self.tubes {
            if let Some(order) = tube.update(dt, weapons_boost) {
                out.launches.push(order);
            }
        }

        // (2) engines follow the throttle
        self.thrust = smooth_thrust(
            self.thrust,
            self.throttle,
            self.tuning.thrust_responsiveness,
            dt,
        );
        let factor = if self.thrust >= 0.0 {
            self.tuning.ahead_thrust_factor
        } else {
            self.tuning.reverse_thrust_factor
        };
        let effective_thrust = self.thrust * factor * self.power.boost(Subsystem::Impulse);
        let effective_rudder = self.rudder * self.tuning.rudder_factor;

        // (3) forward to physics, (4) pull the pose back
        physics.apply_force_torque(self.id, effective_thrust, effective_rudder);
        if let Some(pose) = physics.pose(self.id) {
            self.pose = pose;
        }

        // (5) trail
        self.since_trail_sample += dt;
        if self.trail.is_empty() || self.since_trail_sample >= TRAIL_INTERVAL {
            self.trail.push_back(self.pose.position);
            self.since_trail_sample = 0.0;
            while self.trail.len() > TRAIL_LENGTH {
                self.trail.pop_front();
            }
        }

        out
    }

    /// Runs damage through shield then hull. `source` picks the subsystem hit by overflow.
    /// Returns the hull damage taken.
    pub fn take_damage(&mut self, damage: f32, source: Option<Vec2>) -> f32 {
        let overflow = self.shield.absorb(damage);
        if overflow <= 0.0 {
            return 0.0;
        }
        self.hull = (self.hull - overflow).max(0.0);

        if let Some(source) = source {
            let relative = angle_diff(self.pose.rotation, bearing(self.pose.position, source));
            let system = Subsystem::facing(relative);
            self.power.damage(system, overflow / self.tuning.max_hull);
        }
        overflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 0.25;

    fn cruiser(physics: &mut PhysicsEngine) -> Ship {
        Ship::spawn(
            ObjectId::from_raw(1),
            "Argo",
            ShipClass::Cruiser,
            ShipKind::Player,
            Faction::Federation,
            Pose::default(),
            physics,
        )
    }

    fn step(ship: &mut Ship, physics: &mut PhysicsEngine, dt: f32) -> ShipUpdate {
        physics.step(dt);
        ship.update(dt, physics)
    }

    #[test]
    fn when_throttle_set_from_rest_then_thrust_follows_responsiveness() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        ship.set_throttle(100.0);
        let rate = ship.tuning().thrust_responsiveness;

        let mut elapsed = 0.0;
        for _ in 0..24 {
            step(&mut ship, &mut physics, DT);
            elapsed += DT;
            assert_eq!(ship.thrust(), (rate * elapsed).min(100.0));
        }
    }

    #[test]
    fn when_throttle_out_of_range_or_nan_then_command_is_clamped_or_ignored() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);

        ship.set_throttle(250.0);
        assert_eq!(ship.throttle(), 100.0);
        ship.set_rudder(-900.0);
        assert_eq!(ship.rudder(), -100.0);
        ship.set_throttle(f32::NAN);
        assert_eq!(ship.throttle(), 100.0);
    }

    #[test]
    fn when_ship_thrusts_ahead_then_it_moves_along_its_nose() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        ship.set_throttle(100.0);

        for _ in 0..20 {
            step(&mut ship, &mut physics, DT);
        }

        assert!(ship.pose.position.x > 10.0);
        assert!(ship.pose.velocity.x > 0.0);
    }

    #[test]
    fn when_many_seconds_pass_then_trail_is_bounded_and_spaced() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        ship.set_throttle(100.0);

        for _ in 0..(4 * 30) {
            step(&mut ship, &mut physics, DT);
        }

        assert_eq!(ship.trail().count(), TRAIL_LENGTH);
    }

    #[test]
    fn when_jump_completes_then_ship_is_moved_forward_by_selected_distance() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        ship.jump_drive.set_distance_ratio(0.0);
        assert!(ship.jump_drive.start());

        let mut jumped = None;
        for _ in 0..8 {
            let out = step(&mut ship, &mut physics, DT);
            jumped = jumped.or(out.jumped);
        }

        assert_eq!(jumped, Some(500.0));
        assert!(ship.pose.position.x >= 499.0);
    }

    #[test]
    fn when_scan_completes_then_level_advances_and_never_regresses() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        let target = ObjectId::from_raw(2);
        assert!(ship.start_scan(target));

        let mut scanned = None;
        for _ in 0..30 {
            let out = step(&mut ship, &mut physics, DT);
            scanned = scanned.or(out.scanned);
        }

        assert_eq!(scanned, Some(target));
        assert_eq!(ship.scan_level(target), ScanLevel::Faction);
        assert!(ship.scan().is_none());
        assert!(!ship.start_scan(target));
    }

    #[test]
    fn when_lock_runs_long_enough_then_target_is_locked() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        let target = ObjectId::from_raw(2);
        ship.start_lock(target);

        for _ in 0..16 {
            step(&mut ship, &mut physics, DT);
        }

        assert_eq!(ship.locked_target(), Some(target));
        assert!(!ship.start_lock(ship.id));
    }

    #[test]
    fn when_unshielded_hit_from_front_then_hull_and_weapons_take_damage() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);

        let hull_damage = ship.take_damage(20.0, Some(Vec2::new(100.0, 0.0)));

        assert_eq!(hull_damage, 20.0);
        assert_eq!(ship.hull(), 80.0);
        assert!(ship.power.health(Subsystem::Weapons) < 1.0);
        assert_eq!(ship.power.health(Subsystem::Impulse), 1.0);
    }

    #[test]
    fn when_shield_absorbs_everything_then_hull_is_untouched() {
        let mut physics = PhysicsEngine::new();
        let mut ship = cruiser(&mut physics);
        ship.shield.raise();

        assert_eq!(ship.take_damage(10.0, None), 0.0);
        assert_eq!(ship.hull(), ship.max_hull());
    }

    proptest! {
        #[test]
        fn thrust_converges_monotonically_and_stays_in_range(
            start in -100.0f32..=100.0,
            target in -100.0f32..=100.0,
            dt in 0.001f32..1.0,
        ) {
            let mut thrust = start;
            let mut previous_gap = (target - thrust).abs();
            for _ in 0..200 {
                thrust = smooth_thrust(thrust, target, 25.0, dt);
                let gap = (target - thrust).abs();
                prop_assert!(gap <= previous_gap + 1e-4);
                prop_assert!((-100.0..=100.0).contains(&thrust));
                previous_gap = gap;
            }
        }
    }
}
