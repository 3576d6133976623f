// Rigid-body integration layer backed by rapier2d.
//
// Owns one dynamic body per ship/torpedo/asteroid keyed by `ObjectId`. Knows nothing about
// game rules: callers push effective thrust/rudder in and pull poses back out.

use crate::domain::ObjectId;
use glam::Vec2;
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryFilter, QueryPipeline, Ray, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
    Point, Vector,
};
use std::collections::{HashMap, HashSet};

/// Linear damping applied uniformly to every body.
pub const LINEAR_DAMPING: f32 = 0.5;
/// Angular damping applied uniformly to every body.
pub const ANGULAR_DAMPING: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle { radius: f32 },
}

impl BodyShape {
    pub fn radius(&self) -> f32 {
        match self {
            BodyShape::Circle { radius } => *radius,
        }
    }
}

/// Position/orientation snapshot of a body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

impl Pose {
    pub fn at(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }
}

struct BodyEntry {
    handle: RigidBodyHandle,
    radius: f32,
}

pub struct PhysicsEngine {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    bodies: HashMap<ObjectId, BodyEntry>,
    collider_to_object: HashMap<ColliderHandle, ObjectId>,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: Vector::new(0.0, 0.0),
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            bodies: HashMap::new(),
            collider_to_object: HashMap::new(),
        }
    }

    /// Adds a dynamic body. Re-adding an existing id is a no-op.
    pub fn add_body(&mut self, id: ObjectId, shape: BodyShape, density: f32, pose: Pose) {
        if self.bodies.contains_key(&id) {
            return;
        }

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(pose.position.x, pose.position.y))
            .rotation(pose.rotation)
            .linvel(Vector::new(pose.velocity.x, pose.velocity.y))
            .angvel(pose.angular_velocity)
            .linear_damping(LINEAR_DAMPING)
            .angular_damping(ANGULAR_DAMPING)
            .can_sleep(false)
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = match shape {
            BodyShape::Circle { radius } => ColliderBuilder::ball(radius).density(density).build(),
        };
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.collider_to_object.insert(collider_handle, id);
        self.bodies.insert(
            id,
            BodyEntry {
                handle,
                radius: shape.radius(),
            },
        );
    }

    pub fn remove_body(&mut self, id: ObjectId) {
        let Some(entry) = self.bodies.remove(&id) else {
            return;
        };
        self.rigid_body_set.remove(
            entry.handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.collider_to_object.retain(|_, owner| *owner != id);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Replaces the body's persistent force/torque.
    ///
    /// `thrust` is a forward acceleration along the body heading and `rudder` an angular
    /// acceleration; both are scaled by the body's mass and inertia here.
    pub fn apply_force_torque(&mut self, id: ObjectId, thrust: f32, rudder: f32) {
        let Some(entry) = self.bodies.get(&id) else {
            return;
        };
        let radius = entry.radius;
        let Some(rb) = self.rigid_body_set.get_mut(entry.handle) else {
            return;
        };

        let mass = rb.mass();
        let inertia = 0.5 * mass * radius * radius;
        let angle = rb.rotation().angle();
        let forward = Vector::new(angle.cos(), angle.sin());

        rb.reset_forces(true);
        rb.reset_torques(true);
        rb.add_force(forward * (thrust * mass), true);
        rb.add_torque(rudder * inertia, true);
    }

    pub fn set_velocity(&mut self, id: ObjectId, velocity: Vec2) {
        if let Some(rb) = self.body_mut(id) {
            rb.set_linvel(Vector::new(velocity.x, velocity.y), true);
        }
    }

    pub fn set_rotational_velocity(&mut self, id: ObjectId, angular_velocity: f32) {
        if let Some(rb) = self.body_mut(id) {
            rb.set_angvel(angular_velocity, true);
        }
    }

    /// Moves a body by `delta` without touching its velocity.
    pub fn teleport(&mut self, id: ObjectId, delta: Vec2) {
        if let Some(rb) = self.body_mut(id) {
            let current = *rb.translation();
            rb.set_translation(current + Vector::new(delta.x, delta.y), true);
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.integration_params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Returns `None` for bodies that were never added or already removed.
    pub fn pose(&self, id: ObjectId) -> Option<Pose> {
        let entry = self.bodies.get(&id)?;
        let rb = self.rigid_body_set.get(entry.handle)?;
        let t = rb.translation();
        let v = rb.linvel();
        Some(Pose {
            position: Vec2::new(t.x, t.y),
            rotation: rb.rotation().angle(),
            velocity: Vec2::new(v.x, v.y),
            angular_velocity: rb.angvel(),
        })
    }

    /// Objects whose colliders intersect the segment `from -> to`, nearest first.
    ///
    /// Bodies added since the last `step` are not yet visible to the query.
    pub fn raycast_obstructions(
        &self,
        from: Vec2,
        to: Vec2,
        ignore: &HashSet<ObjectId>,
    ) -> Vec<ObjectId> {
        let dir = to - from;
        if dir.length_squared() <= f32::EPSILON {
            return Vec::new();
        }

        let ray = Ray::new(Point::new(from.x, from.y), Vector::new(dir.x, dir.y));
        let mut hits: Vec<(f32, ObjectId)> = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            1.0,
            true,
            QueryFilter::default(),
            |handle, _| {
                if let Some(id) = self.collider_to_object.get(&handle) {
                    if !ignore.contains(id) {
                        let distance = self
                            .pose(*id)
                            .map(|p| p.position.distance(from))
                            .unwrap_or(f32::MAX);
                        hits.push((distance, *id));
                    }
                }
                true
            },
        );

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.dedup_by_key(|(_, id)| *id);
        hits.into_iter().map(|(_, id)| id).collect()
    }

    fn body_mut(&mut self, id: ObjectId) -> Option<&mut rapier2d::prelude::RigidBody> {
        let entry = self.bodies.get(&id)?;
        self.rigid_body_set.get_mut(entry.handle)
    }
}
