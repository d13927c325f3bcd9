//! Fixed-step physics system
//!
//! Each step integrates every active body carrying both a Transform and a
//! RigidBody, then tests all unordered pairs of those bodies once, in
//! ascending entity order. Only the first collider of a body takes part in
//! the narrow phase.
//!
//! Resolution is sequential: a pair sees the corrections applied by the pairs
//! before it, so multi-body stacks depend on entity order.

use super::collision::{Contact, Ray, WorldSpaceShape};
use super::config::PhysicsConfig;
use crate::ecs::components::{RigidBody, Transform};
use crate::ecs::{Component, ComponentKind, Entity, System, World};
use crate::events::{SubscriptionId, Subscribers};
use crate::foundation::math::Vec3;
use crate::foundation::time::FixedTimestep;

/// A contact reported to collision observers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Lower-ordered participant
    pub entity_a: Entity,
    /// Higher-ordered participant
    pub entity_b: Entity,
    /// Contact point in world space
    pub point: Vec3,
    /// Unit contact normal
    ///
    /// Sphere pairs point from `entity_a` toward `entity_b`, box pairs point
    /// toward `entity_a`, and sphere–box pairs point from the box surface
    /// toward the sphere centre.
    pub normal: Vec3,
    /// Penetration depth at detection time
    pub depth: f32,
    /// Whether either collider is a trigger (no response was applied)
    pub is_trigger: bool,
}

/// Nearest collider hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Entity owning the collider
    pub entity: Entity,
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Collision-relevant state of one body, read before a pair is resolved
struct BodySnapshot {
    shape: WorldSpaceShape,
    is_trigger: bool,
    is_static: bool,
    mass: f32,
    velocity: Vec3,
}

impl BodySnapshot {
    fn read(world: &World, entity: Entity) -> Option<Self> {
        let body = world.get_component::<RigidBody>(entity)?;
        if !body.is_enabled() {
            return None;
        }
        let collider = body.primary_collider()?;
        let position = world.world_position(entity)?;
        Some(Self {
            shape: collider.to_world_space(position),
            is_trigger: collider.is_trigger,
            is_static: body.is_static(),
            mass: if body.is_static() { 0.0 } else { body.mass() },
            velocity: body.velocity(),
        })
    }
}

const REQUIRED: [ComponentKind; 2] = [ComponentKind::Transform, ComponentKind::RigidBody];

/// Rigid-body simulation driver
pub struct PhysicsSystem {
    config: PhysicsConfig,
    timestep: FixedTimestep,
    callbacks: Subscribers<CollisionInfo>,
    contacts: Vec<CollisionInfo>,
    priority: i32,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl std::fmt::Debug for PhysicsSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsSystem")
            .field("config", &self.config)
            .field("timestep", &self.timestep)
            .field("callbacks", &self.callbacks.len())
            .field("contacts", &self.contacts.len())
            .finish()
    }
}

impl PhysicsSystem {
    /// Create a physics system from its configuration
    pub fn new(config: PhysicsConfig) -> Self {
        let timestep = FixedTimestep::new(config.fixed_time_step, config.max_delta_time);
        Self {
            config,
            timestep,
            callbacks: Subscribers::new(),
            contacts: Vec::new(),
            priority: 0,
        }
    }

    /// Builder pattern: Set scheduling priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Size of one physics step in seconds
    pub fn fixed_time_step(&self) -> f32 {
        self.timestep.step()
    }

    /// Change the physics step; non-positive values are ignored
    pub fn set_fixed_time_step(&mut self, step: f32) {
        self.timestep.set_step(step);
        self.config.fixed_time_step = self.timestep.step();
    }

    /// Gravitational acceleration
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Change gravitational acceleration
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    /// Coefficient of restitution
    pub fn restitution(&self) -> f32 {
        self.config.restitution
    }

    /// Change the coefficient of restitution (clamped to be non-negative)
    pub fn set_restitution(&mut self, restitution: f32) {
        self.config.restitution = restitution.max(0.0);
    }

    /// Time banked but not yet simulated
    pub fn accumulator(&self) -> f32 {
        self.timestep.accumulator()
    }

    /// Total simulated time driven through [`advance`](Self::advance)
    pub fn simulated_time(&self) -> f64 {
        self.timestep.simulated_time()
    }

    /// Number of steps driven through [`advance`](Self::advance)
    pub fn steps_taken(&self) -> u64 {
        self.timestep.total_steps()
    }

    /// Contacts detected during the most recent step
    pub fn contacts(&self) -> &[CollisionInfo] {
        &self.contacts
    }

    /// Register a collision observer
    pub fn on_collision(&mut self, callback: impl FnMut(&CollisionInfo) + 'static) -> SubscriptionId {
        self.callbacks.subscribe(callback)
    }

    /// Remove a collision observer; returns false if it was not registered
    pub fn off_collision(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    /// Bank `delta_time` and run every physics step now due
    pub fn advance(&mut self, world: &mut World, delta_time: f32) -> u32 {
        let steps = self.timestep.advance(delta_time);
        let step = self.timestep.step();
        for _ in 0..steps {
            self.step(world, step);
        }
        if steps > 0 {
            log::trace!("Ran {steps} physics step(s) for a {delta_time:.4}s frame");
        }
        steps
    }

    /// Run a single physics step of `dt` seconds
    ///
    /// Integration of every body completes before any pair is tested.
    pub fn step(&mut self, world: &mut World, dt: f32) {
        self.contacts.clear();
        let bodies = self.bodies(world);

        for &entity in &bodies {
            if let Some((transform, body)) = world.body_parts_mut(entity) {
                body.fixed_update(transform, &self.config.gravity, dt);
            }
        }

        for (index, &entity_a) in bodies.iter().enumerate() {
            for &entity_b in &bodies[index + 1..] {
                self.test_pair(world, entity_a, entity_b);
            }
        }

        if !self.contacts.is_empty() {
            log::trace!(
                "Physics step: {} bodies, {} contacts",
                bodies.len(),
                self.contacts.len()
            );
        }
    }

    fn bodies(&self, world: &World) -> Vec<Entity> {
        world
            .entities_with_components(&REQUIRED)
            .into_iter()
            .filter(|entity| world.is_active(*entity))
            .collect()
    }

    fn test_pair(&mut self, world: &mut World, entity_a: Entity, entity_b: Entity) {
        let (Some(a), Some(b)) = (
            BodySnapshot::read(world, entity_a),
            BodySnapshot::read(world, entity_b),
        ) else {
            return;
        };
        if a.is_static && b.is_static {
            return;
        }
        let Some(contact) = a.shape.contact(&b.shape) else {
            return;
        };

        let is_trigger = a.is_trigger || b.is_trigger;
        if !is_trigger {
            self.resolve(world, (entity_a, &a), (entity_b, &b), &contact);
        }

        let info = CollisionInfo {
            entity_a,
            entity_b,
            point: contact.point,
            normal: a.shape.reported_normal(&b.shape, &contact),
            depth: contact.depth,
            is_trigger,
        };
        log::trace!(
            "Contact {entity_a} -> {entity_b}: depth {:.4}{}",
            info.depth,
            if is_trigger { " (trigger)" } else { "" }
        );
        self.callbacks.emit(&info);
        self.contacts.push(info);
    }

    /// Separate the pair along the normal, then apply an impulse if approaching
    fn resolve(
        &self,
        world: &mut World,
        (entity_a, a): (Entity, &BodySnapshot),
        (entity_b, b): (Entity, &BodySnapshot),
        contact: &Contact,
    ) {
        let total_mass = a.mass + b.mass;
        if total_mass <= 0.0 {
            return;
        }

        let (share_a, share_b) = if a.is_static {
            (0.0, 1.0)
        } else if b.is_static {
            (1.0, 0.0)
        } else {
            (b.mass / total_mass, a.mass / total_mass)
        };
        let separation = contact.normal * contact.depth;
        if share_a > 0.0 {
            if let Some(transform) = world.get_component_mut::<Transform>(entity_a) {
                transform.translate(-separation * share_a);
            }
        }
        if share_b > 0.0 {
            if let Some(transform) = world.get_component_mut::<Transform>(entity_b) {
                transform.translate(separation * share_b);
            }
        }

        let approach = (b.velocity - a.velocity).dot(&contact.normal);
        if approach >= 0.0 {
            return;
        }
        let impulse = -(1.0 + self.config.restitution) * approach / total_mass;
        let impulse = contact.normal * impulse;

        if !a.is_static {
            if let Some(body) = world.get_component_mut::<RigidBody>(entity_a) {
                body.set_velocity(a.velocity - impulse / a.mass);
            }
        }
        if !b.is_static {
            if let Some(body) = world.get_component_mut::<RigidBody>(entity_b) {
                body.set_velocity(b.velocity + impulse / b.mass);
            }
        }
    }

    /// Nearest collider hit by a ray within `max_distance`
    ///
    /// Every collider of every active body is tested. Only spheres can be
    /// hit; a zero-length direction hits nothing.
    pub fn raycast(
        &self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(origin, direction)?;
        let mut nearest: Option<RaycastHit> = None;

        for entity in self.bodies(world) {
            let (Some(body), Some(position)) = (
                world.get_component::<RigidBody>(entity),
                world.world_position(entity),
            ) else {
                continue;
            };
            for collider in body.colliders() {
                let Some((distance, point, normal)) =
                    collider.to_world_space(position).intersect_ray(&ray)
                else {
                    continue;
                };
                if distance > max_distance
                    || nearest.is_some_and(|hit| hit.distance <= distance)
                {
                    continue;
                }
                nearest = Some(RaycastHit {
                    entity,
                    point,
                    normal,
                    distance,
                });
            }
        }
        nearest
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "PhysicsSystem"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn required_components(&self) -> &[ComponentKind] {
        &REQUIRED
    }

    fn on_added(&mut self, world: &mut World) {
        log::debug!(
            "Physics system attached: {} bodies, step {:.4}s",
            self.bodies(world).len(),
            self.timestep.step()
        );
    }

    fn update(&mut self, world: &mut World, delta_time: f32) {
        self.advance(world, delta_time);
    }
}
