//! Demo scene: balls dropped onto a static floor, a trigger zone and a
//! kinematic sweeper driven by its own system.

use sim_engine::prelude::*;

/// Handles to the entities the driver reports on
pub struct DemoScene {
    pub floor: Entity,
    pub balls: Vec<Entity>,
    pub zone: Entity,
    pub sweeper: Entity,
}

const BALL_COUNT: usize = 4;

/// Populate `world` with the demo entities
pub fn build(world: &mut World) -> DemoScene {
    let floor = world.create_entity("floor");
    world.add_component(floor, Transform::from_position(Vec3::new(0.0, -0.5, 0.0)));
    world.add_component(
        floor,
        RigidBody::fixed().with_collider(Collider::cuboid(Vec3::new(20.0, 1.0, 20.0))),
    );
    world.add_tag(floor, "environment");

    let balls = (0..BALL_COUNT)
        .map(|index| {
            let offset = index as f32;
            let ball = world.create_entity(format!("ball_{index}"));
            world.add_component(
                ball,
                Transform::from_position(Vec3::new(offset * 1.5 - 2.25, 2.0 + offset, 0.0)),
            );
            world.add_component(
                ball,
                RigidBody::dynamic(1.0 + offset * 0.5)
                    .with_drag(0.05, 0.05)
                    .with_collider(Collider::sphere(0.5)),
            );
            world.add_tag(ball, "ball");
            ball
        })
        .collect();

    let zone = world.create_entity("goal_zone");
    world.add_component(zone, Transform::from_position(Vec3::new(3.0, 0.5, 0.0)));
    world.add_component(
        zone,
        RigidBody::fixed().with_collider(Collider::cuboid(Vec3::new(2.0, 1.0, 2.0)).as_trigger()),
    );

    let sweeper = world.create_entity("sweeper");
    world.add_component(sweeper, Transform::from_position(Vec3::new(-6.0, 0.5, 0.0)));
    world.add_component(
        sweeper,
        RigidBody::kinematic(50.0)
            .with_gravity(false)
            .with_constraints(BodyConstraints::FREEZE_POSITION_Y | BodyConstraints::FREEZE_ROTATION)
            .with_collider(Collider::cuboid(Vec3::new(0.5, 1.0, 4.0))),
    );

    // Visual marker riding on the sweeper; carries no body
    let marker = world.create_entity("sweeper_flag");
    world.add_component(marker, Transform::from_position(Vec3::new(0.0, 1.5, 0.0)));
    if let Err(err) = world.set_parent(marker, Some(sweeper)) {
        log::warn!("Could not attach sweeper flag: {err}");
    }

    DemoScene {
        floor,
        balls,
        zone,
        sweeper,
    }
}

/// Keeps the sweeper moving back and forth between two bounds
pub struct SweeperSystem {
    sweeper: Entity,
    speed: f32,
    bound: f32,
}

impl SweeperSystem {
    pub fn new(sweeper: Entity, speed: f32, bound: f32) -> Self {
        Self {
            sweeper,
            speed,
            bound,
        }
    }
}

impl System for SweeperSystem {
    fn name(&self) -> &str {
        "SweeperSystem"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn fixed_update(&mut self, world: &mut World, _fixed_delta: f32) {
        let Some(x) = world
            .get_component::<Transform>(self.sweeper)
            .map(|transform| transform.position().x)
        else {
            return;
        };
        if x.abs() >= self.bound {
            self.speed = -self.speed.abs() * x.signum();
        }
        if let Some(body) = world.get_component_mut::<RigidBody>(self.sweeper) {
            body.set_velocity(Vec3::new(self.speed, 0.0, 0.0));
        }
    }
}
