//! The bowl: fixed walls, a spinning agitator and a batch of balls in a Rapier2D world.
//! Side view, Y up. The floor ends at the right-hand lip, so an ejected ball
//! falls out of the bowl and keeps dropping.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bowl_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, SceneBinding,
};

// Bowl geometry
const FLOOR_HALF_W: f32 = 6.0;
const WALL_THICKNESS: f32 = 0.25;
const BACK_WALL_HALF_H: f32 = 3.5;
const LIP_HALF_H: f32 = 1.25;

// Agitator: a bar spinning just above the floor
const AGITATOR_POS: Vec2 = Vec2::new(0.0, 1.2);
const AGITATOR_HALF_LEN: f32 = 1.1;
const AGITATOR_HALF_THICKNESS: f32 = 0.12;

// Balls: unit mass, so an impulse is also the velocity change
pub const BALL_RADIUS: f32 = 0.5;
const BALL_DENSITY: f32 = 1.0 / (std::f32::consts::PI * BALL_RADIUS * BALL_RADIUS);
const SPAWN_X: (f32, f32) = (-2.0, 2.0);
const SPAWN_Y: (f32, f32) = (3.0, 8.0);

// Reveal presentation
pub const SHOWCASE_POS: Vec2 = Vec2::new(0.0, 6.0);
pub const SHOWCASE_SCALE: f32 = 3.0;

pub const BALL_TAG: &str = "ball";
const WALL_TAG: &str = "bowl";
const AGITATOR_TAG: &str = "agitator";

fn ball_material() -> ColliderMaterial {
    ColliderMaterial {
        restitution: 0.4,
        friction: 0.1,
        density: BALL_DENSITY,
    }
}

/// Bowl state that lives between frames: which balls exist, the agitator body,
/// and the RNG used for ball placement.
pub struct Bowl {
    rng: Pcg32,
    balls: Vec<EntityId>,
    agitator: Option<EntityId>,
}

impl Bowl {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            balls: Vec::new(),
            agitator: None,
        }
    }

    /// Spawn the walls and the agitator. Balls come later through `create_balls`.
    pub fn build(&mut self, ctx: &mut EngineContext) {
        let wall_material = ColliderMaterial {
            restitution: 0.2,
            friction: 0.3,
            density: 1.0,
        };

        // Floor: top surface at y = 0
        let id = ctx.next_id();
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: FLOOR_HALF_W,
            half_height: WALL_THICKNESS,
        })
        .with_position(Vec2::new(0.0, -WALL_THICKNESS));
        ctx.spawn_with_body(Entity::new(id).with_tag(WALL_TAG), desc, wall_material);

        // Tall back wall on the left
        let id = ctx.next_id();
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: WALL_THICKNESS,
            half_height: BACK_WALL_HALF_H,
        })
        .with_position(Vec2::new(-FLOOR_HALF_W - WALL_THICKNESS, BACK_WALL_HALF_H));
        ctx.spawn_with_body(Entity::new(id).with_tag(WALL_TAG), desc, wall_material);

        // Low exit lip on the right; nothing beyond it
        let id = ctx.next_id();
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: WALL_THICKNESS,
            half_height: LIP_HALF_H,
        })
        .with_position(Vec2::new(FLOOR_HALF_W + WALL_THICKNESS, LIP_HALF_H));
        ctx.spawn_with_body(Entity::new(id).with_tag(WALL_TAG), desc, wall_material);

        let id = ctx.next_id();
        let desc = BodyDesc::kinematic(ColliderDesc::Cuboid {
            half_width: AGITATOR_HALF_LEN,
            half_height: AGITATOR_HALF_THICKNESS,
        })
        .with_position(AGITATOR_POS);
        self.agitator = Some(ctx.spawn_with_body(
            Entity::new(id).with_tag(AGITATOR_TAG),
            desc,
            wall_material,
        ));

        log::info!("Bowl built with {} bodies", ctx.physics.body_count());
    }

    pub fn balls(&self) -> &[EntityId] {
        &self.balls
    }

    pub fn agitator(&self) -> Option<EntityId> {
        self.agitator
    }

    /// Borrow the bowl together with the engine as a `SceneBinding` for one call.
    pub fn bind<'a>(&'a mut self, ctx: &'a mut EngineContext) -> BowlScene<'a> {
        BowlScene { bowl: self, ctx }
    }
}

/// The bowl plus the engine context it lives in.
pub struct BowlScene<'a> {
    bowl: &'a mut Bowl,
    ctx: &'a mut EngineContext,
}

impl SceneBinding for BowlScene<'_> {
    fn step_simulation(&mut self, dt: f32) {
        self.ctx.step_physics(dt);
    }

    fn sync_visuals(&mut self) {
        self.ctx.sync_visuals();
    }

    fn create_balls(&mut self, count: usize) -> Vec<EntityId> {
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = Vec2::new(
                self.bowl.rng.random_range(SPAWN_X.0..=SPAWN_X.1),
                self.bowl.rng.random_range(SPAWN_Y.0..=SPAWN_Y.1),
            );
            let hue = self.bowl.rng.random_range(0.0..360.0);

            let id = self.ctx.next_id();
            let entity = Entity::new(id).with_tag(BALL_TAG).with_hue(hue);
            let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: BALL_RADIUS })
                .with_position(pos)
                .with_ccd(true);
            self.ctx.spawn_with_body(entity, desc, ball_material());
            created.push(id);
        }
        self.bowl.balls.extend_from_slice(&created);
        created
    }

    fn destroy_all_balls(&mut self) {
        for id in self.bowl.balls.drain(..) {
            self.ctx.despawn(id);
        }
    }

    /// The only impulse is the ejection. The ejected ball stops colliding so the
    /// pile, the agitator and the lip cannot hold it back; it flies out and drops.
    fn apply_impulse(&mut self, ball: EntityId, impulse: Vec2) {
        self.ctx.set_collisions_enabled(ball, false);
        self.ctx.apply_impulse(ball, impulse);
    }

    fn apply_force(&mut self, ball: EntityId, force: Vec2) {
        self.ctx.apply_force(ball, force);
    }

    fn apply_disturbance(&mut self, angular_velocity: f32) {
        if let Some(agitator) = self.bowl.agitator {
            self.ctx.set_angular_velocity(agitator, angular_velocity);
        }
    }

    fn ball_position(&self, ball: EntityId) -> Option<Vec2> {
        self.ctx.body_position(ball)
    }

    fn centering_point(&self) -> Vec2 {
        AGITATOR_POS
    }

    fn showcase_ball(&mut self, ball: EntityId) {
        for &id in &self.bowl.balls {
            if let Some(entity) = self.ctx.scene.get_mut(id) {
                if id == ball {
                    entity.detach_at(SHOWCASE_POS, SHOWCASE_SCALE);
                } else {
                    entity.visible = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bowl_engine::SpinConfig;

    fn world() -> (Bowl, EngineContext) {
        let mut ctx = EngineContext::with_gravity(Vec2::new(0.0, -9.82));
        let mut bowl = Bowl::new(42);
        bowl.build(&mut ctx);
        (bowl, ctx)
    }

    fn ball_at(bowl: &mut Bowl, ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: BALL_RADIUS }).with_position(pos);
        ctx.spawn_with_body(Entity::new(id).with_tag(BALL_TAG).with_hue(0.0), desc, ball_material());
        bowl.balls.push(id);
        id
    }

    #[test]
    fn build_spawns_walls_and_agitator() {
        let (bowl, ctx) = world();
        assert_eq!(ctx.physics.body_count(), 4);
        assert!(bowl.agitator().is_some());
        assert!(bowl.balls().is_empty());
    }

    #[test]
    fn balls_spawn_inside_the_drop_zone() {
        let (mut bowl, mut ctx) = world();
        let ids = bowl.bind(&mut ctx).create_balls(25);
        assert_eq!(ids.len(), 25);
        assert_eq!(ctx.scene.find_all_by_tag(BALL_TAG).len(), 25);

        for id in ids {
            let e = ctx.scene.get(id).unwrap();
            assert!((-2.0..=2.0).contains(&e.pos.x));
            assert!((3.0..=8.0).contains(&e.pos.y));
            let hue = e.hue.unwrap();
            assert!((0.0..360.0).contains(&hue));
        }
    }

    #[test]
    fn destroy_removes_bodies_too() {
        let (mut bowl, mut ctx) = world();
        let mut scene = bowl.bind(&mut ctx);
        scene.create_balls(10);
        scene.destroy_all_balls();
        assert!(bowl.balls().is_empty());
        assert_eq!(ctx.physics.body_count(), 4);
        assert!(ctx.scene.find_all_by_tag(BALL_TAG).is_empty());
    }

    #[test]
    fn showcase_hides_the_rest() {
        let (mut bowl, mut ctx) = world();
        let ids = bowl.bind(&mut ctx).create_balls(3);
        bowl.bind(&mut ctx).showcase_ball(ids[1]);

        let lucky = ctx.scene.get(ids[1]).unwrap();
        assert_eq!(lucky.pos, SHOWCASE_POS);
        assert_eq!(lucky.scale, SHOWCASE_SCALE);
        assert!(lucky.visible);
        assert!(!ctx.scene.get(ids[0]).unwrap().visible);
        assert!(!ctx.scene.get(ids[2]).unwrap().visible);
    }

    #[test]
    fn balls_settle_on_the_floor() {
        let (mut bowl, mut ctx) = world();
        let mut scene = bowl.bind(&mut ctx);
        let ids = scene.create_balls(5);
        for _ in 0..300 {
            scene.step_simulation(1.0 / 60.0);
        }
        scene.sync_visuals();
        for id in ids {
            let y = scene.ball_position(id).unwrap().y;
            assert!(y > 0.0 && y < 5.0, "ball should rest in the bowl: y={}", y);
        }
    }

    #[test]
    fn ejected_ball_clears_the_lip_and_the_pile() {
        let (mut bowl, mut ctx) = world();
        // Resting against the lip with another ball on top of it
        let lucky = ball_at(&mut bowl, &mut ctx, Vec2::new(5.5, 0.5));
        let blocker = ball_at(&mut bowl, &mut ctx, Vec2::new(5.5, 1.5));
        let mut scene = bowl.bind(&mut ctx);
        for _ in 0..30 {
            scene.step_simulation(1.0 / 60.0);
        }

        scene.apply_impulse(lucky, SpinConfig::default().exit_impulse);
        let mut frames = 0;
        while scene.ball_position(lucky).unwrap().y >= -5.0 && frames < 600 {
            scene.step_simulation(1.0 / 60.0);
            frames += 1;
        }
        // Unit mass: (20, 10) launches at 10 m/s upward, about 2.4 s to fall past -5
        assert!(frames < 180, "ball took {} frames to leave", frames);
        assert!(scene.ball_position(lucky).unwrap().x > 6.5);
        assert!(scene.ball_position(blocker).unwrap().y > 0.0, "blocker stays in the bowl");
    }

    #[test]
    fn centering_pulls_toward_the_agitator() {
        let (mut bowl, mut ctx) = world();
        assert_eq!(bowl.bind(&mut ctx).centering_point(), AGITATOR_POS);
    }

    #[test]
    fn disturbance_spins_the_agitator() {
        let (mut bowl, mut ctx) = world();
        let agitator = bowl.agitator().unwrap();
        bowl.bind(&mut ctx).apply_disturbance(12.0);
        let body = ctx.scene.get(agitator).unwrap().body.unwrap();
        for _ in 0..5 {
            ctx.step_physics(1.0 / 60.0);
        }
        let (_, spun) = ctx.physics.body_position(&body);
        assert!((spun - 1.0).abs() < 0.01, "12 rad/s for 1/12 s: {}", spun);

        bowl.bind(&mut ctx).apply_disturbance(0.0);
        for _ in 0..5 {
            ctx.step_physics(1.0 / 60.0);
        }
        let (_, stopped) = ctx.physics.body_position(&body);
        assert!((stopped - spun).abs() < 1e-4, "agitator should stop: {} -> {}", spun, stopped);
    }
}
