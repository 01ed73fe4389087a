//! Drawing seam and the per-frame render pass.
//!
//! The core does not own a window. Everything visible goes through the
//! [`Renderer`] trait, in screen space, already offset by the camera. The
//! presentation layer implements it on top of whatever graphics backend it
//! uses and calls [`render_pass`] once per frame after the schedule ran.
//!
//! Draw order, back to front:
//! 1. clouds
//! 2. tiles (off-grid first)
//! 3. enemies and their guns
//! 4. the player, unless dead
//! 5. projectiles, sparks, particles
//! 6. level transition iris
//! 7. HUD text

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::assets::{AssetProvider, ImageId};
use crate::components::cloud::Cloud;
use crate::components::enemy::Enemy;
use crate::components::particle::Particle;
use crate::components::player::Player;
use crate::components::projectile::Projectile;
use crate::components::spark::Spark;
use crate::resources::camera::Camera;
use crate::resources::levelstate::LevelState;
use crate::resources::rng::GameRng;
use crate::resources::tilegrid::TileGrid;

/// Gap between an enemy's center and its gun.
const GUN_OFFSET: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Screen-space drawing primitives the core needs.
pub trait Renderer {
    /// Size of the logical view in pixels.
    fn view_size(&self) -> Vec2;
    /// Draw an image with its top-left corner at `dest`.
    fn draw_image(&mut self, image: ImageId, dest: Vec2, flip_x: bool);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Rgba);
    /// Black out everything outside a circle of `radius` around the view
    /// center. A radius of zero blacks out the whole view.
    fn draw_transition(&mut self, radius: f32);
}

/// Draw one frame of the game world and its HUD.
pub fn render_pass(world: &mut World, renderer: &mut dyn Renderer, assets: &dyn AssetProvider) {
    let view = renderer.view_size();
    let offset = {
        let camera = *world.resource::<Camera>();
        let mut rng = world.resource_mut::<GameRng>();
        camera.render_offset() + camera.shake_offset(&mut rng.0)
    };

    let mut clouds: Vec<Cloud> = world.query::<&Cloud>().iter(world).copied().collect();
    clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    for cloud in &clouds {
        renderer.draw_image(cloud.image.id, cloud.screen_pos(offset, view), false);
    }

    world.resource::<TileGrid>().render(renderer, assets, offset);

    let gun = assets.sprite("gun");
    for enemy in world.query::<&Enemy>().iter(world) {
        if let Some(animation) = &enemy.body.animation {
            renderer.draw_image(animation.image(), enemy.body.draw_pos(offset), enemy.body.flip);
        }
        if let Some(gun) = gun {
            let (center, flip) = enemy.gun_anchor();
            let x = if flip {
                center.x - GUN_OFFSET - gun.size.x
            } else {
                center.x + GUN_OFFSET
            };
            renderer.draw_image(gun.id, Vec2::new(x, center.y) - offset, flip);
        }
    }

    let (dead, transition, radius, level, deaths) = {
        let state = world.resource::<LevelState>();
        (
            state.is_dead(),
            state.transition,
            state.transition_radius(),
            state.level,
            state.death_counter,
        )
    };

    if !dead {
        for player in world.query::<&Player>().iter(world) {
            if let Some(animation) = &player.body.animation {
                renderer.draw_image(animation.image(), player.body.draw_pos(offset), player.body.flip);
            }
        }
    }

    if let Some(image) = assets.sprite("projectile") {
        for projectile in world.query::<&Projectile>().iter(world) {
            let dest = projectile.pos - image.size / 2.0 - offset;
            renderer.draw_image(image.id, dest, false);
        }
    }

    for spark in world.query::<&Spark>().iter(world) {
        renderer.fill_polygon(&spark.polygon(offset), Rgba::WHITE);
    }

    for particle in world.query::<&Particle>().iter(world) {
        let image = particle.animation.image();
        let half = assets.image_size(image).unwrap_or(Vec2::ZERO) / 2.0;
        renderer.draw_image(image, particle.pos - half - offset, false);
    }

    if transition != 0 {
        renderer.draw_transition(radius);
    }

    let enemies_left = world.query_filtered::<(), With<Enemy>>().iter(world).count();
    renderer.draw_text(&format!("Level: {level}"), Vec2::new(5.0, 5.0), Rgba::BLACK);
    renderer.draw_text(
        &format!("Deaths: {deaths}"),
        Vec2::new(5.0, view.y - 30.0),
        Rgba::BLACK,
    );
    renderer.draw_text(
        &format!("Enemies Left: {enemies_left}"),
        Vec2::new(view.x - 100.0, 5.0),
        Rgba::BLACK,
    );
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Image {
        image: ImageId,
        dest: Vec2,
        flip_x: bool,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Rgba,
    },
    Text {
        text: String,
        pos: Vec2,
        color: Rgba,
    },
    Transition {
        radius: f32,
    },
}

/// Renderer that only records what it was asked to draw.
///
/// Handy for headless runs and for asserting on draw order in tests.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    pub view: Vec2,
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new(view: Vec2) -> Self {
        Self {
            view,
            calls: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<ImageId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Image { image, .. } => Some(*image),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn view_size(&self) -> Vec2 {
        self.view
    }

    fn draw_image(&mut self, image: ImageId, dest: Vec2, flip_x: bool) {
        self.calls.push(DrawCall::Image {
            image,
            dest,
            flip_x,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Rgba) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            pos,
            color,
        });
    }

    fn draw_transition(&mut self, radius: f32) {
        self.calls.push(DrawCall::Transition { radius });
    }
}
