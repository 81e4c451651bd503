//! Software rendering module
//!
//! Composites each frame into an RGBA buffer that the platform layer
//! presents as-is (canvas `putImageData` on the web). Draw order:
//! floor, border, stains, walls, food, key, door, creature, particles,
//! vignette, then the horror post-process.

pub mod canvas;
pub mod effects;
pub mod lighting;
pub mod palette;
pub mod particles;
pub mod textures;

pub use canvas::{Canvas, Rgba};
pub use effects::PostProcess;
pub use lighting::Lighting;
pub use particles::ParticleSystem;

use glam::Vec2;

use crate::consts::TILE_SIZE;
use crate::horror::HorrorView;
use crate::settings::Settings;
use crate::sim::{Objective, Position, RenderSnapshot};
use crate::{cell_center, grid_pixel_size, stress_from_sanity};

/// Glow radius for an item, brighter the closer the objective is to the exit
pub fn objective_glow(base: f32, objective: Objective) -> f32 {
    let scale = match objective {
        Objective::Consume => 0.6,
        Objective::Retrieve => 1.0,
        Objective::Exit => 1.4,
    };
    base * scale
}

/// Frame compositor
pub struct Renderer {
    frame: Canvas,
    floor: Canvas,
    key_sprite: Canvas,
    door_sprite: Canvas,
    particles: ParticleSystem,
    lighting: Lighting,
    post: PostProcess,
    distortions: bool,
}

impl Renderer {
    pub fn new(width: u32, height: u32, seed: u64, settings: &Settings) -> Self {
        let grid = grid_pixel_size();
        log::info!(
            "Renderer {}x{} (grid {}x{}, quality {})",
            width,
            height,
            grid.x,
            grid.y,
            settings.quality.as_str()
        );
        Self {
            frame: Canvas::new(width, height),
            floor: textures::floor_tile(seed),
            key_sprite: textures::key_sprite(),
            door_sprite: textures::door_sprite(),
            particles: ParticleSystem::new(settings.quality.max_particles(), seed ^ 0xb100d),
            lighting: Lighting::new(grid.x as u32, grid.y as u32, seed ^ 0x70c4),
            post: PostProcess::new(seed ^ 0x9117c4),
            distortions: settings.quality.distortions_enabled(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.particles.set_max_particles(settings.quality.max_particles());
        self.distortions = settings.quality.distortions_enabled();
    }

    /// Top-left of the grid in frame pixels
    pub fn grid_origin(&self) -> Vec2 {
        ((self.frame.size() - grid_pixel_size()) / 2.0).floor()
    }

    /// Blood burst from the center of a cell
    pub fn spawn_blood(&mut self, cell: Position) {
        self.particles.burst(cell_center(cell.x, cell.y));
    }

    /// Drop particles and stains (level start)
    pub fn reset(&mut self) {
        self.particles.clear();
    }

    pub fn frame(&self) -> &Canvas {
        &self.frame
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Composite one frame from the latest snapshot
    pub fn render(&mut self, snapshot: &RenderSnapshot, view: &HorrorView, time_ms: f64) -> &Canvas {
        let grid = grid_pixel_size();
        let t = TILE_SIZE;

        self.frame.set_origin(Vec2::ZERO);
        self.frame.clear(palette::BACKGROUND);
        let origin = self.grid_origin();
        self.frame.set_origin(origin);

        self.frame.fill_pattern(&self.floor, 0.0, 0.0, grid.x, grid.y);
        self.frame.stroke_rect(0.0, 0.0, grid.x, grid.y, 2.0, palette::GRID_BORDER);
        self.particles.draw_stains(&mut self.frame);

        for wall in &snapshot.walls {
            let (x, y) = cell_origin(*wall);
            self.frame.fill_rect(x, y, t, t, palette::WALL);
            self.frame.stroke_rect(x, y, t, t, 2.0, palette::WALL_EDGE);
        }

        // Food
        let food = cell_center(snapshot.food.x, snapshot.food.y);
        self.frame.glow(food, t / 2.0 - 2.0, t / 2.0 + 10.0, palette::FOOD_GLOW);
        let (fx, fy) = cell_origin(snapshot.food);
        self.frame.fill_rect(fx + 2.0, fy + 2.0, t - 4.0, t - 4.0, palette::FOOD);

        if let Some(key) = snapshot.key {
            let glow = objective_glow(15.0, snapshot.objective);
            self.draw_item(key, glow, palette::KEY_GLOW, Item::Key);
        }
        if let Some(door) = snapshot.door {
            let glow = objective_glow(20.0, snapshot.objective);
            self.draw_item(door, glow, palette::DOOR_GLOW, Item::Door);
        }

        // Body first so the head sits on top
        for (i, seg) in snapshot.creature.iter().enumerate().rev() {
            let (x, y) = cell_origin(*seg);
            if i == 0 {
                self.frame.fill_round_rect(x + 1.0, y + 1.0, t - 2.0, t - 2.0, 5.0, palette::HEAD);
                self.frame.fill_rect(x + 5.0, y + 5.0, 4.0, 4.0, palette::EYE);
                self.frame.fill_rect(x + 12.0, y + 5.0, 4.0, 4.0, palette::EYE);
            } else {
                self.frame.fill_round_rect(x + 1.0, y + 1.0, t - 2.0, t - 2.0, 5.0, palette::BODY);
            }
        }

        self.particles.update();
        self.particles.draw_particles(&mut self.frame);

        let head = snapshot
            .creature
            .first()
            .map(|h| cell_center(h.x, h.y))
            .unwrap_or(grid / 2.0);
        self.lighting
            .apply(&mut self.frame, head, stress_from_sanity(snapshot.sanity), time_ms);

        self.post.apply(&mut self.frame, view, time_ms, self.distortions);
        &self.frame
    }

    fn draw_item(&mut self, cell: Position, glow: f32, glow_color: Rgba, item: Item) {
        let t = TILE_SIZE;
        let center = cell_center(cell.x, cell.y);
        self.frame.glow(center, t / 2.0 - 2.0, t / 2.0 + glow, glow_color);
        let sprite = match item {
            Item::Key => &self.key_sprite,
            Item::Door => &self.door_sprite,
        };
        let (x, y) = cell_origin(cell);
        self.frame.draw_canvas(sprite, x, y);
    }
}

#[derive(Clone, Copy)]
enum Item {
    Key,
    Door,
}

fn cell_origin(cell: Position) -> (f32, f32) {
    (cell.x as f32 * TILE_SIZE, cell.y as f32 * TILE_SIZE)
}
