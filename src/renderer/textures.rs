//! Procedural textures, generated once at startup

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::canvas::{Canvas, Rgba};
use super::palette;

/// Floor tile edge in pixels
pub const FLOOR_TILE: u32 = 64;
/// Sprite edge in pixels (one grid cell)
pub const SPRITE_SIZE: u32 = 20;

/// Grimy floor: flat base with dark specks and a few scratches
pub fn floor_tile(seed: u64) -> Canvas {
    let mut rng = Pcg32::seed_from_u64(seed);
    let size = FLOOR_TILE as f32;
    let mut tile = Canvas::new(FLOOR_TILE, FLOOR_TILE);
    tile.clear(palette::FLOOR);

    for _ in 0..40 {
        let x = rng.random_range(0.0..size);
        let y = rng.random_range(0.0..size);
        let s = rng.random_range(1.0..3.0f32);
        tile.fill_rect(x, y, s, s, palette::FLOOR_SPECK);
    }

    for _ in 0..3 {
        let start = Vec2::new(rng.random_range(0.0..size), rng.random_range(0.0..size));
        let dir = Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU));
        let len = rng.random_range(8.0..24.0f32);
        let steps = len as i32;
        for i in 0..steps {
            let p = start + dir * i as f32;
            let x = (p.x.rem_euclid(size)).floor();
            let y = (p.y.rem_euclid(size)).floor();
            tile.fill_rect(x, y, 1.0, 1.0, palette::FLOOR_SCRATCH);
        }
    }
    tile
}

/// Tarnished key: ring bow, shaft and two teeth
pub fn key_sprite() -> Canvas {
    let mut sprite = Canvas::new(SPRITE_SIZE, SPRITE_SIZE);
    sprite.fill_circle(Vec2::new(6.0, 10.0), 4.5, palette::KEY);
    sprite.fill_rect(10.0, 9.0, 8.0, 2.0, palette::KEY);
    sprite.fill_rect(14.0, 11.0, 2.0, 3.0, palette::KEY);
    sprite.fill_rect(17.0, 11.0, 1.0, 2.0, palette::KEY);
    // Punch the bow's hole
    for y in 8..12 {
        for x in 4..8 {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(Vec2::new(6.0, 10.0));
            if d <= 2.0 {
                sprite.set_pixel(x, y, Rgba::TRANSPARENT);
            }
        }
    }
    sprite
}

/// Door: dark slab in a pale frame with a knob
pub fn door_sprite() -> Canvas {
    let mut sprite = Canvas::new(SPRITE_SIZE, SPRITE_SIZE);
    let s = SPRITE_SIZE as f32;
    sprite.fill_rect(2.0, 0.0, s - 4.0, s, palette::DOOR_FRAME);
    sprite.fill_rect(4.0, 2.0, s - 8.0, s - 2.0, palette::DOOR);
    sprite.fill_rect(6.0, 4.0, s - 12.0, 5.0, palette::DOOR.fade(0.6));
    sprite.fill_circle(Vec2::new(13.0, 11.0), 1.2, palette::KEY);
    sprite
}
