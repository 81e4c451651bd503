//! Colors for game elements

use super::canvas::Rgba;

pub const BACKGROUND: Rgba = Rgba::hex(0x0a0a0a);
pub const GRID_BORDER: Rgba = Rgba::hex(0x331111);
pub const FLOOR: Rgba = Rgba::hex(0x1a1a1a);
pub const FLOOR_SPECK: Rgba = Rgba::new(0, 0, 0, 90);
pub const FLOOR_SCRATCH: Rgba = Rgba::new(40, 10, 10, 70);
pub const STAIN: Rgba = Rgba::hex(0x660000);
pub const WALL: Rgba = Rgba::hex(0x773333);
pub const WALL_EDGE: Rgba = Rgba::hex(0xaa5555);
pub const FOOD: Rgba = Rgba::hex(0xff3333);
pub const FOOD_GLOW: Rgba = Rgba::new(255, 0, 0, 150);
pub const KEY: Rgba = Rgba::hex(0xd4af37);
pub const KEY_GLOW: Rgba = Rgba::new(255, 255, 0, 140);
pub const DOOR: Rgba = Rgba::hex(0x2b1a10);
pub const DOOR_FRAME: Rgba = Rgba::hex(0xcccccc);
pub const DOOR_GLOW: Rgba = Rgba::new(255, 255, 255, 140);
pub const HEAD: Rgba = Rgba::hex(0xdddddd);
pub const EYE: Rgba = Rgba::BLACK;
pub const BODY: Rgba = Rgba::hex(0x994444);
pub const BLOOD_DARK: Rgba = Rgba::hex(0x990000);
pub const BLOOD_BRIGHT: Rgba = Rgba::hex(0xff0000);
pub const FLASH: Rgba = Rgba::hex(0xffdddd);
pub const JUMPSCARE_SKIN: Rgba = Rgba::hex(0xd8d0c0);
pub const JUMPSCARE_BACK: Rgba = Rgba::hex(0x300000);
