//! RGBA software canvas
//!
//! A tightly packed 8-bit RGBA buffer with the handful of 2D primitives the
//! frame needs. Drawing calls take logical coordinates that are offset by the
//! canvas origin (like a translated 2D context); raw pixel access uses device
//! coordinates. All writes are clipped.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One RGBA8 pixel (straight alpha), layout-compatible with `ImageData`
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque color from 0xRRGGBB
    pub const fn hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Same color with alpha replaced (0.0 - 1.0)
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Same color with alpha multiplied by `factor`
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }

    /// Source-over composite of `self` onto `dst`
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            0 => return dst,
            255 => return self,
            _ => {}
        }
        let sa = self.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let mix = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
            (out_a * 255.0).round() as u8,
        )
    }
}

/// Software render target
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    origin: Vec2,
}

impl Canvas {
    /// Transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; (width as usize) * (height as usize)],
            origin: Vec2::ZERO,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Translation applied to every drawing call
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Raw bytes for presentation (RGBA8, row-major)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at device coordinates
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite a pixel at device coordinates
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }


    /// Fill every pixel, ignoring the origin
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Visit the clipped device rectangle covering logical [min, max),
    /// handing the callback the logical position of each pixel center.
    fn for_each_in(&mut self, min: Vec2, max: Vec2, mut f: impl FnMut(Vec2, &mut Rgba)) {
        let dmin = (min + self.origin).round();
        let dmax = (max + self.origin).round();
        let x0 = (dmin.x as i32).max(0);
        let y0 = (dmin.y as i32).max(0);
        let x1 = (dmax.x as i32).min(self.width as i32);
        let y1 = (dmax.y as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let width = self.width as usize;
        for y in y0..y1 {
            let row = y as usize * width;
            for x in x0..x1 {
                let logical = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - self.origin;
                f(logical, &mut self.pixels[row + x as usize]);
            }
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.for_each_in(Vec2::new(x, y), Vec2::new(x + w, y + h), |_, px| {
            *px = color.over(*px);
        });
    }

    /// Rectangle outline centered on the edges
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: Rgba) {
        let half = line_width / 2.0;
        // Top and bottom span the full outer width; sides fill the gap
        self.fill_rect(x - half, y - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y + h - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y + half, line_width, h - line_width, color);
        self.fill_rect(x + w - half, y + half, line_width, h - line_width, color);
    }

    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgba) {
        let r = radius.clamp(0.0, w.min(h) / 2.0);
        let inner_min = Vec2::new(x + r, y + r);
        let inner_max = Vec2::new(x + w - r, y + h - r);
        self.for_each_in(Vec2::new(x, y), Vec2::new(x + w, y + h), |p, px| {
            let nearest = p.clamp(inner_min, inner_max);
            if p.distance_squared(nearest) <= r * r {
                *px = color.over(*px);
            }
        });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let extent = Vec2::splat(radius);
        let r2 = radius * radius;
        self.for_each_in(center - extent, center + extent, |p, px| {
            if p.distance_squared(center) <= r2 {
                *px = color.over(*px);
            }
        });
    }

    /// Soft halo: full `color` alpha within `inner`, fading to nothing at `outer`
    pub fn glow(&mut self, center: Vec2, inner: f32, outer: f32, color: Rgba) {
        let extent = Vec2::splat(outer);
        let span = (outer - inner).max(f32::EPSILON);
        self.for_each_in(center - extent, center + extent, |p, px| {
            let d = p.distance(center);
            if d >= outer {
                return;
            }
            let falloff = if d <= inner { 1.0 } else { 1.0 - (d - inner) / span };
            *px = color.fade(falloff * falloff).over(*px);
        });
    }

    /// Fill a rectangle with a repeating tile anchored at the origin
    pub fn fill_pattern(&mut self, tile: &Canvas, x: f32, y: f32, w: f32, h: f32) {
        if tile.width == 0 || tile.height == 0 {
            return;
        }
        let (tw, th) = (tile.width as i32, tile.height as i32);
        self.for_each_in(Vec2::new(x, y), Vec2::new(x + w, y + h), |p, px| {
            let tx = (p.x.floor() as i32).rem_euclid(tw);
            let ty = (p.y.floor() as i32).rem_euclid(th);
            let src = tile.pixels[(ty * tw + tx) as usize];
            *px = src.over(*px);
        });
    }

    /// Composite another canvas with its top-left at logical (x, y)
    pub fn draw_canvas(&mut self, src: &Canvas, x: f32, y: f32) {
        let top_left = Vec2::new(x, y);
        let size = src.size();
        self.for_each_in(top_left, top_left + size, |p, px| {
            let s = p - top_left;
            let sx = s.x.floor() as i32;
            let sy = s.y.floor() as i32;
            if let Some(color) = src.pixel(sx, sy) {
                *px = color.over(*px);
            }
        });
    }

    /// Destination-out radial erase: fully clears within `inner`, fading
    /// back to untouched at `outer`.
    pub fn erase_radial(&mut self, center: Vec2, inner: f32, outer: f32) {
        let extent = Vec2::splat(outer);
        let span = (outer - inner).max(f32::EPSILON);
        self.for_each_in(center - extent, center + extent, |p, px| {
            let d = p.distance(center);
            if d >= outer {
                return;
            }
            let keep = if d <= inner { 0.0 } else { (d - inner) / span };
            *px = px.fade(keep);
        });
    }
}
