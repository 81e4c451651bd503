//! Full-frame horror post-processing
//!
//! Applied after the vignette, in device space:
//! 1. Geometric distortion for the active hallucination (tilt, breathe, warp)
//! 2. Darkness dimming
//! 3. Glitch (RGB channel split with torn rows)
//! 4. Subliminal flash
//! 5. Jumpscare face overlay

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::canvas::{Canvas, Rgba};
use super::palette;
use crate::horror::{Hallucination, HorrorView};

/// Frame brightness while the darkness hallucination holds
pub const DARKNESS_FACTOR: f32 = 0.45;

/// Rotation in radians for the tilt hallucination
pub fn tilt_angle(time_ms: f64) -> f32 {
    0.06 * (time_ms * 0.0015).sin() as f32
}

/// Scale factor for the breathe hallucination
pub fn breathe_scale(time_ms: f64) -> f32 {
    1.0 + 0.04 * (time_ms * 0.004).sin() as f32
}

/// Horizontal displacement of a row for the warp hallucination
pub fn warp_offset(row: i32, time_ms: f64) -> f32 {
    6.0 * (row as f64 * 0.05 + time_ms * 0.008).sin() as f32
}

/// Post-process stage with a reusable scratch buffer
#[derive(Debug, Clone)]
pub struct PostProcess {
    scratch: Vec<Rgba>,
    rng: Pcg32,
}

impl PostProcess {
    pub fn new(seed: u64) -> Self {
        Self {
            scratch: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Apply every active effect. `distortions` gates the geometric ones.
    pub fn apply(&mut self, frame: &mut Canvas, view: &HorrorView, time_ms: f64, distortions: bool) {
        match view.hallucination {
            Some(Hallucination::Tilt) if distortions => {
                let (sin, cos) = tilt_angle(time_ms).sin_cos();
                let center = frame.size() / 2.0;
                self.resample(frame, |p| {
                    // Inverse rotation about the center
                    let d = p - center;
                    center + Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos)
                });
            }
            Some(Hallucination::Breathe) if distortions => {
                let scale = breathe_scale(time_ms);
                let center = frame.size() / 2.0;
                self.resample(frame, |p| center + (p - center) / scale);
            }
            Some(Hallucination::Warp) if distortions => {
                self.resample(frame, |p| {
                    Vec2::new(p.x + warp_offset(p.y as i32, time_ms), p.y)
                });
            }
            Some(Hallucination::Darkness) => darken(frame, DARKNESS_FACTOR),
            _ => {}
        }

        if view.glitch {
            self.glitch(frame, view.glitch_intensity);
        }
        if view.flash {
            flash(frame);
        }
        if view.jumpscare {
            jumpscare(frame, time_ms);
        }
    }

    /// Nearest-neighbour remap: each output pixel pulls from `source(p)`
    fn resample(&mut self, frame: &mut Canvas, source: impl Fn(Vec2) -> Vec2) {
        let (w, h) = (frame.width() as i32, frame.height() as i32);
        self.scratch.clear();
        self.scratch.extend_from_slice(frame.pixels());
        let pixels = frame.pixels_mut();
        for y in 0..h {
            for x in 0..w {
                let s = source(Vec2::new(x as f32, y as f32)).round();
                let (sx, sy) = (s.x as i32, s.y as i32);
                let i = (y * w + x) as usize;
                pixels[i] = if sx >= 0 && sy >= 0 && sx < w && sy < h {
                    self.scratch[(sy * w + sx) as usize]
                } else {
                    palette::BACKGROUND
                };
            }
        }
    }

    /// Red and blue channels slide apart; a few rows tear sideways
    fn glitch(&mut self, frame: &mut Canvas, intensity: f32) {
        let (w, h) = (frame.width() as i32, frame.height() as i32);
        if w == 0 || h == 0 {
            return;
        }
        let max_shift = (3.0 + 6.0 * intensity.max(0.0)) as i32;
        let shift = self.rng.random_range(1..=max_shift.max(1));
        let bands: Vec<(i32, i32, i32)> = (0..3)
            .map(|_| {
                let start = self.rng.random_range(0..h);
                let height = self.rng.random_range(2..=12);
                let offset = self.rng.random_range(-max_shift * 2..=max_shift * 2);
                (start, start + height, offset)
            })
            .collect();

        self.scratch.clear();
        self.scratch.extend_from_slice(frame.pixels());
        let src = &self.scratch;
        let sample = |x: i32, y: i32| src[(y * w + x.clamp(0, w - 1)) as usize];

        let pixels = frame.pixels_mut();
        for y in 0..h {
            let tear = bands
                .iter()
                .find(|(start, end, _)| (*start..*end).contains(&y))
                .map(|&(_, _, offset)| offset)
                .unwrap_or(0);
            for x in 0..w {
                let base = x - tear;
                let i = (y * w + x) as usize;
                pixels[i] = Rgba::new(
                    sample(base + shift, y).r,
                    sample(base, y).g,
                    sample(base - shift, y).b,
                    sample(base, y).a,
                );
            }
        }
    }
}

/// Scale color channels toward black
pub fn darken(frame: &mut Canvas, factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    for px in frame.pixels_mut() {
        px.r = (px.r as f32 * factor) as u8;
        px.g = (px.g as f32 * factor) as u8;
        px.b = (px.b as f32 * factor) as u8;
    }
}

fn flash(frame: &mut Canvas) {
    let veil = palette::FLASH.with_alpha(0.7);
    for px in frame.pixels_mut() {
        *px = veil.over(*px);
    }
}

/// Pale face with hollow eyes and a gaping mouth, shaking slightly
fn jumpscare(frame: &mut Canvas, time_ms: f64) {
    let origin = frame.origin();
    frame.set_origin(Vec2::ZERO);

    let size = frame.size();
    frame.clear(palette::JUMPSCARE_BACK);

    let shake = Vec2::new(
        (time_ms * 0.09).sin() as f32 * 6.0,
        (time_ms * 0.07).cos() as f32 * 4.0,
    );
    let center = size / 2.0 + shake;
    let r = size.min_element() * 0.42;

    frame.glow(center, r, r * 1.25, palette::BLOOD_DARK.with_alpha(0.8));
    frame.fill_circle(center, r, palette::JUMPSCARE_SKIN);
    // Sunken eyes
    for side in [-1.0, 1.0] {
        let eye = center + Vec2::new(side * r * 0.38, -r * 0.2);
        frame.fill_circle(eye, r * 0.2, Rgba::BLACK);
        frame.fill_circle(eye + Vec2::new(0.0, r * 0.05), r * 0.04, palette::BLOOD_BRIGHT);
    }
    // Mouth
    let mouth = center + Vec2::new(0.0, r * 0.45);
    frame.fill_round_rect(
        mouth.x - r * 0.35,
        mouth.y - r * 0.18,
        r * 0.7,
        r * 0.36,
        r * 0.15,
        Rgba::BLACK,
    );

    frame.set_origin(origin);
}
