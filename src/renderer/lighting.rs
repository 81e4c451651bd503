//! Dynamic vignette
//!
//! An offscreen grid-sized buffer is filled with a dark veil whose opacity
//! breathes and jitters with stress, then a torch is erased around the head
//! and the punched buffer is composited over the frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::canvas::{Canvas, Rgba};

pub const VEIL_BASE_OPACITY: f32 = 0.75;
pub const VEIL_MIN_OPACITY: f32 = 0.5;
pub const VEIL_MAX_OPACITY: f32 = 0.95;
pub const TORCH_MAX_RADIUS: f32 = 250.0;
pub const TORCH_MIN_RADIUS: f32 = 80.0;
/// Fully lit core around the head
pub const TORCH_INNER_RADIUS: f32 = 50.0;

/// Slow breathing oscillation in [-1, 1]
pub fn breath(time_ms: f64) -> f32 {
    (time_ms * 0.003).sin() as f32
}

/// Veil opacity for a breath phase and jitter
pub fn vignette_opacity(breath: f32, jitter: f32) -> f32 {
    (VEIL_BASE_OPACITY + breath * 0.02 + jitter).clamp(VEIL_MIN_OPACITY, VEIL_MAX_OPACITY)
}

/// Opacity jitter for a uniform draw `u` in [0, 1)
pub fn opacity_jitter(stress: f32, u: f32) -> f32 {
    (u - 0.5) * stress * 0.3
}

/// Torch radius; `u` is a uniform draw in [0, 1)
pub fn torch_radius(stress: f32, breath: f32, u: f32) -> f32 {
    (TORCH_MAX_RADIUS - stress * 50.0 + breath * 5.0 + (u - 0.5) * stress * 40.0)
        .max(TORCH_MIN_RADIUS)
}

/// Vignette compositor with its own overlay buffer
#[derive(Debug, Clone)]
pub struct Lighting {
    overlay: Canvas,
    rng: Pcg32,
}

impl Lighting {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            overlay: Canvas::new(width, height),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw the vignette onto `frame` at logical (0, 0), centered on `head`
    /// (grid-pixel space).
    pub fn apply(&mut self, frame: &mut Canvas, head: Vec2, stress: f32, time_ms: f64) {
        let breath = breath(time_ms);
        let jitter = opacity_jitter(stress, self.rng.random::<f32>());
        let opacity = vignette_opacity(breath, jitter);
        let radius = torch_radius(stress, breath, self.rng.random::<f32>());

        self.overlay.clear(Rgba::BLACK.with_alpha(opacity));
        self.overlay.erase_radial(head, TORCH_INNER_RADIUS, radius);
        frame.draw_canvas(&self.overlay, 0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_calm_values() {
        assert_eq!(vignette_opacity(0.0, 0.0), 0.75);
        assert_eq!(torch_radius(0.0, 0.0, 0.9), 250.0);
        assert_eq!(opacity_jitter(0.0, 0.99), 0.0);
    }

    #[test]
    fn test_panic_shrinks_torch() {
        let r = torch_radius(1.0, 0.0, 0.5);
        assert_eq!(r, 200.0);
        assert!(torch_radius(1.0, -1.0, 0.0) < torch_radius(0.0, 1.0, 0.5));
    }

    proptest! {
        #[test]
        fn prop_vignette_bounds(
            stress in 0.0f32..=1.0,
            time in 0.0f64..1e7,
            u in 0.0f32..1.0,
        ) {
            let b = breath(time);
            let opacity = vignette_opacity(b, opacity_jitter(stress, u));
            prop_assert!((VEIL_MIN_OPACITY..=VEIL_MAX_OPACITY).contains(&opacity));
            prop_assert!(torch_radius(stress, b, u) >= TORCH_MIN_RADIUS);
        }
    }

    #[test]
    fn test_torch_lights_head_and_darkens_corners() {
        let mut frame = Canvas::new(400, 200);
        frame.clear(Rgba::WHITE);
        let mut lighting = Lighting::new(400, 200, 7);
        lighting.apply(&mut frame, Vec2::new(50.0, 50.0), 0.0, 0.0);

        assert_eq!(frame.pixel(50, 50), Some(Rgba::WHITE));
        let corner = frame.pixel(399, 199).map(|p| p.r).unwrap_or(255);
        // 0.75 +/- 0.02 veil leaves roughly a quarter of the light
        assert!(corner < 80, "corner too bright: {corner}");
    }
}
