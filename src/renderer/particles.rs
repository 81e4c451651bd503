//! Blood particles and the stains they leave
//!
//! Particles live in grid-pixel space. Each frame they fall under a small
//! gravity bias and lose a fixed amount of life; an expired particle becomes a
//! stain. Stains are capped and the oldest is evicted first.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::canvas::{Canvas, Rgba};
use super::palette;

/// Particles per blood burst
pub const BURST_SIZE: usize = 15;
/// Velocity spread per axis (pixels per frame)
pub const BURST_SPEED: f32 = 5.0;
/// Downward acceleration per frame
pub const GRAVITY: f32 = 0.2;
/// Life lost per frame
pub const LIFE_DECAY: f32 = 0.05;
/// Maximum stains kept on the floor
pub const MAX_STAINS: usize = 200;
/// Largest stain radius
pub const STAIN_MAX_RADIUS: f32 = 3.0;

/// A live blood droplet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub color: Rgba,
}

/// A droplet that has hit the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stain {
    pub pos: Vec2,
    pub radius: f32,
}

/// Particle and stain sub-simulation
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    stains: VecDeque<Stain>,
    max_particles: usize,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(max_particles: usize, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            stains: VecDeque::with_capacity(MAX_STAINS),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn stains(&self) -> impl Iterator<Item = &Stain> {
        self.stains.iter()
    }

    pub fn stain_count(&self) -> usize {
        self.stains.len()
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    /// Spray a burst of blood from `center`
    pub fn burst(&mut self, center: Vec2) {
        for _ in 0..BURST_SIZE {
            if self.particles.len() >= self.max_particles {
                if self.max_particles == 0 {
                    return;
                }
                // Oldest droplets make room
                self.particles.remove(0);
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * BURST_SPEED,
                (self.rng.random::<f32>() - 0.5) * BURST_SPEED,
            );
            let color = if self.rng.random_bool(0.5) {
                palette::BLOOD_DARK
            } else {
                palette::BLOOD_BRIGHT
            };
            self.particles.push(Particle {
                pos: center,
                vel,
                life: 1.0,
                color,
            });
        }
    }

    /// Advance one frame; expired particles become stains
    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.vel.y += GRAVITY;
            p.life -= LIFE_DECAY;
        }

        let mut expired = Vec::new();
        self.particles.retain(|p| {
            if p.life <= 0.0 {
                expired.push(p.pos);
                false
            } else {
                true
            }
        });

        for pos in expired {
            let radius = self.rng.random::<f32>() * STAIN_MAX_RADIUS;
            self.add_stain(Stain { pos, radius });
        }
    }

    fn add_stain(&mut self, stain: Stain) {
        if self.stains.len() >= MAX_STAINS {
            self.stains.pop_front();
        }
        self.stains.push_back(stain);
    }

    pub fn draw_stains(&self, canvas: &mut Canvas) {
        for stain in &self.stains {
            canvas.fill_circle(stain.pos, stain.radius, palette::STAIN);
        }
    }

    /// Particles are 2x2 squares faded by remaining life
    pub fn draw_particles(&self, canvas: &mut Canvas) {
        for p in &self.particles {
            canvas.fill_rect(p.pos.x, p.pos.y, 2.0, 2.0, p.color.fade(p.life));
        }
    }

    /// Forget everything (level start)
    pub fn clear(&mut self) {
        self.particles.clear();
        self.stains.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_spawns_fifteen() {
        let mut system = ParticleSystem::new(300, 1);
        system.burst(Vec2::new(100.0, 100.0));
        assert_eq!(system.particles().len(), BURST_SIZE);
        for p in system.particles() {
            assert!(p.vel.x.abs() <= BURST_SPEED / 2.0);
            assert!(p.vel.y.abs() <= BURST_SPEED / 2.0);
            assert!(p.color == palette::BLOOD_DARK || p.color == palette::BLOOD_BRIGHT);
        }
    }

    #[test]
    fn test_particles_fall_and_become_stains() {
        let mut system = ParticleSystem::new(300, 2);
        system.burst(Vec2::ZERO);
        let before: Vec<f32> = system.particles().iter().map(|p| p.vel.y).collect();
        system.update();
        for (p, vy) in system.particles().iter().zip(before) {
            assert!((p.vel.y - (vy + GRAVITY)).abs() < 1e-5);
        }

        // Life 1.0 at 0.05 per frame runs out around frame 20
        for _ in 0..20 {
            system.update();
        }
        assert!(system.particles().is_empty());
        assert_eq!(system.stain_count(), BURST_SIZE);
        assert!(system.stains().all(|s| s.radius < STAIN_MAX_RADIUS));
    }

    #[test]
    fn test_stains_capped_oldest_evicted() {
        let mut system = ParticleSystem::new(1000, 3);
        for i in 0..20 {
            system.burst(Vec2::new(i as f32 * 1000.0, 0.0));
            for _ in 0..25 {
                system.update();
            }
        }
        assert_eq!(system.stain_count(), MAX_STAINS);
        // 300 stains made; the first 100 (bursts 0-5 and part of 6) are gone
        let oldest = system.stains().next().map(|s| s.pos.x).unwrap_or(0.0);
        assert!(oldest >= 5900.0);
    }

    #[test]
    fn test_particle_cap() {
        let mut system = ParticleSystem::new(20, 4);
        system.burst(Vec2::ZERO);
        system.burst(Vec2::ZERO);
        assert_eq!(system.particles().len(), 20);
        system.set_max_particles(5);
        assert_eq!(system.particles().len(), 5);

        let mut none = ParticleSystem::new(0, 5);
        none.burst(Vec2::ZERO);
        assert!(none.particles().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut system = ParticleSystem::new(300, 6);
        system.burst(Vec2::ZERO);
        for _ in 0..25 {
            system.update();
        }
        system.burst(Vec2::ZERO);
        system.clear();
        assert!(system.particles().is_empty());
        assert_eq!(system.stain_count(), 0);
    }
}
