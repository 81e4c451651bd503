//! Horror effect scheduler
//!
//! Runs once per simulation tick, after sanity has drained, and rolls the
//! independent scare subsystems:
//! - heartbeat cadence tied to sanity bands
//! - sustained hallucinations (one at a time)
//! - whispers
//! - screen glitches
//! - subliminal flashes
//! - the zero-sanity jumpscare
//!
//! Timed effects expire through `expire`, which the game loop calls every
//! frame with the same monotonic clock.

pub mod timer;

pub use timer::EffectTimer;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::SoundCue;
use crate::settings::Settings;
use crate::stress_from_sanity;

/// Probability scale shared by hallucinations, whispers and glitches
pub const BASE_RATE: f64 = 0.01;
/// Per-tick subliminal flash chance below 60 sanity
pub const SCARE_CHANCE: f64 = 0.005;
/// Per-tick jumpscare chance once sanity is gone
pub const ZERO_SANITY_JUMPSCARE_CHANCE: f64 = 0.05;

/// Heartbeat starts below this sanity
pub const HEARTBEAT_SANITY: f32 = 80.0;
/// Subliminal flashes start below this sanity
pub const SCARE_SANITY: f32 = 60.0;

pub const FLASH_DURATION_MS: f64 = 100.0;
pub const JUMPSCARE_DURATION_MS: f64 = 800.0;
pub const HALLUCINATION_MIN_MS: f64 = 2000.0;
pub const HALLUCINATION_SPAN_MS: f64 = 4000.0;
pub const GLITCH_MIN_MS: f64 = 300.0;
/// Random part of a glitch hold, scaled by intensity: `MIN + U * SPAN * intensity`
pub const GLITCH_SPAN_MS: f64 = 500.0;

/// Sustained visual distortion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hallucination {
    Tilt,
    Breathe,
    Warp,
    Darkness,
}

impl Hallucination {
    pub const ALL: [Hallucination; 4] = [
        Hallucination::Tilt,
        Hallucination::Breathe,
        Hallucination::Warp,
        Hallucination::Darkness,
    ];
}

/// How a jumpscare resolves once its overlay ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jumpscare {
    /// The run ends (game over)
    Fatal,
    /// The player survives with sanity reset to 50
    Recoverable,
}

/// Effects that ran out during `expire`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEnded {
    Hallucination(Hallucination),
    Flash,
    Glitch,
    Jumpscare(Jumpscare),
}

/// Per-tick trigger probabilities derived from sanity and intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorrorOdds {
    pub hallucination: f64,
    pub whisper: f64,
    pub glitch: f64,
}

impl HorrorOdds {
    pub fn new(sanity: f32, intensity: f32) -> Self {
        let intensity = intensity.max(0.0) as f64;
        let stress = stress_from_sanity(sanity) as f64;
        let base = BASE_RATE * intensity * stress;
        Self {
            hallucination: base * 0.5,
            whisper: base * 0.3,
            glitch: base,
        }
    }
}

/// Heartbeat cooldown for a sanity level
pub fn heartbeat_interval_ms(sanity: f32) -> f64 {
    if sanity < 20.0 {
        400.0
    } else if sanity < 40.0 {
        600.0
    } else if sanity < 70.0 {
        1000.0
    } else {
        2000.0
    }
}

/// Read-only view of active effects for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HorrorView {
    pub hallucination: Option<Hallucination>,
    pub flash: bool,
    pub glitch: bool,
    pub jumpscare: bool,
    /// Glitch strength (the intensity setting at trigger time)
    pub glitch_intensity: f32,
}

/// The horror director
#[derive(Debug, Clone)]
pub struct HorrorScheduler {
    hallucination: EffectTimer<Hallucination>,
    flash: EffectTimer<()>,
    glitch: EffectTimer<f32>,
    jumpscare: EffectTimer<Jumpscare>,
    last_heartbeat_ms: Option<f64>,
    rng: Pcg32,
}

impl HorrorScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            hallucination: EffectTimer::new(),
            flash: EffectTimer::new(),
            glitch: EffectTimer::new(),
            jumpscare: EffectTimer::new(),
            last_heartbeat_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Clear every effect (level start)
    pub fn reset(&mut self) {
        self.hallucination.reset();
        self.flash.reset();
        self.glitch.reset();
        self.jumpscare.reset();
        self.last_heartbeat_ms = None;
    }

    /// Roll every subsystem for one tick. Returns the cues to play.
    pub fn on_tick(&mut self, now_ms: f64, sanity: f32, settings: &Settings) -> Vec<SoundCue> {
        let mut cues = Vec::new();

        if settings.sanity_fx && sanity < HEARTBEAT_SANITY {
            let due = self
                .last_heartbeat_ms
                .map(|last| now_ms - last > heartbeat_interval_ms(sanity))
                .unwrap_or(true);
            if due {
                self.last_heartbeat_ms = Some(now_ms);
                cues.push(SoundCue::Heartbeat);
            }
        }

        let intensity = settings.effective_intensity();
        if intensity > 0.0 {
            let odds = HorrorOdds::new(sanity, intensity);

            if !self.hallucination.is_active() && self.rng.random::<f64>() < odds.hallucination {
                let kind = Hallucination::ALL[self.rng.random_range(0..Hallucination::ALL.len())];
                let duration = HALLUCINATION_MIN_MS + self.rng.random::<f64>() * HALLUCINATION_SPAN_MS;
                self.trigger_hallucination(kind, now_ms, duration);
            }

            if self.rng.random::<f64>() < odds.whisper {
                cues.push(SoundCue::Whisper);
            }

            if !self.glitch.is_active() && self.rng.random::<f64>() < odds.glitch {
                self.trigger_glitch(now_ms, intensity);
            }
        }

        if settings.random_scares
            && sanity < SCARE_SANITY
            && self.rng.random::<f64>() < SCARE_CHANCE
            && self.trigger_flash(now_ms)
        {
            cues.push(SoundCue::SuddenNoise);
        }

        if sanity <= 0.0
            && self.rng.random::<f64>() < ZERO_SANITY_JUMPSCARE_CHANCE
            && self.trigger_jumpscare(Jumpscare::Fatal, now_ms)
        {
            cues.push(SoundCue::Screech);
        }

        cues
    }

    /// Start a sustained distortion unless one is already running
    pub fn trigger_hallucination(&mut self, kind: Hallucination, now_ms: f64, duration_ms: f64) -> bool {
        if self.hallucination.is_active() {
            return false;
        }
        log::debug!("Hallucination {:?} for {:.0}ms", kind, duration_ms);
        self.hallucination.arm(kind, now_ms, duration_ms);
        true
    }

    /// Start a glitch burst of 300 + U[0,1) * 500 * intensity ms
    pub fn trigger_glitch(&mut self, now_ms: f64, intensity: f32) -> bool {
        if self.glitch.is_active() {
            return false;
        }
        let duration =
            GLITCH_MIN_MS + self.rng.random::<f64>() * GLITCH_SPAN_MS * intensity.max(0.0) as f64;
        self.glitch.arm(intensity, now_ms, duration);
        true
    }

    /// 100ms subliminal flash
    pub fn trigger_flash(&mut self, now_ms: f64) -> bool {
        if self.flash.is_active() {
            return false;
        }
        self.flash.arm((), now_ms, FLASH_DURATION_MS);
        true
    }

    /// Show the jumpscare overlay; its resolution is reported by `expire`
    pub fn trigger_jumpscare(&mut self, kind: Jumpscare, now_ms: f64) -> bool {
        if self.jumpscare.is_active() {
            return false;
        }
        log::info!("Jumpscare ({:?})", kind);
        self.jumpscare.arm(kind, now_ms, JUMPSCARE_DURATION_MS);
        true
    }

    /// Retire every effect whose deadline has passed
    pub fn expire(&mut self, now_ms: f64) -> Vec<EffectEnded> {
        let mut ended = Vec::new();
        if let Some(kind) = self.hallucination.expire(now_ms) {
            ended.push(EffectEnded::Hallucination(kind));
        }
        if self.flash.expire(now_ms).is_some() {
            ended.push(EffectEnded::Flash);
        }
        if self.glitch.expire(now_ms).is_some() {
            ended.push(EffectEnded::Glitch);
        }
        if let Some(kind) = self.jumpscare.expire(now_ms) {
            ended.push(EffectEnded::Jumpscare(kind));
        }
        ended
    }

    pub fn hallucination(&self) -> Option<Hallucination> {
        self.hallucination.active()
    }

    pub fn jumpscare(&self) -> Option<Jumpscare> {
        self.jumpscare.active()
    }

    pub fn view(&self) -> HorrorView {
        HorrorView {
            hallucination: self.hallucination.active(),
            flash: self.flash.is_active(),
            glitch: self.glitch.is_active(),
            jumpscare: self.jumpscare.is_active(),
            glitch_intensity: self.glitch.active().unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm_settings() -> Settings {
        Settings {
            sanity_fx: false,
            random_scares: false,
            ..Settings::default()
        }
    }

    #[test]
    fn test_odds_zero_when_calm_or_disabled() {
        let calm = HorrorOdds::new(100.0, 2.0);
        assert_eq!(calm.hallucination, 0.0);
        assert_eq!(calm.whisper, 0.0);
        assert_eq!(calm.glitch, 0.0);

        let off = HorrorOdds::new(0.0, 0.0);
        assert_eq!(off.hallucination, 0.0);
        assert_eq!(off.whisper, 0.0);
        assert_eq!(off.glitch, 0.0);
    }

    #[test]
    fn test_odds_scale_with_stress() {
        let odds = HorrorOdds::new(0.0, 1.0);
        assert!((odds.glitch - 0.01).abs() < 1e-9);
        assert!((odds.hallucination - 0.005).abs() < 1e-9);
        assert!((odds.whisper - 0.003).abs() < 1e-9);
    }

    #[test]
    fn test_full_sanity_never_triggers() {
        let mut horror = HorrorScheduler::new(1);
        let settings = Settings::default();
        for i in 0..20_000 {
            let cues = horror.on_tick(i as f64 * 150.0, 100.0, &settings);
            assert!(cues.is_empty());
            assert_eq!(horror.view(), HorrorView::default());
        }
    }

    #[test]
    fn test_zero_intensity_never_triggers() {
        let mut horror = HorrorScheduler::new(2);
        let mut settings = calm_settings();
        settings.set_glitch_intensity(0.0);
        for i in 0..20_000 {
            let now = i as f64 * 150.0;
            let cues = horror.on_tick(now, 30.0, &settings);
            assert!(!cues.contains(&SoundCue::Whisper));
            assert!(horror.hallucination().is_none());
            assert!(!horror.view().glitch);
        }
    }

    #[test]
    fn test_heartbeat_interval_bands() {
        assert_eq!(heartbeat_interval_ms(75.0), 2000.0);
        assert_eq!(heartbeat_interval_ms(69.9), 1000.0);
        assert_eq!(heartbeat_interval_ms(39.0), 600.0);
        assert_eq!(heartbeat_interval_ms(10.0), 400.0);
    }

    #[test]
    fn test_heartbeat_respects_cooldown() {
        let mut horror = HorrorScheduler::new(3);
        let mut settings = calm_settings();
        settings.sanity_fx = true;
        settings.set_glitch_intensity(0.0);

        let beats = |cues: Vec<SoundCue>| cues.contains(&SoundCue::Heartbeat);
        assert!(beats(horror.on_tick(0.0, 50.0, &settings)));
        assert!(!beats(horror.on_tick(900.0, 50.0, &settings)));
        assert!(beats(horror.on_tick(1050.0, 50.0, &settings)));
        // No heartbeat while calm
        assert!(!beats(horror.on_tick(9000.0, 85.0, &settings)));
    }

    #[test]
    fn test_hallucination_is_singular_until_expiry() {
        let mut horror = HorrorScheduler::new(4);
        assert!(horror.trigger_hallucination(Hallucination::Warp, 0.0, 3000.0));
        assert!(!horror.trigger_hallucination(Hallucination::Tilt, 100.0, 3000.0));

        // Panic-level rolls cannot preempt it
        let settings = Settings {
            glitch_intensity: 2.0,
            ..calm_settings()
        };
        for i in 0..19 {
            horror.on_tick(i as f64 * 150.0, 0.5, &settings);
            horror.expire(i as f64 * 150.0);
            assert_eq!(horror.hallucination(), Some(Hallucination::Warp));
        }

        assert_eq!(
            horror.expire(3000.0).first(),
            Some(&EffectEnded::Hallucination(Hallucination::Warp))
        );
        assert!(horror.trigger_hallucination(Hallucination::Tilt, 3000.0, 2000.0));
    }

    #[test]
    fn test_stress_eventually_hallucinates() {
        let mut horror = HorrorScheduler::new(5);
        let settings = Settings {
            glitch_intensity: 2.0,
            ..calm_settings()
        };
        let mut seen = false;
        for i in 0..20_000 {
            let now = i as f64 * 150.0;
            horror.on_tick(now, 1.0, &settings);
            if let Some(kind) = horror.hallucination() {
                let until = horror.hallucination.expires_at().unwrap();
                let span = until - now;
                assert!((HALLUCINATION_MIN_MS..HALLUCINATION_MIN_MS + HALLUCINATION_SPAN_MS).contains(&span));
                assert!(Hallucination::ALL.contains(&kind));
                seen = true;
                break;
            }
        }
        assert!(seen);
    }

    #[test]
    fn test_glitch_duration_window() {
        let mut horror = HorrorScheduler::new(6);
        for i in 0..50 {
            let now = i as f64 * 10_000.0;
            assert!(horror.trigger_glitch(now, 1.0));
            assert!(!horror.trigger_glitch(now, 1.0));
            let span = horror.glitch.expires_at().unwrap() - now;
            assert!((GLITCH_MIN_MS..GLITCH_MIN_MS + GLITCH_SPAN_MS).contains(&span));
            horror.expire(now + 5_000.0);
        }
    }

    #[test]
    fn test_flash_is_guarded_and_short() {
        let mut horror = HorrorScheduler::new(7);
        assert!(horror.trigger_flash(0.0));
        assert!(!horror.trigger_flash(50.0));
        assert!(horror.view().flash);
        assert_eq!(horror.expire(100.0), vec![EffectEnded::Flash]);
        assert!(!horror.view().flash);
    }

    #[test]
    fn test_zero_sanity_jumpscare_is_fatal() {
        let mut horror = HorrorScheduler::new(8);
        let mut settings = calm_settings();
        settings.set_glitch_intensity(0.0);
        let mut fired_at = None;
        for i in 0..2_000 {
            let now = i as f64 * 150.0;
            let cues = horror.on_tick(now, 0.0, &settings);
            if cues.contains(&SoundCue::Screech) {
                fired_at = Some(now);
                break;
            }
        }
        let fired_at = fired_at.expect("5% per tick should fire");
        assert_eq!(horror.jumpscare(), Some(Jumpscare::Fatal));

        // Guarded while active
        assert!(!horror.trigger_jumpscare(Jumpscare::Recoverable, fired_at + 10.0));
        assert_eq!(
            horror.expire(fired_at + JUMPSCARE_DURATION_MS),
            vec![EffectEnded::Jumpscare(Jumpscare::Fatal)]
        );
    }

    #[test]
    fn test_reset_clears_all() {
        let mut horror = HorrorScheduler::new(9);
        horror.trigger_hallucination(Hallucination::Darkness, 0.0, 5000.0);
        horror.trigger_flash(0.0);
        horror.trigger_glitch(0.0, 1.0);
        horror.trigger_jumpscare(Jumpscare::Recoverable, 0.0);
        horror.reset();
        assert_eq!(horror.view(), HorrorView::default());
        assert!(horror.expire(1e9).is_empty());
    }
}
