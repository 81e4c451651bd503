//! Web Audio synthesis
//!
//! Procedurally generated cues - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, SoundCue};

/// Audio manager for the browser build
pub struct WebAudio {
    ctx: Option<AudioContext>,
    master_volume: f32,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.5,
        }
    }

    /// Create an oscillator routed through a gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Pitch sweep with an exponential fade
    #[allow(clippy::too_many_arguments)]
    fn sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        from: f32,
        to: f32,
        gain_level: f32,
        start: f64,
        duration: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        gain.gain().set_value_at_time(gain_level, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, start + duration)
            .ok();
        osc.frequency().set_value_at_time(from, start).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, start + duration)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + duration + 0.05).ok();
    }

    /// Footstep - dull tick
    fn play_move(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Triangle, 90.0, 50.0, vol * 0.08, t, 0.05);
    }

    /// Meat - wet low squelch
    fn play_eat(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Sawtooth, 180.0, 40.0, vol * 0.4, t, 0.2);
        self.sweep(ctx, OscillatorType::Sine, 90.0, 30.0, vol * 0.5, t + 0.03, 0.25);
    }

    /// Unlock - two rising chimes
    fn play_unlock(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Sine, 440.0, 660.0, vol * 0.3, t, 0.25);
        self.sweep(ctx, OscillatorType::Sine, 660.0, 990.0, vol * 0.3, t + 0.15, 0.35);
    }

    /// Heartbeat - lub-dub thump
    fn play_heartbeat(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Sine, 60.0, 40.0, vol * 0.8, t, 0.15);
        self.sweep(ctx, OscillatorType::Sine, 55.0, 35.0, vol * 0.6, t + 0.2, 0.15);
    }

    /// Subliminal scare - harsh square stab
    fn play_sudden_noise(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Square, 1200.0, 300.0, vol * 0.5, t, 0.12);
    }

    /// Whisper - faint detuned pair drifting downward
    fn play_whisper(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Triangle, 2400.0, 1800.0, vol * 0.03, t, 1.2);
        self.sweep(ctx, OscillatorType::Triangle, 2417.0, 1790.0, vol * 0.03, t + 0.1, 1.1);
    }

    /// Jumpscare - rising screech
    fn play_screech(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        self.sweep(ctx, OscillatorType::Sawtooth, 800.0, 2400.0, vol * 0.7, t, 0.6);
        self.sweep(ctx, OscillatorType::Square, 810.0, 2300.0, vol * 0.4, t, 0.6);
    }
}

impl AudioSink for WebAudio {
    fn play(&self, cue: SoundCue) {
        let vol = self.master_volume;
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Move => self.play_move(ctx, vol),
            SoundCue::Eat => self.play_eat(ctx, vol),
            SoundCue::Unlock => self.play_unlock(ctx, vol),
            SoundCue::Heartbeat => self.play_heartbeat(ctx, vol),
            SoundCue::SuddenNoise => self.play_sudden_noise(ctx, vol),
            SoundCue::Whisper => self.play_whisper(ctx, vol),
            SoundCue::Screech => self.play_screech(ctx, vol),
        }
    }
}
