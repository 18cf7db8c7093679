//! Sound effects using the Web Audio API
//!
//! Every effect is a short synthesized tone; there are no audio files.
//! If the browser refuses an `AudioContext` the game simply stays silent.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    PaddleHit,
    WallHit,
    BrickBreak,
    LevelClear,
    LevelStart,
    GameOver,
}

impl SoundEffect {
    /// The effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(Self::PaddleHit),
            GameEvent::WallHit => Some(Self::WallHit),
            GameEvent::BrickBroken { .. } => Some(Self::BrickBreak),
            GameEvent::LevelCleared { .. } => Some(Self::LevelClear),
            GameEvent::LevelStarted { .. } | GameEvent::Restarted => Some(Self::LevelStart),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
        }
    }
}

/// Audio output for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context or without audio hardware
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Resume audio context (browsers require a user gesture first)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play the effects for a batch of simulation events at `volume`
    pub fn play_events(&self, events: &[GameEvent], volume: f32) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect, volume);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::PaddleHit => {
                tone(ctx, OscillatorType::Sine, 220.0, Some(110.0), volume * 0.5, 0.0, 0.12)
            }
            SoundEffect::WallHit => {
                tone(ctx, OscillatorType::Sine, 440.0, None, volume * 0.25, 0.0, 0.08)
            }
            SoundEffect::BrickBreak => {
                tone(ctx, OscillatorType::Square, 660.0, Some(990.0), volume * 0.2, 0.0, 0.1);
                tone(ctx, OscillatorType::Sine, 80.0, None, volume * 0.25, 0.0, 0.1);
            }
            SoundEffect::LevelClear => arpeggio(ctx, &[523.0, 659.0, 784.0, 1047.0], 0.1, volume),
            SoundEffect::LevelStart => {
                tone(ctx, OscillatorType::Triangle, 300.0, Some(600.0), volume * 0.3, 0.0, 0.2)
            }
            SoundEffect::GameOver => arpeggio(ctx, &[392.0, 330.0, 262.0, 196.0], 0.2, volume),
        }
    }
}

/// Oscillator routed through its own gain node to the speakers
fn voice(ctx: &AudioContext, kind: OscillatorType, freq: f32) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.set_type(kind);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    Some((osc, gain))
}

/// One decaying note, optionally gliding to `glide_to`
fn tone(
    ctx: &AudioContext,
    kind: OscillatorType,
    freq: f32,
    glide_to: Option<f32>,
    level: f32,
    delay: f64,
    duration: f64,
) {
    let Some((osc, gain)) = voice(ctx, kind, freq) else {
        return;
    };
    let t = ctx.current_time() + delay;
    gain.gain().set_value_at_time(level, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + duration)
        .ok();
    if let Some(target) = glide_to {
        osc.frequency().set_value_at_time(freq, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(target, t + duration)
            .ok();
    }
    osc.start_with_when(t).ok();
    osc.stop_with_when(t + duration + 0.02).ok();
}

/// Notes played one after another, `step` seconds apart
fn arpeggio(ctx: &AudioContext, notes: &[f32], step: f64, volume: f32) {
    for (i, &freq) in notes.iter().enumerate() {
        tone(
            ctx,
            OscillatorType::Triangle,
            freq,
            None,
            volume * 0.3,
            i as f64 * step,
            0.3,
        );
    }
}
