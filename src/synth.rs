use serde::{Deserialize, Serialize};

use crate::emotion::{EmotionDescriptor, Shape, WaveformChoice};

/// Fixed volume for the default synthesis path
pub const DEFAULT_VOLUME: f64 = 0.15;
/// Depth of the motion-driven frequency modulation, in Hz
pub const MODULATION_DEPTH_HZ: f64 = 30.0;
/// Linear attack ramp length in seconds
pub const ATTACK_SECONDS: f64 = 0.05;
/// Gain the exponential decay approaches by the end of the tone
pub const DECAY_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl std::fmt::Display for Waveform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Waveform::Sine => write!(f, "sine"),
            Waveform::Triangle => write!(f, "triangle"),
            Waveform::Square => write!(f, "square"),
            Waveform::Sawtooth => write!(f, "sawtooth"),
        }
    }
}

/// Frequency-modulation sub-oscillator riding on the base tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modulation {
    pub frequency: f64,
    pub depth: f64,
}

/// Linear attack to target volume, then exponential decay to near-silence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub attack: f64,
    pub decay_floor: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope {
            attack: ATTACK_SECONDS,
            decay_floor: DECAY_FLOOR,
        }
    }
}

/// One audio playback request. Abstract description only; an AudioBackend
/// turns it into actual signal generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneEvent {
    pub waveform: Waveform,
    pub frequency: f64,
    pub modulation: Option<Modulation>,
    pub duration: f64,
    pub volume: f64,
    pub envelope: Envelope,
}

impl std::fmt::Display for ToneEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:.1}Hz for {:.2}s at {:.0}% volume",
            self.waveform,
            self.frequency,
            self.duration,
            self.volume * 100.0
        )?;
        if let Some(m) = &self.modulation {
            write!(f, ", modulated at {:.1}Hz (depth {:.0}Hz)", m.frequency, m.depth)?;
        }
        Ok(())
    }
}

// The shape decides the timbre when no explicit waveform is chosen
fn waveform_for_shape(shape: Shape) -> Waveform {
    match shape {
        Shape::Circle => Waveform::Sine,
        Shape::Wave => Waveform::Triangle,
        Shape::Shard => Waveform::Square,
        _ => Waveform::Sine,
    }
}

/// Map a descriptor to its tone.
///
/// The custom sound override takes pitch/duration/volume verbatim and skips
/// frequency modulation entirely; the default path derives everything from
/// hue, rhythm and motion.
pub fn synthesize(emotion: &EmotionDescriptor) -> ToneEvent {
    let custom = &emotion.custom_sound;

    if custom.enabled {
        let waveform = match custom.waveform {
            WaveformChoice::Auto => waveform_for_shape(emotion.shape),
            WaveformChoice::Sine => Waveform::Sine,
            WaveformChoice::Triangle => Waveform::Triangle,
            WaveformChoice::Square => Waveform::Square,
            WaveformChoice::Sawtooth => Waveform::Sawtooth,
        };

        return ToneEvent {
            waveform,
            frequency: custom.pitch,
            modulation: None,
            duration: custom.duration,
            volume: (custom.volume / 100.0).clamp(0.0, 1.0),
            envelope: Envelope::default(),
        };
    }

    ToneEvent {
        waveform: waveform_for_shape(emotion.shape),
        frequency: 200.0 + (emotion.normalized_hue() / 360.0) * 600.0,
        modulation: Some(Modulation {
            frequency: emotion.motion,
            depth: MODULATION_DEPTH_HZ,
        }),
        duration: 0.5 + emotion.rhythm * 0.5,
        volume: DEFAULT_VOLUME,
        envelope: Envelope::default(),
    }
}

/// Where tone events go. A backend must cut any tone it is still playing
/// when a new one starts; starting a tone is the cancellation mechanism,
/// there is no separate stop call.
pub trait AudioBackend {
    fn play(&mut self, tone: &ToneEvent);
}

/// Stands in when the host has no audio capability; synthesis stays a
/// no-op and never blocks rendering or messaging.
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _tone: &ToneEvent) {}
}

/// Enforces the one-active-tone rule for a conversation context.
pub struct TonePlayer {
    backend: Box<dyn AudioBackend + Send>,
    active: Option<ToneEvent>,
}

impl TonePlayer {
    pub fn new(backend: Box<dyn AudioBackend + Send>) -> Self {
        TonePlayer {
            backend,
            active: None,
        }
    }

    /// Player wired to the no-op backend
    pub fn silent() -> Self {
        Self::new(Box::new(NullBackend))
    }

    pub fn play(&mut self, tone: ToneEvent) {
        self.backend.play(&tone);
        self.active = Some(tone);
    }

    /// The most recently started tone, if any
    pub fn active(&self) -> Option<&ToneEvent> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::CustomSound;

    #[test]
    fn test_default_circle_is_sine() {
        let e = EmotionDescriptor::simple(0.0, Shape::Circle, 5.0, 1.0);
        assert_eq!(synthesize(&e).waveform, Waveform::Sine);
    }

    #[test]
    fn test_default_waveforms_follow_shape() {
        for (shape, expected) in [
            (Shape::Wave, Waveform::Triangle),
            (Shape::Shard, Waveform::Square),
            (Shape::Spiral, Waveform::Sine),
            (Shape::Burst, Waveform::Sine),
            (Shape::Custom, Waveform::Sine),
        ] {
            let e = EmotionDescriptor::simple(0.0, shape, 5.0, 1.0);
            assert_eq!(synthesize(&e).waveform, expected);
        }
    }

    #[test]
    fn test_default_frequency_from_hue() {
        let e = EmotionDescriptor::simple(0.0, Shape::Circle, 5.0, 1.0);
        assert_eq!(synthesize(&e).frequency, 200.0);

        let e = EmotionDescriptor::simple(300.0, Shape::Circle, 5.0, 1.0);
        assert!((synthesize(&e).frequency - 700.0).abs() < 1e-9);

        // A wrapped hue lands on the same pitch
        let wrapped = EmotionDescriptor::simple(660.0, Shape::Circle, 5.0, 1.0);
        assert_eq!(synthesize(&wrapped).frequency, synthesize(&e).frequency);
    }

    #[test]
    fn test_default_duration_volume_modulation() {
        let e = EmotionDescriptor::simple(120.0, Shape::Wave, 4.0, 1.2);
        let tone = synthesize(&e);
        assert!((tone.duration - 1.1).abs() < 1e-9);
        assert_eq!(tone.volume, DEFAULT_VOLUME);

        let m = tone.modulation.expect("default path modulates");
        assert_eq!(m.frequency, 4.0);
        assert_eq!(m.depth, MODULATION_DEPTH_HZ);
    }

    #[test]
    fn test_custom_square_overrides_shape() {
        let mut e = EmotionDescriptor::simple(0.0, Shape::Circle, 5.0, 1.0);
        e.custom_sound = CustomSound {
            enabled: true,
            waveform: WaveformChoice::Square,
            pitch: 523.0,
            duration: 0.8,
            volume: 40.0,
        };

        let tone = synthesize(&e);
        assert_eq!(tone.waveform, Waveform::Square);
        assert_eq!(tone.frequency, 523.0);
        assert_eq!(tone.duration, 0.8);
        assert_eq!(tone.volume, 0.4);
        assert!(tone.modulation.is_none());
    }

    #[test]
    fn test_custom_auto_derives_from_shape() {
        let mut e = EmotionDescriptor::simple(0.0, Shape::Shard, 5.0, 1.0);
        e.custom_sound.enabled = true;
        assert_eq!(synthesize(&e).waveform, Waveform::Square);
        assert!(synthesize(&e).modulation.is_none());
    }

    #[test]
    fn test_new_tone_replaces_active() {
        let mut player = TonePlayer::silent();
        let a = synthesize(&EmotionDescriptor::simple(0.0, Shape::Circle, 5.0, 1.0));
        let b = synthesize(&EmotionDescriptor::simple(180.0, Shape::Shard, 2.0, 0.5));

        player.play(a.clone());
        assert_eq!(player.active(), Some(&a));

        player.play(b.clone());
        assert_eq!(player.active(), Some(&b));
    }

    #[test]
    fn test_envelope_constants() {
        let tone = synthesize(&EmotionDescriptor::default());
        assert_eq!(tone.envelope.attack, ATTACK_SECONDS);
        assert_eq!(tone.envelope.decay_floor, DECAY_FLOOR);
    }
}
