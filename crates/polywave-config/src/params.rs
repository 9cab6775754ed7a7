//! The strongly-typed parameter tree.
//!
//! Every knob the engine exposes lives in [`SynthParams`]. The engine only
//! ever sees sanitized values: [`SynthParams::sanitize`] clamps each field
//! into its legal range, so out-of-range patch data degrades to the nearest
//! legal value instead of failing the load.

use serde::{Deserialize, Serialize};

/// Oscillator wave shape.
///
/// Serialized with lowercase tags (`"sine"`, `"square"`, ...) to match the
/// patch JSON format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// Pure sine.
    Sine,
    /// Square wave; honors `pulse_width`.
    Square,
    /// Rising sawtooth.
    #[default]
    Sawtooth,
    /// Triangle wave.
    Triangle,
    /// White noise. Ignores pitch entirely.
    Noise,
}

/// Voice allocation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoicingMode {
    /// One voice per held note, round-robin stealing when full.
    #[default]
    Poly,
    /// Single voice, legato retrigger, portamento glides.
    Mono,
}

/// Settings for one oscillator slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OscillatorParams {
    /// Wave shape.
    pub waveform: Waveform,
    /// Slot gain, 0..=1.
    pub volume: f32,
    /// Stereo position, -1 (hard left) ..= 1 (hard right).
    pub pan: f32,
    /// Pitch offset in semitones, -48..=48.
    pub coarse_pitch: i32,
    /// Pitch offset in cents, -1200..=1200.
    pub fine_pitch: f32,
    /// Square duty cycle, 0.01..=0.99. Ignored by other shapes.
    pub pulse_width: f32,
    /// Starting phase in degrees, wrapped into [0, 360).
    pub phase: f32,
    /// Polarity flip.
    pub invert: bool,
    /// Extra right-channel phase offset as a fraction of a cycle, 0..=1.
    pub stereo: f32,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sawtooth,
            volume: 0.5,
            pan: 0.0,
            coarse_pitch: 0,
            fine_pitch: 0.0,
            pulse_width: 0.5,
            phase: 0.0,
            invert: false,
            stereo: 0.0,
        }
    }
}

impl OscillatorParams {
    /// Clamp every field into its legal range.
    pub fn sanitize(&mut self) {
        self.volume = self.volume.clamp(0.0, 1.0);
        self.pan = self.pan.clamp(-1.0, 1.0);
        self.coarse_pitch = self.coarse_pitch.clamp(-48, 48);
        self.fine_pitch = self.fine_pitch.clamp(-1200.0, 1200.0);
        self.pulse_width = self.pulse_width.clamp(0.01, 0.99);
        self.phase = self.phase.rem_euclid(360.0);
        self.stereo = self.stereo.clamp(0.0, 1.0);
    }
}

/// ADSR envelope timings, shared by all oscillators of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeParams {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level as a fraction of peak, 0..=1.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.8,
            release: 0.5,
        }
    }
}

impl EnvelopeParams {
    /// Clamp times to be non-negative and sustain into 0..=1.
    pub fn sanitize(&mut self) {
        self.attack = self.attack.max(0.0);
        self.decay = self.decay.max(0.0);
        self.sustain = self.sustain.clamp(0.0, 1.0);
        self.release = self.release.max(0.0);
    }
}

/// Master lowpass filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Cutoff frequency in Hz, 20..=20000.
    pub cutoff: f32,
    /// Resonance (Q), 0.1..=20.
    pub resonance: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff: 20000.0,
            resonance: 0.707,
        }
    }
}

impl FilterParams {
    /// Clamp into legal ranges.
    ///
    /// Patch files from the original format carry a resonance of 0 for
    /// "no resonance"; an RBJ biquad cannot take Q = 0, so non-positive
    /// resonance maps to the flat Butterworth Q of 0.707.
    pub fn sanitize(&mut self) {
        self.cutoff = self.cutoff.clamp(20.0, 20000.0);
        if self.resonance <= 0.0 {
            self.resonance = 0.707;
        } else {
            self.resonance = self.resonance.clamp(0.1, 20.0);
        }
    }
}

/// The complete parameter tree a synth instance runs on.
///
/// Exactly three oscillator slots; the fixed array makes the slot count an
/// invariant of the type rather than a runtime check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthParams {
    /// Output gain after the filter, 0..=1.
    pub master_volume: f32,
    /// Master lowpass filter.
    pub filter: FilterParams,
    /// Shared ADSR envelope.
    pub envelope: EnvelopeParams,
    /// Glide time in seconds for note-to-note transitions. 0 disables.
    pub portamento: f32,
    /// Voice allocation mode.
    pub voicing: VoicingMode,
    /// The three oscillator slots.
    pub oscillators: [OscillatorParams; 3],
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            filter: FilterParams::default(),
            envelope: EnvelopeParams::default(),
            portamento: 0.0,
            voicing: VoicingMode::Poly,
            oscillators: [OscillatorParams::default(); 3],
        }
    }
}

impl SynthParams {
    /// Clamp every field of the tree into its legal range.
    pub fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.filter.sanitize();
        self.envelope.sanitize();
        self.portamento = self.portamento.max(0.0);
        for osc in &mut self.oscillators {
            osc.sanitize();
        }
    }

    /// A sanitized copy.
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}
