//! A single oscillator slot inside a voice.
//!
//! Wraps an [`Oscillator`] with the per-slot gain/pan stage and the
//! frequency glide ramp. Gain and pan are smoothed so live edits never
//! click; frequency moves through a linear ramp so portamento glides are
//! scheduled once per note event and then run sample-accurately.

use polywave_config::OscillatorParams;
use polywave_core::{LinearRamp, SmoothedParam};

use crate::oscillator::Oscillator;

/// Gain/pan smoothing time for live slot edits.
const SLOT_SMOOTHING_MS: f32 = 5.0;

/// One oscillator slot: oscillator + smoothed gain + smoothed pan +
/// frequency ramp. Carries no envelope logic; the parent voice applies
/// the shared ADSR to the channel sum.
#[derive(Debug, Clone)]
pub struct VoiceChannel {
    osc: Oscillator,
    volume: SmoothedParam,
    pan: SmoothedParam,
    frequency: LinearRamp,
}

impl VoiceChannel {
    /// Create a silent channel at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            osc: Oscillator::new(sample_rate),
            volume: SmoothedParam::with_config(0.0, sample_rate, SLOT_SMOOTHING_MS),
            pan: SmoothedParam::with_config(0.0, sample_rate, SLOT_SMOOTHING_MS),
            frequency: LinearRamp::new(0.0, sample_rate),
        }
    }

    /// Update the sample rate of every stage.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.osc.set_sample_rate(sample_rate);
        self.volume.set_sample_rate(sample_rate);
        self.pan.set_sample_rate(sample_rate);
        self.frequency.set_sample_rate(sample_rate);
    }

    /// Smooth the slot gain towards `volume` (0..=1).
    pub fn set_volume(&mut self, volume: f32) {
        self.volume.set_target(volume);
    }

    /// Smooth the stereo balance towards `pan` (-1..=1).
    pub fn set_pan(&mut self, pan: f32) {
        self.pan.set_target(pan);
    }

    /// Schedule a frequency move. `glide_secs` 0 means instant.
    pub fn set_frequency(&mut self, freq_hz: f32, glide_secs: f32) {
        self.frequency.ramp_to(freq_hz, glide_secs);
    }

    /// Jump the frequency ramp to a value with no glide.
    pub fn set_frequency_immediate(&mut self, freq_hz: f32) {
        self.frequency.set_immediate(freq_hz);
    }

    /// The frequency the ramp is heading towards.
    pub fn target_frequency(&self) -> f32 {
        self.frequency.target()
    }

    /// Push a whole parameter slot into the channel.
    ///
    /// Gain and pan glide through their smoothers; shape parameters take
    /// effect on the next sample. Pitch is not touched here — the voice
    /// derives it from the note.
    pub fn apply(&mut self, params: &OscillatorParams) {
        self.volume.set_target(params.volume);
        self.pan.set_target(params.pan);
        self.osc.set_waveform(params.waveform);
        self.osc.set_pulse_width(params.pulse_width);
        self.osc.set_phase_degrees(params.phase);
        self.osc.set_invert(params.invert);
        self.osc.set_stereo(params.stereo);
    }

    /// Reset the oscillator phase for a fresh attack.
    pub fn reset_phase(&mut self) {
        self.osc.reset();
    }

    /// Generate one stereo sample pair with gain and constant-power pan
    /// applied.
    #[inline]
    pub fn process(&mut self) -> (f32, f32) {
        self.osc.set_frequency(self.frequency.advance());
        let (l, r) = self.osc.advance();

        let gain = self.volume.advance();
        let pan = self.pan.advance();

        // Constant-power balance: angle maps [-1, 1] to [0, pi/2].
        let angle = (pan + 1.0) * core::f32::consts::FRAC_PI_4;
        let (sin_a, cos_a) = libm::sincosf(angle);

        (l * gain * cos_a, r * gain * sin_a)
    }
}
