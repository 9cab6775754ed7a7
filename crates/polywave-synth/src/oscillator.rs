//! Stereo audio-rate oscillator.
//!
//! One oscillator renders both channels of a stereo pair from a single
//! phase accumulator; the right channel may run at a fixed phase offset
//! (`stereo`) for width. Shapes are naive sine/square/saw/triangle plus
//! xorshift white noise. Band-limiting is deliberately out of scope: the
//! voice mix runs through the master lowpass, and the shapes match the
//! source material the patch format describes.

use core::f32::consts::PI;
use libm::{floorf, sinf};
use polywave_config::Waveform;

/// Wrap a phase value into [0, 1).
#[inline]
fn wrap_phase(p: f32) -> f32 {
    let r = p - floorf(p);
    if r < 0.0 { r + 1.0 } else { r }
}

/// Stereo oscillator with per-shape parameters.
///
/// # Example
///
/// ```rust
/// use polywave_synth::Oscillator;
/// use polywave_config::Waveform;
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(440.0);
/// osc.set_waveform(Waveform::Square);
/// let (left, right) = osc.advance();
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Phase accumulator in [0, 1).
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: Waveform,
    /// Square duty cycle.
    pulse_width: f32,
    /// Starting phase offset as a cycle fraction.
    phase_offset: f32,
    invert: bool,
    /// Extra right-channel phase offset as a cycle fraction.
    stereo: f32,
    /// Independent noise states so the channels decorrelate.
    noise_left: u32,
    noise_right: u32,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create an oscillator at the given sample rate, silent at 0 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
            frequency: 0.0,
            waveform: Waveform::Sawtooth,
            pulse_width: 0.5,
            phase_offset: 0.0,
            invert: false,
            stereo: 0.0,
            noise_left: 0x12345678,
            noise_right: 0x87654321,
        }
    }

    /// Set frequency in Hz. Takes effect on the next sample; negative
    /// values clamp to 0 (silence).
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set the wave shape.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Set square duty cycle (clamped to 0.01..=0.99).
    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = width.clamp(0.01, 0.99);
    }

    /// Set the starting phase in degrees.
    pub fn set_phase_degrees(&mut self, degrees: f32) {
        self.phase_offset = wrap_phase(degrees / 360.0);
    }

    /// Flip the output polarity.
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Set the right-channel phase offset as a cycle fraction (0..=1).
    pub fn set_stereo(&mut self, offset: f32) {
        self.stereo = offset.clamp(0.0, 1.0);
    }

    /// Set sample rate and rescale the phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Reset the phase accumulator for a fresh attack.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next stereo sample pair.
    #[inline]
    pub fn advance(&mut self) -> (f32, f32) {
        if self.waveform == Waveform::Noise {
            // Noise ignores pitch and phase entirely.
            let l = xorshift_sample(&mut self.noise_left);
            let r = xorshift_sample(&mut self.noise_right);
            return self.polarity((l, r));
        }

        // A pitched shape at 0 Hz is defined to be silent.
        if self.frequency <= 0.0 {
            return (0.0, 0.0);
        }

        let left_phase = wrap_phase(self.phase + self.phase_offset);
        let right_phase = wrap_phase(left_phase + self.stereo);
        let out = (self.shape_at(left_phase), self.shape_at(right_phase));

        // Full wrap, not a single subtraction: an increment above 1.0
        // (frequency past the sample rate) must not let the accumulator
        // grow and shed f32 precision.
        self.phase = wrap_phase(self.phase + self.phase_inc);

        self.polarity(out)
    }

    #[inline]
    fn polarity(&self, (l, r): (f32, f32)) -> (f32, f32) {
        if self.invert { (-l, -r) } else { (l, r) }
    }

    #[inline]
    fn shape_at(&self, phase: f32) -> f32 {
        match self.waveform {
            Waveform::Sine => sinf(phase * 2.0 * PI),
            Waveform::Square => {
                if phase < self.pulse_width {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            // Handled in advance(); unreachable through the normal path.
            Waveform::Noise => 0.0,
        }
    }
}

/// Xorshift32 step mapped to [-1, 1].
#[inline]
fn xorshift_sample(state: &mut u32) -> f32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    (x as i32 as f32) / (i32::MAX as f32)
}
