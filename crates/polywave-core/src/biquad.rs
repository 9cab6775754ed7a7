//! Second-order IIR lowpass filtering.
//!
//! The voice mix runs through one lowpass biquad per channel before it
//! reaches the master gain. Coefficients come from the RBJ Audio EQ
//! Cookbook lowpass formula; the filter itself is a plain Direct Form I
//! section.

use core::f32::consts::PI;
use libm::{cosf, sinf};

/// A Direct Form I biquad section.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Freshly constructed it is a passthrough; call
/// [`set_lowpass`](Self::set_lowpass) or
/// [`set_coefficients`](Self::set_coefficients) to configure it.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // Delay lines: x[n-1], x[n-2], y[n-1], y[n-2]
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Create a passthrough biquad (`y[n] = x[n]`).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Install raw coefficients, normalizing by `a0`.
    ///
    /// Coefficient changes take effect on the next sample; the delay
    /// lines are left untouched so retuning a running filter does not
    /// click.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Configure as an RBJ lowpass with the given cutoff and Q.
    pub fn set_lowpass(&mut self, frequency: f32, q: f32, sample_rate: f32) {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(frequency, q, sample_rate);
        self.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    /// Run one sample through the section.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Zero the delay lines without touching the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// RBJ cookbook lowpass coefficients.
///
/// `frequency` is the cutoff in Hz, `q` the resonance (0.707 for a flat
/// Butterworth response). Returns `(b0, b1, b2, a0, a1, a2)` un-normalized;
/// [`Biquad::set_coefficients`] divides through by `a0`.
///
/// The cutoff must sit below the Nyquist frequency; the caller is expected
/// to have clamped it (the parameter layer caps cutoff at 20 kHz).
pub fn lowpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::sqrtf;

    #[test]
    fn passthrough_by_default() {
        let mut biquad = Biquad::new();
        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 1e-4);
        }
    }

    #[test]
    fn clear_zeroes_state() {
        let mut biquad = Biquad::new();
        for _ in 0..10 {
            biquad.process(1.0);
        }
        biquad.clear();
        assert_eq!(biquad.x1, 0.0);
        assert_eq!(biquad.x2, 0.0);
        assert_eq!(biquad.y1, 0.0);
        assert_eq!(biquad.y2, 0.0);
    }

    #[test]
    fn lowpass_coefficients_are_finite() {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, 48000.0);
        for c in [b0, b1, b2, a0, a1, a2] {
            assert!(c.is_finite());
        }
        assert!(a0 > 0.0);
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut biquad = Biquad::new();
        biquad.set_lowpass(1000.0, 0.707, 48000.0);

        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }
        assert!(
            (output - 1.0).abs() < 0.05,
            "DC should pass with near-unity gain, got {output}"
        );
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let sample_rate = 48000.0;
        let mut biquad = Biquad::new();
        biquad.set_lowpass(500.0, 0.707, sample_rate);

        // 8kHz sine, four octaves above cutoff: -24dB/oct slope means it
        // should come out heavily attenuated.
        let freq = 8000.0;
        let mut sum_sq_in = 0.0f32;
        let mut sum_sq_out = 0.0f32;
        for n in 0..48000 {
            let x = sinf(2.0 * PI * freq * n as f32 / sample_rate);
            let y = biquad.process(x);
            // Skip the first 1000 samples while the filter settles.
            if n >= 1000 {
                sum_sq_in += x * x;
                sum_sq_out += y * y;
            }
        }
        let gain = sqrtf(sum_sq_out / sum_sq_in);
        assert!(
            gain < 0.05,
            "expected >26dB attenuation four octaves above cutoff, got gain {gain}"
        );
    }

    #[test]
    fn retune_does_not_reset_state() {
        let mut biquad = Biquad::new();
        biquad.set_lowpass(1000.0, 0.707, 48000.0);
        for _ in 0..100 {
            biquad.process(1.0);
        }
        let before = biquad.y1;
        biquad.set_lowpass(2000.0, 0.707, 48000.0);
        assert_eq!(biquad.y1, before, "retuning must keep the delay lines");
    }
}
