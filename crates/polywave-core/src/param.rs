//! Scheduled parameter motion for click-free automation.
//!
//! Audio parameters must never step abruptly at control rate, or the output
//! picks up audible zipper noise. The two types here are the only paths a
//! control-plane write takes into the render loop: an exponential smoother
//! for "just make it not click" parameters (gain, pan), and a linear ramp
//! with an explicit duration for motion the caller times (portamento glides,
//! envelope segments).
//!
//! Both types enforce the one-pending-ramp rule: scheduling a new target
//! cancels whatever was in flight and continues from the current value, so
//! there is never more than one outstanding trajectory per parameter.

use libm::expf;

/// A parameter with exponential (one-pole lowpass) smoothing.
///
/// # Example
///
/// ```rust
/// use polywave_core::SmoothedParam;
///
/// let mut gain = SmoothedParam::with_config(1.0, 48000.0, 5.0);
/// gain.set_target(0.25);
/// for _ in 0..480 {
///     let g = gain.advance();
///     // apply g per sample...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// One-pole coefficient; 1.0 means instant.
    coeff: f32,
    sample_rate: f32,
    smoothing_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter. Smoothing is off (instant) until
    /// [`set_smoothing_ms`](Self::set_smoothing_ms) configures it.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_ms: 0.0,
        }
    }

    /// Create with sample rate and smoothing time in one call.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_ms: f32) -> Self {
        let mut p = Self::new(initial);
        p.sample_rate = sample_rate;
        p.smoothing_ms = smoothing_ms;
        p.recalculate_coeff();
        p
    }

    /// Schedule a new target. Cancels any in-flight motion and smooths
    /// from the current value.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to a value with no smoothing.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Update the sample rate, preserving the smoothing time.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set the smoothing time constant in milliseconds (0 = instant).
    pub fn set_smoothing_ms(&mut self, ms: f32) {
        self.smoothing_ms = ms;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The value being smoothed towards.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    // coeff = 1 - exp(-1 / (tau * sample_rate)); one time constant reaches
    // ~63.2% of the way, five reaches ~99.3%.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A parameter that moves linearly to a target over a caller-given duration.
///
/// This is the "linear ramp to value by future time" scheduling primitive:
/// the glide duration is an argument of every ramp, not a property of the
/// parameter, because portamento time is decided per note event. A ramp of
/// zero seconds completes immediately.
///
/// Scheduling a new ramp while one is running cancels it and restarts from
/// the current value; at any instant at most one segment is pending.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    increment: f32,
    samples_remaining: u32,
    sample_rate: f32,
}

impl LinearRamp {
    /// Create a ramp resting at `initial`.
    pub fn new(initial: f32, sample_rate: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            sample_rate,
        }
    }

    /// Schedule a linear ramp from the current value to `target` over
    /// `seconds`. Negative durations are treated as zero (instant).
    pub fn ramp_to(&mut self, target: f32, seconds: f32) {
        self.target = target;
        let samples = (seconds.max(0.0) * self.sample_rate) as u32;
        if samples == 0 {
            self.current = target;
            self.increment = 0.0;
            self.samples_remaining = 0;
        } else {
            self.increment = (target - self.current) / samples as f32;
            self.samples_remaining = samples;
        }
    }

    /// Cancel any pending ramp and jump to `value`.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }

    /// Update the sample rate. Affects ramps scheduled after this call;
    /// an in-flight segment keeps its original per-sample increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Advance one sample and return the current value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                // Snap to the exact target so rounding never accumulates.
                self.current = self.target;
            } else if self.increment > 0.0 {
                // Accumulated f32 rounding must never carry the value past
                // the target before the final snap.
                self.current = self.current.min(self.target);
            } else {
                self.current = self.current.max(self.target);
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The value being ramped towards.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True when no segment is pending.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn smoothed_param_instant_without_smoothing() {
        let mut p = SmoothedParam::with_config(1.0, 48000.0, 0.0);
        p.set_target(0.5);
        assert!(
            (p.advance() - 0.5).abs() < 1e-6,
            "zero smoothing time must snap to target"
        );
    }

    #[test]
    fn smoothed_param_converges() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        // 50ms = five time constants
        for _ in 0..(48000 * 50 / 1000) {
            p.advance();
        }
        assert!(
            (p.get() - 1.0).abs() < 0.01,
            "expected convergence to 1.0, got {}",
            p.get()
        );
    }

    #[test]
    fn smoothed_param_one_time_constant() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..480 {
            p.advance();
        }
        let expected = 1.0 - expf(-1.0);
        assert!(
            (p.get() - expected).abs() < 0.05,
            "after one tau expected ~{expected}, got {}",
            p.get()
        );
    }

    #[test]
    fn smoothed_param_retarget_continues_from_current() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        for _ in 0..100 {
            p.advance();
        }
        let mid = p.get();
        assert!(mid > 0.0 && mid < 1.0);

        // New target mid-flight: motion resumes from `mid`, not from 0.
        p.set_target(0.0);
        let next = p.advance();
        assert!(next <= mid, "retarget must continue from current value");
    }

    #[test]
    fn linear_ramp_reaches_target_in_exact_time() {
        let mut r = LinearRamp::new(0.0, 48000.0);
        r.ramp_to(1.0, 0.010);
        for _ in 0..480 {
            r.advance();
        }
        assert!(
            (r.get() - 1.0).abs() < 1e-5,
            "10ms ramp at 48kHz should finish in 480 samples, got {}",
            r.get()
        );
        assert!(r.is_settled());
    }

    #[test]
    fn linear_ramp_is_halfway_at_half_time() {
        let mut r = LinearRamp::new(0.0, 48000.0);
        r.ramp_to(1.0, 0.010);
        for _ in 0..240 {
            r.advance();
        }
        assert!((r.get() - 0.5).abs() < 0.01, "got {}", r.get());
    }

    #[test]
    fn linear_ramp_zero_duration_is_instant() {
        let mut r = LinearRamp::new(0.3, 48000.0);
        r.ramp_to(0.9, 0.0);
        assert_eq!(r.get(), 0.9);
        assert!(r.is_settled());
    }

    #[test]
    fn linear_ramp_negative_duration_clamps_to_instant() {
        let mut r = LinearRamp::new(0.0, 48000.0);
        r.ramp_to(1.0, -5.0);
        assert_eq!(r.get(), 1.0);
    }

    #[test]
    fn linear_ramp_reschedule_cancels_pending_segment() {
        let mut r = LinearRamp::new(0.0, 48000.0);
        r.ramp_to(1.0, 0.010);
        for _ in 0..240 {
            r.advance();
        }
        let mid = r.get();

        // Re-ramp down; the old upward segment must be gone.
        r.ramp_to(0.0, 0.010);
        let next = r.advance();
        assert!(
            next < mid,
            "rescheduled ramp must start descending from {mid}, got {next}"
        );
        for _ in 0..480 {
            r.advance();
        }
        assert!((r.get()).abs() < 1e-5);
    }

    #[test]
    fn downward_ramp_never_dips_below_target() {
        // Rounding in the per-sample accumulation used to push the value a
        // fraction past the target right before the final snap.
        let mut r = LinearRamp::new(0.7375, 48000.0);
        r.ramp_to(0.0, 0.3406);
        for _ in 0..20000 {
            let v = r.advance();
            assert!(v >= 0.0, "release-style ramp went below zero: {v}");
        }
        assert_eq!(r.get(), 0.0);
    }

    proptest! {
        #[test]
        fn linear_ramp_never_overshoots(
            start in -1.0f32..1.0,
            target in -1.0f32..1.0,
            seconds in 0.0f32..0.5,
        ) {
            let mut r = LinearRamp::new(start, 48000.0);
            r.ramp_to(target, seconds);
            let lo = start.min(target) - 1e-4;
            let hi = start.max(target) + 1e-4;
            for _ in 0..((seconds * 48000.0) as usize + 16) {
                let v = r.advance();
                prop_assert!(v >= lo && v <= hi, "value {v} left [{lo}, {hi}]");
            }
            prop_assert!((r.get() - target).abs() < 1e-3);
        }

        #[test]
        fn smoothed_param_stays_between_start_and_target(
            start in -1.0f32..1.0,
            target in -1.0f32..1.0,
        ) {
            let mut p = SmoothedParam::with_config(start, 48000.0, 10.0);
            p.set_target(target);
            let lo = start.min(target) - 1e-4;
            let hi = start.max(target) + 1e-4;
            for _ in 0..4800 {
                let v = p.advance();
                prop_assert!(v >= lo && v <= hi);
            }
        }
    }
}
