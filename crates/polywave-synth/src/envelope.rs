//! Linear-segment ADSR envelope.
//!
//! Segments are straight lines scheduled as linear ramps: attack climbs
//! from the current level to the 1.0 peak, decay falls to the sustain
//! level, release falls to zero. Triggering or releasing mid-segment
//! cancels the pending ramp and continues from the captured current
//! level, so retriggers and early releases never step the amplitude.

use polywave_config::EnvelopeParams;
use polywave_core::LinearRamp;

/// ADSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Envelope is inactive — output is zero.
    #[default]
    Idle,
    /// Attack phase — output ramps up toward the 1.0 peak.
    Attack,
    /// Decay phase — output falls from peak toward the sustain level.
    Decay,
    /// Sustain phase — output holds while the gate is held.
    Sustain,
    /// Release phase — output ramps to zero after gate release.
    Release,
}

/// Linear ADSR envelope generator.
///
/// # Example
///
/// ```rust
/// use polywave_synth::{Envelope, EnvelopeState};
/// use polywave_config::EnvelopeParams;
///
/// let mut env = Envelope::new(48000.0);
/// let params = EnvelopeParams::default();
///
/// env.trigger(&params);
/// for _ in 0..1000 {
///     let level = env.advance();
/// }
/// env.release(&params);
/// ```
#[derive(Debug, Clone)]
pub struct Envelope {
    state: EnvelopeState,
    /// Current segment; its value is the envelope level.
    ramp: LinearRamp,
    /// Sustain level captured at trigger time.
    sustain: f32,
    /// Decay time captured at trigger time, for the attack→decay handoff.
    decay: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Envelope {
    /// Create an idle envelope.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            state: EnvelopeState::Idle,
            ramp: LinearRamp::new(0.0, sample_rate),
            sustain: 0.0,
            decay: 0.0,
        }
    }

    /// Update the sample rate. Affects segments scheduled after this call.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ramp.set_sample_rate(sample_rate);
    }

    /// Start (or restart) the attack from the current level.
    pub fn trigger(&mut self, params: &EnvelopeParams) {
        self.sustain = params.sustain.clamp(0.0, 1.0);
        self.decay = params.decay.max(0.0);
        self.state = EnvelopeState::Attack;
        self.ramp.ramp_to(1.0, params.attack.max(0.0));
    }

    /// Begin the release from the current level. No-op while idle.
    pub fn release(&mut self, params: &EnvelopeParams) {
        if self.state != EnvelopeState::Idle {
            self.state = EnvelopeState::Release;
            self.ramp.ramp_to(0.0, params.release.max(0.0));
        }
    }

    /// Force the envelope back to idle at zero level.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.ramp.set_immediate(0.0);
    }

    /// Current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.ramp.get()
    }

    /// True unless idle.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Advance one sample and return the current level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => 0.0,

            EnvelopeState::Attack => {
                let level = self.ramp.advance();
                if self.ramp.is_settled() {
                    self.state = EnvelopeState::Decay;
                    self.ramp.ramp_to(self.sustain, self.decay);
                }
                level
            }

            EnvelopeState::Decay => {
                let level = self.ramp.advance();
                if self.ramp.is_settled() {
                    self.state = EnvelopeState::Sustain;
                }
                level
            }

            EnvelopeState::Sustain => self.ramp.get(),

            EnvelopeState::Release => {
                let level = self.ramp.advance();
                if self.ramp.is_settled() {
                    self.state = EnvelopeState::Idle;
                }
                level
            }
        }
    }
}
