//! A single synthesizer voice.
//!
//! A voice is exactly three [`VoiceChannel`]s summed into one shared
//! amplitude envelope. Voices are created once and live for the life of
//! the pool; releasing a voice just runs its envelope down to idle, after
//! which the pool may hand it a new note.

use polywave_config::SynthParams;

use crate::channel::VoiceChannel;
use crate::envelope::{Envelope, EnvelopeState};

/// Number of oscillator slots per voice.
pub const CHANNELS_PER_VOICE: usize = 3;

/// Convert a MIDI note plus per-slot pitch offsets to a frequency in Hz.
///
/// Standard tuning: A4 (note 69) = 440 Hz. `coarse` offsets in semitones,
/// `fine` in cents.
#[inline]
pub fn note_frequency(note: u8, coarse: i32, fine: f32) -> f32 {
    let semitones = f32::from(note) - 69.0 + coarse as f32;
    440.0 * libm::powf(2.0, semitones / 12.0) * libm::powf(2.0, fine / 1200.0)
}

/// One pool slot: three oscillator channels behind a shared ADSR.
#[derive(Debug, Clone)]
pub struct Voice {
    channels: [VoiceChannel; CHANNELS_PER_VOICE],
    envelope: Envelope,
    /// The note this voice last played. Stays set through the release
    /// tail; allocation state lives in the pool, not here.
    note: Option<u8>,
}

impl Voice {
    /// Create an idle voice.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            channels: core::array::from_fn(|_| VoiceChannel::new(sample_rate)),
            envelope: Envelope::new(sample_rate),
            note: None,
        }
    }

    /// Update the sample rate of every stage.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for ch in &mut self.channels {
            ch.set_sample_rate(sample_rate);
        }
        self.envelope.set_sample_rate(sample_rate);
    }

    /// Start a note: configure all three slots, tune them, and trigger
    /// the envelope.
    ///
    /// When `previous_note` is given and the patch has portamento, each
    /// channel glides from the previous note's pitch; otherwise the pitch
    /// snaps. The envelope attack resumes from the current level, so
    /// stealing a sounding voice does not click.
    pub fn trigger_attack(&mut self, note: u8, params: &SynthParams, previous_note: Option<u8>) {
        let glide = glide_time(params, previous_note);

        for (channel, slot) in self.channels.iter_mut().zip(&params.oscillators) {
            channel.apply(slot);
            channel.reset_phase();

            let target = note_frequency(note, slot.coarse_pitch, slot.fine_pitch);
            if let Some(prev) = previous_note
                && glide > 0.0
            {
                let from = note_frequency(prev, slot.coarse_pitch, slot.fine_pitch);
                channel.set_frequency_immediate(from);
                channel.set_frequency(target, glide);
            } else {
                channel.set_frequency(target, 0.0);
            }
        }

        self.note = Some(note);
        self.envelope.trigger(&params.envelope);
    }

    /// Release the note. Legal from any state; the envelope ramps down
    /// from wherever it currently sits.
    pub fn trigger_release(&mut self, params: &SynthParams) {
        self.envelope.release(&params.envelope);
    }

    /// Legato retune: move the sounding pitch to a new note without
    /// retriggering the envelope. Used by mono mode.
    pub fn update_frequency(&mut self, note: u8, params: &SynthParams, previous_note: Option<u8>) {
        let glide = glide_time(params, previous_note);

        for (channel, slot) in self.channels.iter_mut().zip(&params.oscillators) {
            let target = note_frequency(note, slot.coarse_pitch, slot.fine_pitch);
            // The ramp starts from the currently sounding frequency.
            channel.set_frequency(target, glide);
        }

        self.note = Some(note);
    }

    /// Push a live parameter edit into the slots.
    ///
    /// Envelope timings only affect future trigger/release calls. Pitch
    /// offsets retune the sounding note in place, the way editing a
    /// detune slider mid-note should. A slot whose derived frequency did
    /// not change is left untouched, so an edit elsewhere in the tree
    /// never cancels a portamento glide in flight.
    pub fn update_params(&mut self, params: &SynthParams) {
        for (channel, slot) in self.channels.iter_mut().zip(&params.oscillators) {
            channel.apply(slot);
        }

        if let Some(note) = self.note
            && self.envelope.is_active()
        {
            for (channel, slot) in self.channels.iter_mut().zip(&params.oscillators) {
                let freq = note_frequency(note, slot.coarse_pitch, slot.fine_pitch);
                if freq != channel.target_frequency() {
                    channel.set_frequency(freq, 0.0);
                }
            }
        }
    }

    /// Generate one stereo sample pair.
    #[inline]
    pub fn process(&mut self) -> (f32, f32) {
        if !self.envelope.is_active() {
            return (0.0, 0.0);
        }

        let mut left = 0.0;
        let mut right = 0.0;
        for ch in &mut self.channels {
            let (l, r) = ch.process();
            left += l;
            right += r;
        }

        let env = self.envelope.advance();
        (left * env, right * env)
    }

    /// True while the envelope is running (including the release tail).
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// The note this voice last played.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// Current envelope state.
    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Current envelope level.
    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    /// Hard stop: envelope to idle, note cleared.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.note = None;
        for ch in &mut self.channels {
            ch.reset_phase();
            ch.set_frequency_immediate(0.0);
        }
    }
}

/// Portamento applies only on a note-to-note transition.
#[inline]
fn glide_time(params: &SynthParams, previous_note: Option<u8>) -> f32 {
    if previous_note.is_some() && params.portamento > 0.0 {
        params.portamento
    } else {
        0.0
    }
}
