//! The voice pool and shared output chain.
//!
//! [`VoicePool`] owns the voices, the note→voice allocation state, and
//! everything the voices share: the master lowpass (one biquad per
//! channel), the oscilloscope tap, and the master gain. It is the single
//! entry point for the control plane; the audio callback only ever calls
//! [`process_block`](VoicePool::process_block).

use polywave_config::{SynthParams, VoicingMode};
use polywave_core::{Biquad, ScopeTap, SmoothedParam};

use crate::voice::Voice;

/// Master gain smoothing time for live edits.
const MASTER_SMOOTHING_MS: f32 = 5.0;

/// Mode-tagged allocation state.
///
/// Poly tracks which note each slot is sounding plus the round-robin
/// cursor; mono only tracks the currently held note (voice 0 is the only
/// voice it ever uses). Switching modes replaces this wholesale, so stale
/// tracking from the other mode cannot leak.
#[derive(Debug, Clone)]
enum Allocation<const N: usize> {
    Poly {
        /// Note sounding in each slot, by pool index.
        notes: [Option<u8>; N],
        /// Next slot to take. Advances on every allocation, free or not.
        cursor: usize,
    },
    Mono {
        /// The note voice 0 is currently holding.
        current: Option<u8>,
    },
}

impl<const N: usize> Allocation<N> {
    fn for_mode(mode: VoicingMode) -> Self {
        match mode {
            VoicingMode::Poly => Allocation::Poly {
                notes: [None; N],
                cursor: 0,
            },
            VoicingMode::Mono => Allocation::Mono { current: None },
        }
    }
}

/// A fixed pool of `N` voices behind a shared filter → scope → master
/// gain chain.
///
/// # Example
///
/// ```rust
/// use polywave_synth::VoicePool;
///
/// let mut pool: VoicePool<10> = VoicePool::new(48000.0);
/// pool.note_on(60);
/// pool.note_on(64);
/// pool.note_on(67);
///
/// let mut buffer = [0.0f32; 512]; // interleaved stereo
/// pool.process_block(&mut buffer);
///
/// pool.note_off(60);
/// ```
#[derive(Debug)]
pub struct VoicePool<const N: usize> {
    voices: [Voice; N],
    alloc: Allocation<N>,
    /// Most recent note across both modes, for portamento glides.
    last_note: Option<u8>,
    params: SynthParams,
    filter_left: Biquad,
    filter_right: Biquad,
    scope: ScopeTap,
    master: SmoothedParam,
    sample_rate: f32,
}

impl<const N: usize> VoicePool<N> {
    /// Create a pool playing the default patch.
    pub fn new(sample_rate: f32) -> Self {
        let params = SynthParams::default().sanitized();
        let mut pool = Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
            alloc: Allocation::for_mode(params.voicing),
            last_note: None,
            params: params.clone(),
            filter_left: Biquad::new(),
            filter_right: Biquad::new(),
            scope: ScopeTap::new(),
            master: SmoothedParam::with_config(
                params.master_volume,
                sample_rate,
                MASTER_SMOOTHING_MS,
            ),
            sample_rate,
        };
        pool.apply_shared_chain();
        pool
    }

    /// Update the sample rate of every stage.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
        self.master.set_sample_rate(sample_rate);
        self.apply_shared_chain();
    }

    /// Start a note.
    ///
    /// Poly: a note that is already sounding is left alone (key repeat is
    /// a no-op). Otherwise the slot under the cursor is taken and the
    /// cursor advances — whether or not that slot was free. With more
    /// held notes than voices this steals the slot allocated longest ago.
    ///
    /// Mono: a fresh attack when silent, a legato retune of voice 0 when
    /// a note is already held.
    pub fn note_on(&mut self, note: u8) {
        #[cfg(feature = "tracing")]
        tracing::debug!(note, "note on");

        let previous = self.last_note;
        match &mut self.alloc {
            Allocation::Poly { notes, cursor } => {
                if notes.iter().any(|n| *n == Some(note)) {
                    return;
                }
                let idx = *cursor;
                *cursor = (*cursor + 1) % N;
                notes[idx] = Some(note);
                self.voices[idx].trigger_attack(note, &self.params, previous);
            }
            Allocation::Mono { current } => {
                if current.is_some() {
                    self.voices[0].update_frequency(note, &self.params, previous);
                } else {
                    self.voices[0].trigger_attack(note, &self.params, previous);
                }
                *current = Some(note);
            }
        }
        self.last_note = Some(note);
    }

    /// Release a note. A note that is not sounding is a no-op, so stale
    /// key-up events (after a steal, a mode switch, or a double release)
    /// are harmless.
    pub fn note_off(&mut self, note: u8) {
        #[cfg(feature = "tracing")]
        tracing::debug!(note, "note off");

        match &mut self.alloc {
            Allocation::Poly { notes, .. } => {
                for (idx, slot) in notes.iter_mut().enumerate() {
                    if *slot == Some(note) {
                        *slot = None;
                        self.voices[idx].trigger_release(&self.params);
                        return;
                    }
                }
            }
            Allocation::Mono { current } => {
                if *current == Some(note) {
                    *current = None;
                    self.voices[0].trigger_release(&self.params);
                }
            }
        }
    }

    /// Replace the whole parameter tree.
    ///
    /// The tree is sanitized first, then fanned out: master gain and
    /// filter coefficients on the shared chain, oscillator slots into
    /// every voice. A voicing-mode change releases everything that is
    /// sounding and resets the allocation state before the new mode takes
    /// over.
    pub fn set_params(&mut self, params: SynthParams) {
        let params = params.sanitized();

        if params.voicing != self.params.voicing {
            #[cfg(feature = "tracing")]
            tracing::debug!(mode = ?params.voicing, "voicing mode change, draining voices");
            for voice in &mut self.voices {
                voice.trigger_release(&self.params);
            }
            self.alloc = Allocation::for_mode(params.voicing);
            self.last_note = None;
        }

        self.params = params;
        self.master.set_target(self.params.master_volume);
        self.apply_shared_chain();
        for voice in &mut self.voices {
            voice.update_params(&self.params);
        }
    }

    /// The current (sanitized) parameter tree, for UI reflection.
    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// The oscilloscope tap on the post-filter mix.
    pub fn scope(&self) -> &ScopeTap {
        &self.scope
    }

    /// Voices with a running envelope, release tails included.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Read access to the voices.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Generate one stereo sample pair: sum the voices, filter each
    /// channel, feed the scope the mono mix, apply master gain.
    #[inline]
    pub fn process(&mut self) -> (f32, f32) {
        let mut left = 0.0;
        let mut right = 0.0;
        for voice in &mut self.voices {
            let (l, r) = voice.process();
            left += l;
            right += r;
        }

        left = self.filter_left.process(left);
        right = self.filter_right.process(right);

        self.scope.push((left + right) * 0.5);

        let gain = self.master.advance();
        (left * gain, right * gain)
    }

    /// Fill an interleaved stereo buffer. Odd trailing samples (a
    /// malformed buffer length) are left untouched.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(2) {
            let (l, r) = self.process();
            frame[0] = l;
            frame[1] = r;
        }
    }

    /// Hard stop: every voice to idle, allocation and filters cleared.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.alloc = Allocation::for_mode(self.params.voicing);
        self.last_note = None;
        self.filter_left.clear();
        self.filter_right.clear();
        self.scope.clear();
    }

    fn apply_shared_chain(&mut self) {
        self.filter_left.set_lowpass(
            self.params.filter.cutoff,
            self.params.filter.resonance,
            self.sample_rate,
        );
        self.filter_right.set_lowpass(
            self.params.filter.cutoff,
            self.params.filter.resonance,
            self.sample_rate,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeState;
    use polywave_config::VoicingMode;

    const SR: f32 = 48000.0;

    fn pool() -> VoicePool<10> {
        VoicePool::new(SR)
    }

    fn mono_pool() -> VoicePool<10> {
        let mut p = pool();
        let mut params = p.params().clone();
        params.voicing = VoicingMode::Mono;
        p.set_params(params);
        p
    }

    /// Run the pool long enough for every release tail to finish.
    fn drain(pool: &mut VoicePool<10>, seconds: f32) {
        for _ in 0..((seconds * SR) as usize) {
            pool.process();
        }
    }

    #[test]
    fn note_on_activates_one_voice() {
        let mut p = pool();
        p.note_on(60);
        assert_eq!(p.active_voice_count(), 1);
    }

    #[test]
    fn note_on_is_idempotent_for_a_held_note() {
        let mut p = pool();
        p.note_on(60);
        p.note_on(60);
        p.note_on(60);
        assert_eq!(p.active_voice_count(), 1, "key repeat must not stack voices");
    }

    #[test]
    fn note_off_releases_and_double_release_is_a_no_op() {
        let mut p = pool();
        let mut params = p.params().clone();
        params.envelope.release = 0.01;
        p.set_params(params);

        p.note_on(60);
        p.note_off(60);
        drain(&mut p, 0.1);
        assert_eq!(p.active_voice_count(), 0);

        // Releasing again must not disturb anything.
        p.note_off(60);
        assert_eq!(p.active_voice_count(), 0);
    }

    #[test]
    fn note_off_for_unknown_note_is_a_no_op() {
        let mut p = pool();
        p.note_on(60);
        p.note_off(64);
        assert_eq!(p.active_voice_count(), 1);
    }

    #[test]
    fn ten_notes_fill_the_pool() {
        let mut p = pool();
        for note in 60..70 {
            p.note_on(note);
        }
        assert_eq!(p.active_voice_count(), 10);
    }

    #[test]
    fn eleventh_note_steals_voice_zero() {
        let mut p = pool();
        for note in 60..70 {
            p.note_on(note);
        }
        // Pool full; the cursor has wrapped back to slot 0.
        p.note_on(70);
        assert_eq!(p.active_voice_count(), 10);
        assert_eq!(p.voices()[0].note(), Some(70), "slot 0 should be stolen first");

        // The stolen note's key-up is now stale.
        p.note_off(60);
        assert_eq!(p.active_voice_count(), 10);
    }

    #[test]
    fn cursor_advances_even_when_a_slot_is_free() {
        let mut p = pool();
        let mut params = p.params().clone();
        params.envelope.release = 0.001;
        p.set_params(params);

        p.note_on(60); // slot 0
        p.note_off(60);
        drain(&mut p, 0.05);
        assert_eq!(p.active_voice_count(), 0);

        // Slot 0 is free, but allocation is strict rotation.
        p.note_on(62);
        assert_eq!(p.voices()[1].note(), Some(62), "rotation must not reuse slot 0");
    }

    #[test]
    fn mono_uses_a_single_voice() {
        let mut p = mono_pool();
        p.note_on(60);
        p.note_on(64);
        p.note_on(67);
        assert_eq!(p.active_voice_count(), 1, "mono never stacks voices");
        assert_eq!(p.voices()[0].note(), Some(67));
    }

    #[test]
    fn mono_legato_does_not_retrigger() {
        let mut p = mono_pool();
        p.note_on(60);
        drain(&mut p, 0.5); // well into sustain
        assert_eq!(p.voices()[0].envelope_state(), EnvelopeState::Sustain);

        p.note_on(64);
        assert_eq!(
            p.voices()[0].envelope_state(),
            EnvelopeState::Sustain,
            "legato retune must not restart the attack"
        );
    }

    #[test]
    fn mono_portamento_glides_between_notes() {
        let mut p = mono_pool();
        let mut params = p.params().clone();
        params.portamento = 1.0;
        p.set_params(params);

        // First note after silence snaps straight to 220 Hz.
        p.note_on(57);
        drain(&mut p, 0.5);

        // Legato takeover starts the one-second glide towards 440 Hz.
        p.note_on(69);
        let mut buffer = vec![0.0f32; 9600];
        p.process_block(&mut buffer);

        // Fundamental cycles on the left channel over the first 0.1 s of
        // the glide: still near 220 Hz, nowhere near the 440 Hz target.
        let mut crossings = 0;
        let mut prev = 0.0;
        for frame in buffer.chunks_exact(2) {
            if prev <= 0.0 && frame[0] > 0.0 {
                crossings += 1;
            }
            prev = frame[0];
        }
        assert!(
            crossings < 35,
            "glide start should sit near 220 Hz, got {crossings} cycles in 0.1 s"
        );
        assert!(crossings > 15, "voice went quiet mid-glide: {crossings} cycles");
    }

    #[test]
    fn mono_stale_note_off_is_ignored() {
        let mut p = mono_pool();
        p.note_on(60);
        p.note_on(64); // legato takeover; 60 is no longer current
        p.note_off(60);
        assert_eq!(p.active_voice_count(), 1, "stale key-up must not cut the held note");

        p.note_off(64);
        drain(&mut p, 1.0);
        assert_eq!(p.active_voice_count(), 0);
    }

    #[test]
    fn mode_switch_drains_all_voices() {
        let mut p = pool();
        let mut params = p.params().clone();
        params.envelope.release = 0.01;
        p.set_params(params.clone());

        for note in 60..66 {
            p.note_on(note);
        }
        assert_eq!(p.active_voice_count(), 6);

        params.voicing = VoicingMode::Mono;
        p.set_params(params.clone());
        drain(&mut p, 0.1);
        assert_eq!(p.active_voice_count(), 0, "mode switch must release everything");

        // Old-mode key-ups arriving after the switch are stale.
        p.note_off(60);
        assert_eq!(p.active_voice_count(), 0);

        p.note_on(72);
        assert_eq!(p.active_voice_count(), 1);
    }

    #[test]
    fn set_params_sanitizes_before_storing() {
        let mut p = pool();
        let mut params = p.params().clone();
        params.master_volume = 7.0;
        params.filter.resonance = 0.0;
        p.set_params(params);

        assert_eq!(p.params().master_volume, 1.0);
        assert_eq!(p.params().filter.resonance, 0.707);
    }

    #[test]
    fn pool_produces_audio_through_the_chain() {
        let mut p = pool();
        p.note_on(69);

        let mut buffer = [0.0f32; 1024];
        p.process_block(&mut buffer);
        let energy: f32 = buffer.iter().map(|s| s * s).sum();
        assert!(energy > 0.0, "held note should reach the output");
    }

    #[test]
    fn silent_pool_renders_silence() {
        let mut p = pool();
        let mut buffer = [1.0f32; 256];
        p.process_block(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn scope_sees_the_post_filter_mix() {
        let mut p = pool();
        p.note_on(69);
        let mut buffer = [0.0f32; 4096];
        p.process_block(&mut buffer);

        let mut window = [0.0f32; 2048];
        p.scope().snapshot(&mut window);
        let energy: f32 = window.iter().map(|s| s * s).sum();
        assert!(energy > 0.0, "scope should capture the sounding mix");
    }

    #[test]
    fn reset_silences_everything_immediately() {
        let mut p = pool();
        for note in 60..65 {
            p.note_on(note);
        }
        p.reset();
        assert_eq!(p.active_voice_count(), 0);

        let mut buffer = [1.0f32; 256];
        p.process_block(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn master_volume_scales_the_output() {
        let mut p = pool();
        p.note_on(69);
        // Let the attack finish.
        drain(&mut p, 0.1);
        let loud: f32 = {
            let mut buffer = [0.0f32; 1024];
            p.process_block(&mut buffer);
            buffer.iter().map(|s| s * s).sum()
        };

        let mut params = p.params().clone();
        params.master_volume = 0.1;
        p.set_params(params);
        // Let the gain smoother settle.
        drain(&mut p, 0.1);
        let quiet: f32 = {
            let mut buffer = [0.0f32; 1024];
            p.process_block(&mut buffer);
            buffer.iter().map(|s| s * s).sum()
        };

        assert!(
            quiet < loud * 0.05,
            "master volume 0.1 should drop power ~100x: {loud} -> {quiet}"
        );
    }
}
