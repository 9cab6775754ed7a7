//! Polywave Synth - voice allocation and synthesis engine
//!
//! This crate turns note events and a parameter tree into stereo audio:
//! oscillators, linear ADSR envelopes, three-channel voices, and the
//! voice pool with its shared filter chain.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - Stereo oscillator over the patch format's wave
//!   shapes, with pulse width, phase offset, polarity, and stereo spread
//!
//! ```rust
//! use polywave_synth::Oscillator;
//! use polywave_config::Waveform;
//!
//! let mut osc = Oscillator::new(48000.0);
//! osc.set_frequency(440.0);
//! osc.set_waveform(Waveform::Sawtooth);
//!
//! let (left, right) = osc.advance();
//! ```
//!
//! ## Envelopes
//!
//! - [`Envelope`] - Linear-segment ADSR driven by
//!   [`EnvelopeParams`](polywave_config::EnvelopeParams)
//! - [`EnvelopeState`] - Envelope stage tracking
//!
//! ## Voices
//!
//! - [`VoiceChannel`] - One oscillator slot with smoothed gain/pan and a
//!   frequency glide ramp
//! - [`Voice`] - Three channels behind a shared envelope
//! - [`VoicePool`] - Fixed voice pool with poly round-robin or mono
//!   legato allocation, plus the shared filter → scope → master chain
//!
//! ```rust
//! use polywave_synth::VoicePool;
//!
//! let mut pool: VoicePool<10> = VoicePool::new(48000.0);
//! pool.note_on(60);
//!
//! let mut buffer = [0.0f32; 512]; // interleaved stereo
//! pool.process_block(&mut buffer);
//! ```
//!
//! # Tracing
//!
//! Enable the `tracing` feature for debug events on note on/off and mode
//! changes.

pub mod channel;
pub mod envelope;
pub mod oscillator;
pub mod pool;
pub mod voice;

pub use channel::VoiceChannel;
pub use envelope::{Envelope, EnvelopeState};
pub use oscillator::Oscillator;
pub use pool::VoicePool;
pub use voice::{CHANNELS_PER_VOICE, Voice, note_frequency};
