//! Audio output layer for the polywave synthesizer.
//!
//! This crate puts a stereo render callback on the system's audio output:
//!
//! - [`AudioBackend`] - Object-safe backend trait with boxed callbacks
//! - [`CpalBackend`] - Default implementation over
//!   [cpal](https://crates.io/crates/cpal) (feature `"cpal-backend"`)
//! - [`MockBackend`] - Deterministic in-process backend for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polywave_io::{AudioBackend, BackendStreamConfig, CpalBackend};
//! use polywave_synth::VoicePool;
//!
//! let mut pool: VoicePool<10> = VoicePool::new(48000.0);
//! pool.note_on(60);
//!
//! let backend = CpalBackend::new();
//! let _stream = backend.build_output_stream(
//!     &BackendStreamConfig::default(),
//!     Box::new(move |buffer| pool.process_block(buffer)),
//!     Box::new(|err| tracing::error!("audio error: {err}")),
//! )?;
//! // Audio plays until `_stream` is dropped.
//! ```

mod backend;
#[cfg(feature = "cpal-backend")]
mod cpal_backend;
mod mock;

pub use backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
#[cfg(feature = "cpal-backend")]
pub use cpal_backend::CpalBackend;
pub use mock::MockBackend;

/// Description of an output device, as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Device name as reported by the platform.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Error types for audio output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
