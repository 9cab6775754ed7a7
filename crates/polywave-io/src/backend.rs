//! Pluggable audio backend abstraction.
//!
//! The [`AudioBackend`] trait decouples the voice engine from any specific
//! platform audio API. The default implementation wraps
//! [cpal](https://crates.io/crates/cpal) (feature `"cpal-backend"`); the
//! [`MockBackend`](crate::MockBackend) drives the same callback shape
//! deterministically for tests and CI.
//!
//! The trait uses boxed closures for callbacks rather than generic
//! parameters, making it object-safe and enabling runtime backend selection
//! via `Box<dyn AudioBackend>`. Streams are returned as [`StreamHandle`], a
//! type-erased wrapper that stops playback on drop, keeping platform types
//! out of application code.

use crate::{AudioDevice, Result};

/// Configuration for building an audio output stream.
#[derive(Debug, Clone)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of audio channels.
    pub channels: u16,
    /// Optional device name (uses system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 2,
            device_name: None,
        }
    }
}

/// Type-erased audio stream handle.
///
/// The stream is active while this handle exists; dropping it stops
/// playback. The inner value is `Box<dyn Send>`, keeping backend types out
/// of application code.
pub struct StreamHandle {
    /// The backend-specific stream object, kept alive via RAII.
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object.
    ///
    /// The wrapped value is kept alive until this handle is dropped.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Audio output callback signature.
///
/// Called by the backend on the real-time audio thread with a mutable buffer
/// of interleaved f32 samples that must be filled with output audio. For
/// stereo output the layout is `[L0, R0, L1, R1, ...]` and the buffer length
/// is `frames * channels`.
///
/// This runs on the audio thread: implementations must not allocate, lock
/// mutexes, or perform I/O.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Error callback signature.
///
/// Called when the backend encounters an error during streaming, with a
/// human-readable message.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable audio output backend.
///
/// Abstracts over platform audio APIs (ALSA, CoreAudio, WASAPI, ...) behind
/// a uniform device-lookup and stream-construction interface. Object-safe;
/// see the module docs for the callback conventions.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g., "cpal", "mock").
    fn name(&self) -> &str;

    /// Get the default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Build an output stream.
    ///
    /// `callback` is invoked per audio buffer to generate output samples;
    /// `error_callback` is invoked on streaming errors. The returned
    /// [`StreamHandle`] keeps the stream alive, and dropping it stops
    /// playback.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Query the actual sample rate the backend will use for the given
    /// config.
    ///
    /// Some backends cannot honor the exact requested rate and will pick the
    /// closest available one. The default implementation returns the
    /// requested rate unchanged.
    fn actual_sample_rate(&self, config: &BackendStreamConfig) -> u32 {
        config.sample_rate
    }
}
