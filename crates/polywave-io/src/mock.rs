//! Deterministic in-process backend for tests and CI.
//!
//! [`MockBackend`] implements [`AudioBackend`] without touching any platform
//! audio API: building a stream runs the output callback synchronously for a
//! fixed number of buffers and records everything the callback produced.
//! Tests can then assert on the rendered samples with no audio hardware
//! present.

use std::sync::{Arc, Mutex};

use crate::backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
use crate::{AudioDevice, Result};

/// Backend that renders a fixed number of buffers at stream build time.
pub struct MockBackend {
    blocks_per_stream: usize,
    captured: Arc<Mutex<Vec<f32>>>,
}

impl MockBackend {
    /// Create a mock backend that renders four buffers per stream.
    pub fn new() -> Self {
        Self::with_blocks(4)
    }

    /// Create a mock backend that renders `blocks` buffers per stream.
    pub fn with_blocks(blocks: usize) -> Self {
        Self {
            blocks_per_stream: blocks,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Everything the output callbacks have written so far, interleaved.
    pub fn captured(&self) -> Vec<f32> {
        self.captured.lock().map(|buf| buf.clone()).unwrap_or_default()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(Some(AudioDevice {
            name: "mock-output".to_string(),
            default_sample_rate: 48000,
        }))
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: OutputCallback,
        _error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let samples_per_block = config.buffer_size as usize * usize::from(config.channels);
        let mut buffer = vec![0.0f32; samples_per_block];

        for _ in 0..self.blocks_per_stream {
            buffer.fill(0.0);
            callback(&mut buffer);
            if let Ok(mut captured) = self.captured.lock() {
                captured.extend_from_slice(&buffer);
            }
        }

        tracing::debug!(
            blocks = self.blocks_per_stream,
            samples_per_block,
            "mock stream rendered"
        );

        Ok(StreamHandle::new(()))
    }
}
