//! Parameter model and patch management for the polywave synth.
//!
//! This crate owns the strongly-typed parameter tree the engine runs on,
//! the forgiving JSON patch format it loads from disk, and the bundled
//! factory patches.
//!
//! # Features
//!
//! - **Parameter Tree**: [`SynthParams`] with range clamping via `sanitize`
//! - **Patch Files**: Load and save patches as JSON blobs ([`RawPatch`])
//! - **Factory Patches**: Built-in sounds always available by name
//!
//! # Example
//!
//! ```rust,no_run
//! use polywave_config::{RawPatch, get_factory_patch, save_params};
//!
//! // Load a patch from file; out-of-range values clamp, missing fields
//! // take defaults.
//! let params = RawPatch::load("my_patch.json").unwrap().into_params();
//!
//! // Or start from a factory sound and tweak it.
//! let mut params = get_factory_patch("bass").unwrap();
//! params.portamento = 0.05;
//! save_params(&params, "my_bass.json").unwrap();
//! ```

mod error;
mod factory;
mod params;
mod patch;

pub use error::PatchError;
pub use factory::{FACTORY_PATCH_NAMES, factory_patches, get_factory_patch};
pub use params::{
    EnvelopeParams, FilterParams, OscillatorParams, SynthParams, VoicingMode, Waveform,
};
pub use patch::{RawPatch, load_params, save_params};
