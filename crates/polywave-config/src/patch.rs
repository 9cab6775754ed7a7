//! Patch file format and load/save operations.
//!
//! A patch is a JSON blob describing a full [`SynthParams`] tree. Blobs are
//! forgiving on the way in: every field is optional (missing fields take the
//! canonical defaults), the oscillator list may have any length, and numeric
//! values may be out of range. [`RawPatch::into_params`] normalizes all of
//! that — pad or truncate the oscillator list to three slots, then clamp —
//! so loading only fails on unreadable files or malformed JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PatchError;
use crate::params::{
    EnvelopeParams, FilterParams, OscillatorParams, SynthParams, VoicingMode,
};

/// A patch blob as it appears on disk.
///
/// # JSON Format
///
/// ```json
/// {
///   "filter": { "cutoff": 7500, "resonance": 2.5 },
///   "envelope": { "attack": 0.4, "decay": 0.8, "sustain": 0.7, "release": 0.5 },
///   "oscillators": [
///     { "waveform": "sawtooth", "volume": 0.5, "pan": -0.1, "coarsePitch": 0, "finePitch": -5 }
///   ]
/// }
/// ```
///
/// Any subset of fields is a valid patch; `{}` loads the default sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPatch {
    /// Output gain after the filter.
    pub master_volume: f32,
    /// Master lowpass filter.
    pub filter: FilterParams,
    /// Shared ADSR envelope.
    pub envelope: EnvelopeParams,
    /// Glide time in seconds.
    pub portamento: f32,
    /// Voice allocation mode.
    pub voicing: VoicingMode,
    /// Oscillator slots; normalized to exactly three on conversion.
    pub oscillators: Vec<OscillatorParams>,
}

impl Default for RawPatch {
    fn default() -> Self {
        SynthParams::default().into()
    }
}

impl From<SynthParams> for RawPatch {
    fn from(params: SynthParams) -> Self {
        Self {
            master_volume: params.master_volume,
            filter: params.filter,
            envelope: params.envelope,
            portamento: params.portamento,
            voicing: params.voicing,
            oscillators: params.oscillators.to_vec(),
        }
    }
}

impl RawPatch {
    /// Load a patch from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PatchError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Parse a patch from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PatchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the patch to a JSON file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PatchError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| PatchError::create_dir(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| PatchError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PatchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Normalize into a sanitized [`SynthParams`] tree.
    ///
    /// Missing oscillator slots are padded with defaults, extras dropped,
    /// and every numeric field clamped into range.
    pub fn into_params(self) -> SynthParams {
        let mut oscillators = [OscillatorParams::default(); 3];
        for (slot, osc) in oscillators.iter_mut().zip(self.oscillators) {
            *slot = osc;
        }

        SynthParams {
            master_volume: self.master_volume,
            filter: self.filter,
            envelope: self.envelope,
            portamento: self.portamento,
            voicing: self.voicing,
            oscillators,
        }
        .sanitized()
    }
}

/// Load a patch file straight into a sanitized parameter tree.
pub fn load_params(path: impl AsRef<Path>) -> Result<SynthParams, PatchError> {
    Ok(RawPatch::load(path)?.into_params())
}

/// Save a parameter tree as a patch file.
pub fn save_params(params: &SynthParams, path: impl AsRef<Path>) -> Result<(), PatchError> {
    RawPatch::from(params.clone()).save(path)
}
