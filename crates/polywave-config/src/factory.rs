//! Factory patches bundled with the library.
//!
//! These are embedded at compile time and always available without external
//! files. Each is stored as the same JSON blob format [`RawPatch`] loads
//! from disk.

use crate::error::PatchError;
use crate::params::SynthParams;
use crate::patch::RawPatch;

/// Names of the bundled factory patches, in menu order.
pub static FACTORY_PATCH_NAMES: &[&str] = &[
    "default", "piano", "violin", "trumpet", "bass", "lead", "pad",
];

static FACTORY_PATCHES_JSON: &[(&str, &str)] = &[
    ("default", DEFAULT_PATCH),
    ("piano", PIANO_PATCH),
    ("violin", VIOLIN_PATCH),
    ("trumpet", TRUMPET_PATCH),
    ("bass", BASS_PATCH),
    ("lead", LEAD_PATCH),
    ("pad", PAD_PATCH),
];

/// The init sound: three detune-free sawtooths, open filter.
const DEFAULT_PATCH: &str = r#"{
    "filter": { "cutoff": 20000, "resonance": 0 },
    "envelope": { "attack": 0.01, "decay": 0.1, "sustain": 0.8, "release": 0.5 },
    "oscillators": [
        { "waveform": "sawtooth", "volume": 0.5, "pan": 0, "coarsePitch": 0, "finePitch": 0 },
        { "waveform": "sawtooth", "volume": 0.5, "pan": 0, "coarsePitch": 0, "finePitch": 0 },
        { "waveform": "sawtooth", "volume": 0.5, "pan": 0, "coarsePitch": 0, "finePitch": 0 }
    ]
}"#;

/// Percussive square/triangle stack with octave layers.
const PIANO_PATCH: &str = r#"{
    "filter": { "cutoff": 18000, "resonance": 0.1 },
    "envelope": { "attack": 0.01, "decay": 0.5, "sustain": 0.1, "release": 0.2 },
    "oscillators": [
        { "waveform": "square", "volume": 0.6, "pan": 0, "coarsePitch": 0, "finePitch": 0 },
        { "waveform": "triangle", "volume": 0.4, "pan": -0.05, "coarsePitch": 12, "finePitch": 3 },
        { "waveform": "sine", "volume": 0.3, "pan": 0.05, "coarsePitch": 24, "finePitch": -3 }
    ]
}"#;

/// Slow-bowed detuned saws.
const VIOLIN_PATCH: &str = r#"{
    "filter": { "cutoff": 7500, "resonance": 2.5 },
    "envelope": { "attack": 0.4, "decay": 0.8, "sustain": 0.7, "release": 0.5 },
    "oscillators": [
        { "waveform": "sawtooth", "volume": 0.5, "pan": -0.1, "coarsePitch": 0, "finePitch": -5 },
        { "waveform": "sawtooth", "volume": 0.5, "pan": 0.1, "coarsePitch": 0, "finePitch": 5 },
        { "waveform": "sine", "volume": 0.3, "pan": 0, "coarsePitch": 12, "finePitch": 0 }
    ]
}"#;

/// Bright brassy saw with resonant filter bite.
const TRUMPET_PATCH: &str = r#"{
    "filter": { "cutoff": 6000, "resonance": 7 },
    "envelope": { "attack": 0.05, "decay": 0.2, "sustain": 0.8, "release": 0.25 },
    "oscillators": [
        { "waveform": "sawtooth", "volume": 0.7, "pan": 0, "coarsePitch": 0, "finePitch": 0 },
        { "waveform": "square", "volume": 0.3, "pan": 0.05, "coarsePitch": 12, "finePitch": 0 },
        { "waveform": "sine", "volume": 0.1, "pan": -0.05, "coarsePitch": -12, "finePitch": 0 }
    ]
}"#;

/// Sub-octave square bass with a closed, resonant filter.
const BASS_PATCH: &str = r#"{
    "filter": { "cutoff": 800, "resonance": 10 },
    "envelope": { "attack": 0.01, "decay": 0.2, "sustain": 0.1, "release": 0.2 },
    "oscillators": [
        { "waveform": "square", "volume": 0.6, "pan": -0.1, "coarsePitch": -12, "finePitch": 0 },
        { "waveform": "sawtooth", "volume": 0.4, "pan": 0.1, "coarsePitch": -12, "finePitch": 5 },
        { "waveform": "sine", "volume": 0.3, "pan": 0, "coarsePitch": -24, "finePitch": 0 }
    ]
}"#;

/// Wide detuned lead with a noise layer.
const LEAD_PATCH: &str = r#"{
    "filter": { "cutoff": 5000, "resonance": 5 },
    "envelope": { "attack": 0.1, "decay": 0.4, "sustain": 0.5, "release": 0.8 },
    "oscillators": [
        { "waveform": "sawtooth", "volume": 0.5, "pan": -0.2, "coarsePitch": 0, "finePitch": -7 },
        { "waveform": "square", "volume": 0.5, "pan": 0.2, "coarsePitch": 0, "finePitch": 7 },
        { "waveform": "noise", "volume": 0.05, "pan": 0, "coarsePitch": 0, "finePitch": 0 }
    ]
}"#;

/// Slow swelling pad, wide stereo spread.
const PAD_PATCH: &str = r#"{
    "filter": { "cutoff": 4000, "resonance": 2 },
    "envelope": { "attack": 1.5, "decay": 1.0, "sustain": 0.8, "release": 2.0 },
    "oscillators": [
        { "waveform": "triangle", "volume": 0.5, "pan": -0.4, "coarsePitch": 0, "finePitch": -5 },
        { "waveform": "sine", "volume": 0.5, "pan": 0.4, "coarsePitch": 0, "finePitch": 5 },
        { "waveform": "sawtooth", "volume": 0.3, "pan": 0, "coarsePitch": -12, "finePitch": 0 }
    ]
}"#;

/// All factory patches as sanitized parameter trees, in menu order.
pub fn factory_patches() -> Vec<(&'static str, SynthParams)> {
    FACTORY_PATCHES_JSON
        .iter()
        .filter_map(|(name, json)| {
            RawPatch::from_json(json)
                .ok()
                .map(|p| (*name, p.into_params()))
        })
        .collect()
}

/// Look up a factory patch by name (case-insensitive).
pub fn get_factory_patch(name: &str) -> Result<SynthParams, PatchError> {
    let name_lower = name.to_lowercase();
    for (patch_name, json) in FACTORY_PATCHES_JSON {
        if *patch_name == name_lower {
            return Ok(RawPatch::from_json(json)?.into_params());
        }
    }
    Err(PatchError::PresetNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{VoicingMode, Waveform};

    #[test]
    fn every_factory_patch_parses() {
        let patches = factory_patches();
        assert_eq!(patches.len(), FACTORY_PATCH_NAMES.len());
        for (name, _) in &patches {
            assert!(FACTORY_PATCH_NAMES.contains(name));
        }
    }

    #[test]
    fn default_patch_matches_canonical_defaults() {
        let params = get_factory_patch("default").unwrap();
        // Resonance 0 in the blob sanitizes to Butterworth.
        let mut expected = SynthParams::default();
        expected.filter.resonance = 0.707;
        assert_eq!(params, expected.sanitized());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let params = get_factory_patch("VIOLIN").unwrap();
        assert_eq!(params.filter.cutoff, 7500.0);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let result = get_factory_patch("organ");
        assert!(matches!(result, Err(PatchError::PresetNotFound(ref n)) if n == "organ"));
    }

    #[test]
    fn bass_patch_carries_sub_octave_tuning() {
        let params = get_factory_patch("bass").unwrap();
        assert_eq!(params.filter.cutoff, 800.0);
        assert_eq!(params.filter.resonance, 10.0);
        assert_eq!(params.oscillators[0].coarse_pitch, -12);
        assert_eq!(params.oscillators[2].coarse_pitch, -24);
    }

    #[test]
    fn lead_patch_has_a_noise_layer() {
        let params = get_factory_patch("lead").unwrap();
        assert_eq!(params.oscillators[2].waveform, Waveform::Noise);
        assert_eq!(params.oscillators[2].volume, 0.05);
    }

    #[test]
    fn factory_patches_default_to_poly_voicing() {
        for (name, params) in factory_patches() {
            assert_eq!(
                params.voicing,
                VoicingMode::Poly,
                "patch {name} should default to poly"
            );
        }
    }
}
