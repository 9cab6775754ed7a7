//! Polywave Core - DSP primitives for the polywave synth engine
//!
//! This crate provides the building blocks the voice engine schedules its
//! audio-rate parameter motion through, designed for real-time processing
//! with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Scheduling
//!
//! All control-plane writes reach the audio rate through one of two ramp
//! primitives, so a control-thread stall can never glitch the output:
//!
//! - [`SmoothedParam`] - Exponential one-pole smoothing (RC-like response),
//!   for gain/pan style parameters
//! - [`LinearRamp`] - Linear segment over a caller-specified duration, for
//!   portamento glides and envelope segments
//!
//! Both guarantee at most one pending ramp per parameter: scheduling a new
//! target cancels the in-flight ramp and restarts from the current value.
//!
//! ## Filtering
//!
//! - [`Biquad`] - Second-order IIR filter (Direct Form I) with RBJ cookbook
//!   lowpass coefficients via [`lowpass_coefficients`]
//!
//! ## Visualization
//!
//! - [`ScopeTap`] - Fixed ring buffer holding the most recent output
//!   samples, for pull-based oscilloscope display
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! polywave-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod param;
pub mod scope;

pub use biquad::{Biquad, lowpass_coefficients};
pub use param::{LinearRamp, SmoothedParam};
pub use scope::{SCOPE_SIZE, ScopeTap};
