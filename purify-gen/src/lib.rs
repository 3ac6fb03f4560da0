//! Synthetic data and text display around `purify_core`.
//!
//! Generates a two-population normal mixture, shuffles it, and renders
//! histograms of what survives each refinement round.

pub mod config;
pub mod generate;
pub mod histogram;

pub use config::{GeneratorConfig, RunConfig};
pub use generate::{generate, rng_from_seed, shuffle};
pub use histogram::Histogram;
