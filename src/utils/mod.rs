//! Utility modules for rust_slalom

pub mod csv;
pub mod visualization;

pub use visualization::{colors, PathStyle, PointStyle, ProfileSamples, Visualizer};
