// Path Tracking algorithms module

pub mod trajectory_tracker;

pub use trajectory_tracker::*;
