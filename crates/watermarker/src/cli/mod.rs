//! Command-line surface.

pub mod process;

pub use process::{execute, WatermarkArgs};
