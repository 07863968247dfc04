//! Color filter array module

pub mod pattern;

pub use pattern::{CfaSite, Channel, ColorFilterPattern};
