//! Arc (distance, duration, toll-zone distance) matrix.

mod matrix;

pub use matrix::{ArcData, ArcMatrix};
