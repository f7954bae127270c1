//! Immutable, already-parsed presentation document model.
//!
//! Lengths are px at 96 dpi, font sizes are points, angles are degrees
//! (clockwise). DrawingML percentages keep their native integer form where
//! `100000` means 100%.

pub mod fill;
pub mod model;
pub mod text;
pub mod theme;

pub use fill::*;
pub use model::*;
pub use text::*;
pub use theme::*;
