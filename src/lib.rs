//! Resolves parsed presentation slides into drawable visual trees.
//!
//! [`SlideRenderer`] is the entry point: it picks the layout, master and
//! theme of a slide, resolves the background, draws master and layout
//! decorations, then composes the slide's own shapes.

pub mod error;
pub mod slide;

pub use deck_core;
pub use deck_data;

pub use error::{EngineError, Result};
pub use slide::{load_config, load_document, SlideParts, SlideRenderer};
