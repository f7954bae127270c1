//! Resolves a parsed presentation model into a visual tree: concrete paints,
//! geometry paths and styled text runs.

pub mod autofit;
pub mod background;
pub mod bullets;
pub mod color;
pub mod config;
pub mod context;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod group;
pub mod hyperlink;
pub mod line;
pub mod markers;
pub mod media;
pub mod paint;
pub mod pattern;
pub mod presets;
pub mod renderer;
pub mod shape;
pub mod style;
pub mod text;

pub use autofit::{HeuristicMeasurer, TextMeasurer};
pub use background::resolve_background;
pub use color::{resolve_color, ResolvedColor};
pub use config::RenderConfig;
pub use context::{LinkScope, RenderContext, ResolveCaches};
pub use error::{ErrorSink, NodeError, ResolveError, Result};
pub use geometry::{resolve_geometry, FillRule, PathDescriptor, ResolvedGeometry};
pub use group::{compose_elements, compose_group, LeafRenderer};
pub use hyperlink::{is_navigable_url, LinkTarget, NavigationRequest};
pub use line::{resolve_line_style, LineStyle};
pub use media::{run_pending_decodes, DecoderRegistry, MediaStore, RasterDecoder};
pub use paint::{resolve_fill, Paint};
pub use renderer::*;
pub use shape::ShapeRenderer;
pub use text::{layout_text, TextLayout};
