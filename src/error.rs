use thiserror::Error;

/// Caller mistakes the facade cannot degrade around. Everything that goes
/// wrong inside a slide becomes a placeholder instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("slide {index} out of range ({count} slides)")]
    SlideOutOfRange { index: usize, count: usize },

    #[error("slide {slide} uses layout {layout}, which does not exist")]
    MissingLayout { slide: usize, layout: usize },

    #[error("layout {layout} uses master {master}, which does not exist")]
    MissingMaster { layout: usize, master: usize },

    #[error("master {master} uses theme {theme}, which does not exist")]
    MissingTheme { master: usize, theme: usize },

    #[error("invalid render config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
