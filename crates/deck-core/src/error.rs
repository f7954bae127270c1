use thiserror::Error;

/// Failures raised inside the resolvers. None of these escape the group
/// composer: each one degrades to a placeholder or a fallback value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("missing reference: {0}")]
    MissingReference(String),

    #[error("unsupported format `{format}` for {path}")]
    UnsupportedFormat { path: String, format: String },

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("group nesting exceeds {0} levels")]
    DepthExceeded(usize),

    #[error("{0}")]
    Leaf(String),
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

/// Reported through the error sink for every isolated child failure.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeError {
    pub node_id: Option<u32>,
    pub message: String,
}

pub trait ErrorSink {
    fn report(&self, error: NodeError);
}

impl<F> ErrorSink for F
where
    F: Fn(NodeError),
{
    fn report(&self, error: NodeError) {
        self(error)
    }
}
