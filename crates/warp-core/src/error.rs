use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} population must hold at least one particle")]
    EmptyPopulation(&'static str),
    #[error("palette must hold at least one color")]
    EmptyPalette,
    #[error("{0} bounds must have positive extents")]
    DegenerateBounds(&'static str),
    #[error("{0} must be positive (got {1})")]
    InvalidValue(&'static str, f32),
    #[error("{0} has min > max")]
    InvertedRange(&'static str),
}

/// Failures of a rendering backend. Creation failures are fatal to the
/// instance that hit them.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering context creation failed: {0}")]
    ContextCreation(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("out of GPU memory")]
    OutOfMemory,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("host already disposed")]
    AlreadyDisposed,
    #[error("warp trigger was rebound to another host")]
    Unbound,
}
