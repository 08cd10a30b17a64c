use thiserror::Error;

/// Top-level error type for the dateline wrapper.
#[derive(Debug, Error)]
pub enum DatelineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while constructing geometry on the sphere.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector cannot be normalized onto the sphere")]
    ZeroVector,

    #[error("latitude {0} is out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is out of range [-360, 360]")]
    LongitudeOutOfRange(f64),

    #[error("{kind} needs at least {required} points, got {actual}")]
    InsufficientPoints {
        kind: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("segment {index} has antipodal endpoints")]
    AntipodalSegment { index: usize },

    #[error("bounding small circle radius {0} is out of range [0, pi]")]
    InvalidRadius(f64),
}

/// Errors related to wrapper configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} = {value} must be finite, non-negative and below {max}")]
    InvalidTolerance {
        name: &'static str,
        value: f64,
        max: f64,
    },
}

/// Convenience type alias for results using [`DatelineError`].
pub type Result<T> = std::result::Result<T, DatelineError>;
