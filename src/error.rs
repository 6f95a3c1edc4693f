use thiserror::Error;

/// Errors reported before any sweep state is created.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TessellationError {
    /// The boundary rectangle has a non-finite or non-positive extent.
    #[error("invalid bounds: min {min:?}, max {max:?} (extents must be finite and positive)")]
    InvalidBounds { min: [f64; 2], max: [f64; 2] },

    /// A site has a NaN or infinite coordinate.
    #[error("site {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteSite { index: usize, x: f64, y: f64 },

    /// The coincidence tolerance is negative or not finite.
    #[error("invalid tolerance {0}: must be finite and non-negative")]
    InvalidEpsilon(f64),

    /// A flat coordinate buffer does not contain whole `[x, y]` pairs.
    #[error("flat site buffer has odd length {0}")]
    OddCoordinateCount(usize),
}
