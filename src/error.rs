use core::fmt::{Display, Formatter};

/// `SketchError` is the errors of this crate.
///
/// Every variant is raised before any counter is touched, so a failed call
/// leaves all involved sketches unmodified.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SketchError {
    /// Width or depth is zero
    InvalidDimensions {
        /// requested number of columns
        width: usize,
        /// requested number of rows
        depth: usize,
    },
    /// Two sketches with different shapes cannot be merged
    DimensionMismatch {
        /// `(width, depth)` of the sketch being merged into
        expected: (usize, usize),
        /// `(width, depth)` of the other operand
        found: (usize, usize),
    },
    /// Error bounds outside of the open interval (0.0, 1.0)
    InvalidErrorBounds {
        /// relative overestimate bound
        epsilon: f64,
        /// failure probability
        delta: f64,
    },
}

impl Display for SketchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SketchError::InvalidDimensions { width, depth } => write!(
                f,
                "invalid sketch dimensions: width {}, depth {}, both must be non-zero",
                *width, *depth
            ),
            SketchError::DimensionMismatch { expected, found } => write!(
                f,
                "incompatible sketch dimensions for merge: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            SketchError::InvalidErrorBounds { epsilon, delta } => write!(
                f,
                "invalid error bounds: epsilon {}, delta {}, which should be in range (0.0, 1.0)",
                *epsilon, *delta
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SketchError {}
