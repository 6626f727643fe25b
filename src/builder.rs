use crate::error::SketchError;
use crate::hasher::{SeededHashFamily, DEFAULT_SEED};
use crate::matrix::CounterMatrix;
use crate::{DefaultHashBuilder, Sketch};
use core::hash::{BuildHasher, Hash};

/// `SketchBuilder` is used to help build a [`Sketch`] with custom configurations.
///
/// # Example
///
/// ```
/// use minsketch::{Sketch, SketchBuilder};
/// use rustc_hash::FxHasher;
/// use std::hash::BuildHasherDefault;
///
/// let builder = SketchBuilder::new(2048, 5)
///     .set_seed(7)
///     .set_hasher(BuildHasherDefault::<FxHasher>::default());
/// let sketch: Sketch<u64, _> = Sketch::from_builder(builder).unwrap();
/// assert_eq!(sketch.width(), 2048);
/// assert_eq!(sketch.depth(), 5);
/// assert_eq!(sketch.seed(), 7);
/// ```
///
/// [`Sketch`]: struct.Sketch.html
#[derive(Debug)]
pub struct SketchBuilder<S = DefaultHashBuilder> {
    width: usize,
    depth: usize,
    seed: u64,
    hasher: S,
}

impl<S: BuildHasher + Default> Default for SketchBuilder<S> {
    fn default() -> Self {
        Self {
            width: 0,
            depth: 0,
            seed: DEFAULT_SEED,
            hasher: S::default(),
        }
    }
}

impl SketchBuilder {
    /// The constructor of SketchBuilder
    pub fn new(width: usize, depth: usize) -> Self {
        Self::default().set_width(width).set_depth(depth)
    }
}

impl<S: BuildHasher> SketchBuilder<S> {
    /// Set the number of columns per row
    pub fn set_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    /// Set the number of rows (hash functions)
    pub fn set_depth(self, depth: usize) -> Self {
        Self { depth, ..self }
    }

    /// Set the master seed the row hash functions are derived from
    pub fn set_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Set the hash builder used by every row. The builder must not carry
    /// per-instance random state if the sketch is going to be merged.
    pub fn set_hasher<NS: BuildHasher>(self, hasher: NS) -> SketchBuilder<NS> {
        SketchBuilder {
            width: self.width,
            depth: self.depth,
            seed: self.seed,
            hasher,
        }
    }

    /// Returns the configured width
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the configured depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the configured master seed
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Consumes the builder and creates the [`Sketch`].
    ///
    /// [`Sketch`]: struct.Sketch.html
    pub fn finalize<K: Hash>(self) -> Result<Sketch<K, SeededHashFamily<S>>, SketchError> {
        // counters first: a depth that cannot be allocated never reaches the seeds
        let matrix = CounterMatrix::new(self.width, self.depth)?;
        let family = SeededHashFamily::with_hasher(self.depth, self.seed, self.hasher);
        Ok(Sketch::from_parts(family, matrix))
    }
}
