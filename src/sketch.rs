//! Count-min sketch over an atomic counter matrix.
//!
//! `Sketch` combines a [`HashFamily`] (one hash function per row) with a
//! `depth x width` matrix of atomic counters. Inserting a key bumps one cell in
//! every row; the estimate of a key is the minimum over its cells, so it never
//! underestimates the true count and only overestimates on collisions.
//!
//! [`HashFamily`]: trait.HashFamily.html
use crate::builder::SketchBuilder;
use crate::error::SketchError;
use crate::hasher::{HashFamily, SeededHashFamily, DEFAULT_SEED};
use crate::matrix::CounterMatrix;
use crate::polyfill::{ceil, ln};
use crate::DefaultHashBuilder;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::{Debug, Formatter};
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use log::{debug, trace, warn};

/// `Sketch` estimates how many times a key has been inserted, in memory that
/// only depends on `width` and `depth`.
///
/// All operations take `&self`. [`insert`] and [`count`] may run concurrently
/// from any number of threads. [`merge`] and [`clear`] update the matrix cell
/// by cell: they are safe to run alongside inserts but give no clean ordering
/// with them, so callers that need one must serialize these calls themselves.
///
/// A sketch can be moved but not cloned.
///
/// # Example
///
/// ```
/// use minsketch::Sketch;
///
/// let sketch: Sketch<&str> = Sketch::new(1024, 4).unwrap();
/// sketch.insert("apple");
/// sketch.insert("apple");
/// sketch.insert("banana");
///
/// assert!(sketch.count("apple") >= 2);
/// assert!(sketch.count("banana") >= 1);
///
/// let top = sketch.top_k(1, ["apple", "banana", "cherry"]);
/// assert_eq!(top[0].0, "apple");
/// ```
///
/// [`insert`]: struct.Sketch.html#method.insert
/// [`count`]: struct.Sketch.html#method.count
/// [`merge`]: struct.Sketch.html#method.merge
/// [`clear`]: struct.Sketch.html#method.clear
pub struct Sketch<K, H = SeededHashFamily<DefaultHashBuilder>> {
    family: H,
    matrix: CounterMatrix,
    marker: PhantomData<fn(&K)>,
}

impl<K: Hash> Sketch<K> {
    /// Creates a sketch with `width` columns and `depth` rows, seeded with
    /// [`DEFAULT_SEED`].
    ///
    /// Returns [`SketchError::InvalidDimensions`] if either is zero.
    ///
    /// [`DEFAULT_SEED`]: constant.DEFAULT_SEED.html
    /// [`SketchError::InvalidDimensions`]: enum.SketchError.html#variant.InvalidDimensions
    pub fn new(width: usize, depth: usize) -> Result<Self, SketchError> {
        Self::with_seed(width, depth, DEFAULT_SEED)
    }

    /// Creates a sketch whose row hash functions are derived from `seed`.
    /// Only sketches sharing a seed merge as if their keys had been inserted
    /// into one sketch.
    pub fn with_seed(width: usize, depth: usize, seed: u64) -> Result<Self, SketchError> {
        SketchBuilder::new(width, depth).set_seed(seed).finalize()
    }

    /// Creates a sketch with a master seed drawn from the thread-local RNG.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn with_random_seed(width: usize, depth: usize) -> Result<Self, SketchError> {
        use rand::Rng;
        Self::with_seed(width, depth, rand::thread_rng().gen::<u64>())
    }

    /// Creates a sketch sized for error bounds: estimates exceed the true
    /// count by at most `epsilon * N` (N the total of all inserts) with
    /// probability at least `1 - delta`.
    ///
    /// Uses `width = ceil(e / epsilon)` and `depth = ceil(ln(1 / delta))`.
    pub fn with_error_bounds(epsilon: f64, delta: f64) -> Result<Self, SketchError> {
        let in_range = |v: f64| v > 0.0 && v < 1.0;
        check_with!(
            in_range(epsilon) && in_range(delta),
            SketchError::InvalidErrorBounds { epsilon, delta }
        );

        // `as usize` saturates, so reject widths that do not fit first
        let width = ceil(core::f64::consts::E / epsilon);
        check_with!(
            width.is_finite() && width < usize::MAX as f64,
            SketchError::InvalidErrorBounds { epsilon, delta }
        );
        let depth = (ceil(ln(1.0 / delta)) as usize).max(1);
        Self::new(width as usize, depth)
    }
}

impl<K: Hash, S: BuildHasher> Sketch<K, SeededHashFamily<S>> {
    /// Creates a sketch from a [`SketchBuilder`].
    ///
    /// [`SketchBuilder`]: struct.SketchBuilder.html
    #[inline]
    pub fn from_builder(builder: SketchBuilder<S>) -> Result<Self, SketchError> {
        builder.finalize()
    }

    /// Returns the master seed of the row hash functions.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.family.seed()
    }
}

impl<K: Hash, H: HashFamily> Sketch<K, H> {
    /// Creates a sketch on top of a custom hash family. The depth is taken
    /// from the family.
    ///
    /// Returns [`SketchError::InvalidDimensions`] if the width or the depth is
    /// zero, or if the `width * depth` counters cannot be allocated.
    ///
    /// [`SketchError::InvalidDimensions`]: enum.SketchError.html#variant.InvalidDimensions
    pub fn with_hash_family(width: usize, family: H) -> Result<Self, SketchError> {
        let matrix = CounterMatrix::new(width, family.depth())?;
        Ok(Self::from_parts(family, matrix))
    }

    pub(crate) fn from_parts(family: H, matrix: CounterMatrix) -> Self {
        check!(family.depth() == matrix.depth(), "one hash function per row");
        debug!(
            "allocated count-min sketch of {}x{}",
            matrix.width(),
            matrix.depth()
        );
        Self {
            family,
            matrix,
            marker: PhantomData,
        }
    }

    /// Returns the number of columns per row.
    #[inline]
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    /// Returns the number of rows, i.e. the number of hash functions.
    #[inline]
    pub fn depth(&self) -> usize {
        self.matrix.depth()
    }

    /// Returns the hash family.
    #[inline]
    pub fn hash_family(&self) -> &H {
        &self.family
    }

    #[inline(always)]
    fn slot<Q>(&self, row: usize, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.family.hash_row(row, key) % self.matrix.width() as u64) as usize
    }

    /// Records one occurrence of `key`.
    #[inline]
    pub fn insert<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        (0..self.depth()).for_each(|row| {
            let col = self.slot(row, key);
            self.matrix.increment(row, col);
        })
    }

    /// Records `n` occurrences of `key`.
    pub fn add<Q>(&self, key: &Q, n: u32)
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        (0..self.depth()).for_each(|row| {
            let col = self.slot(row, key);
            self.matrix.add(row, col, n);
        })
    }

    /// Returns the estimated number of occurrences of `key`. Never less than
    /// the number of inserts since construction or the last [`clear`].
    ///
    /// [`clear`]: struct.Sketch.html#method.clear
    pub fn count<Q>(&self, key: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        (0..self.depth())
            .map(|row| self.matrix.read(row, self.slot(row, key)))
            .min()
            .unwrap_or(0)
    }

    /// Returns true if `other` has the same shape and hash functions, i.e.
    /// [`merge`] gives the same counts as inserting both key streams into one
    /// sketch.
    ///
    /// For [`SeededHashFamily`] this requires equal seeds and a hash builder
    /// that yields the same output in both sketches. Randomly keyed builders
    /// such as `std`'s `RandomState` never compare as mergeable.
    ///
    /// [`SeededHashFamily`]: struct.SeededHashFamily.html
    /// [`merge`]: struct.Sketch.html#method.merge
    pub fn is_mergeable_with(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.depth() == other.depth()
            && self.family.same_mapping(&other.family)
    }

    /// Adds the counters of `other` into this sketch, cell by cell.
    ///
    /// Returns [`SketchError::DimensionMismatch`] and changes nothing if the
    /// two sketches differ in width or depth. Merging sketches whose hash
    /// families differ (see [`is_mergeable_with`]) still never underestimates,
    /// but the result is no longer exact with respect to a single sketch.
    ///
    /// [`SketchError::DimensionMismatch`]: enum.SketchError.html#variant.DimensionMismatch
    /// [`is_mergeable_with`]: struct.Sketch.html#method.is_mergeable_with
    pub fn merge(&self, other: &Self) -> Result<(), SketchError> {
        let expected = (self.width(), self.depth());
        let found = (other.width(), other.depth());
        if expected != found {
            warn!(
                "rejecting merge of {}x{} sketch into {}x{} sketch",
                found.0, found.1, expected.0, expected.1
            );
            return Err(SketchError::DimensionMismatch { expected, found });
        }

        trace!("merging {}x{} sketch", expected.0, expected.1);
        self.matrix.add_all(&other.matrix);
        Ok(())
    }

    /// Resets every counter to zero. The hash functions are kept.
    pub fn clear(&self) {
        trace!("clearing {}x{} sketch", self.width(), self.depth());
        self.matrix.zero_all();
    }

    /// Ranks `candidates` by their estimated count and returns at most `k` of
    /// them, highest first.
    ///
    /// The sketch does not remember keys, so the caller supplies them. Sorting
    /// is stable: candidates with equal estimates keep their input order.
    pub fn top_k<I>(&self, k: usize, candidates: I) -> Vec<(K, u32)>
    where
        I: IntoIterator<Item = K>,
    {
        if k == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(K, u32)> = candidates
            .into_iter()
            .map(|key| {
                let est = self.count(&key);
                (key, est)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

impl<K, H: Debug> Debug for Sketch<K, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sketch")
            .field("width", &self.matrix.width())
            .field("depth", &self.matrix.depth())
            .field("family", &self.family)
            .field("matrix", &self.matrix)
            .finish()
    }
}
