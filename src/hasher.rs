//! Row-indexed hash functions for the sketch.
//!
//! Every row of a sketch owns one hash function. Rows are kept independent by
//! feeding a distinct per-row seed into a fresh hasher before the key, so two
//! keys that collide in one row are not more likely to collide in another.
use crate::DefaultHashBuilder;
use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::hash::{BuildHasher, Hash, Hasher};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Master seed used when none is configured. Sketches built with the same
/// master seed, hasher and depth map every key to the same slots, which is
/// what makes [`Sketch::merge`] exact.
///
/// [`Sketch::merge`]: struct.Sketch.html#method.merge
pub const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// `HashFamily` produces one deterministic hash function per sketch row.
pub trait HashFamily {
    /// Returns the number of hash functions in the family.
    fn depth(&self) -> usize;

    /// Hashes `key` with the function of `row`. `row` must be in `[0, depth)`.
    fn hash_row<Q: Hash + ?Sized>(&self, row: usize, key: &Q) -> u64;

    /// Returns true if both families map every key to the same value in every row.
    fn same_mapping(&self, other: &Self) -> bool;
}

/// `SeededHashFamily` derives the per-row seeds from one master seed.
pub struct SeededHashFamily<S = DefaultHashBuilder> {
    seed: u64,
    seeds: Box<[u64]>,
    builder: S,
}

impl SeededHashFamily {
    /// Creates a family of `depth` functions using the default hash builder.
    pub fn new(depth: usize, seed: u64) -> Self {
        Self::with_hasher(depth, seed, DefaultHashBuilder::default())
    }
}

impl<S: BuildHasher> SeededHashFamily<S> {
    /// Creates a family of `depth` functions on top of the given hash builder.
    ///
    /// The builder must be deterministic (no per-instance random keys) for
    /// two families with the same seed to agree.
    pub fn with_hasher(depth: usize, seed: u64, builder: S) -> Self {
        Self {
            seed,
            seeds: expand_seeds(depth, seed),
            builder,
        }
    }

    /// Returns the master seed the row seeds were derived from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the per-row seeds.
    #[inline]
    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }
}

impl<S: BuildHasher> HashFamily for SeededHashFamily<S> {
    #[inline]
    fn depth(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    fn hash_row<Q: Hash + ?Sized>(&self, row: usize, key: &Q) -> u64 {
        check!(row < self.seeds.len(), "row out of range");
        let mut h = self.builder.build_hasher();
        h.write_u64(self.seeds[row]);
        key.hash(&mut h);
        fmix64(h.finish())
    }

    fn same_mapping(&self, other: &Self) -> bool {
        // equal seeds are not enough: randomly keyed builders disagree per instance
        self.seeds == other.seeds
            && (0..self.seeds.len())
                .all(|row| self.hash_row(row, &row) == other.hash_row(row, &row))
    }
}

impl<S> Debug for SeededHashFamily<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeededHashFamily")
            .field("seed", &self.seed)
            .field("seeds", &self.seeds)
            .finish()
    }
}

// expand one master seed into `depth` pairwise distinct row seeds
fn expand_seeds(depth: usize, seed: u64) -> Box<[u64]> {
    let mut source = StdRng::seed_from_u64(seed);
    let mut seen = BTreeSet::new();
    let mut seeds: Vec<u64> = Vec::with_capacity(depth);
    while seeds.len() < depth {
        let s = source.gen::<u64>();
        if seen.insert(s) {
            seeds.push(s);
        }
    }
    seeds.into_boxed_slice()
}

// murmur3 64-bit finalizer, spreads low-entropy hasher output over all bits
#[inline(always)]
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}
