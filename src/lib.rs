//! A concurrent count-min sketch for approximate frequency counting.
//!
//! The sketch answers "how many times has this key been seen?" in memory that
//! depends only on its `width` and `depth`, never on the number of distinct
//! keys. Estimates are never below the true count and only exceed it when keys
//! collide, which makes the structure a good fit for LFU-style admission and
//! eviction policies and for hot-key detection.
//!
//! Counters are atomic, so a shared [`Sketch`] can be inserted into and
//! queried from many threads without a lock.
//!
//! [`Sketch`]: struct.Sketch.html
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod macros;

mod builder;
mod error;
mod hasher;
mod matrix;
mod polyfill;
mod sketch;

pub use builder::SketchBuilder;
pub use error::SketchError;
pub use hasher::{HashFamily, SeededHashFamily, DEFAULT_SEED};
pub use sketch::Sketch;

cfg_std!(
    /// Hash builder used by the row hash functions unless configured otherwise.
    ///
    /// Deterministic across instances, so two sketches with the same seed agree
    /// on every slot.
    pub type DefaultHashBuilder =
        core::hash::BuildHasherDefault<std::collections::hash_map::DefaultHasher>;
);

cfg_not_std!(
    /// Hash builder used by the row hash functions unless configured otherwise.
    ///
    /// Deterministic across instances, so two sketches with the same seed agree
    /// on every slot.
    pub type DefaultHashBuilder = core::hash::BuildHasherDefault<rustc_hash::FxHasher>;
);
