//! Card identifiers and their generation.
//!
//! ## Key Features
//!
//! - **Unique**: a generator never hands out the same id twice
//! - **Deterministic when seeded**: same seed produces the same id sequence
//! - **Entropy by default**: unseeded generators in separate form instances
//!   do not collide in practice
//!
//! ```
//! use card_entry::core::CardIdGenerator;
//!
//! let mut a = CardIdGenerator::new(42);
//! let mut b = CardIdGenerator::new(42);
//!
//! assert_eq!(a.next_id(), b.next_id());
//! assert_ne!(a.next_id(), CardIdGenerator::new(42).next_id());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Unique identifier of an assembled card record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u64);

impl CardId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Generator of unique card ids.
///
/// Uses ChaCha8 for a fast, well-distributed stream and remembers every id it
/// issued, redrawing on the (unlikely) collision.
#[derive(Clone, Debug)]
pub struct CardIdGenerator {
    inner: ChaCha8Rng,
    issued: FxHashSet<CardId>,
}

impl CardIdGenerator {
    /// Create a generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            issued: FxHashSet::default(),
        }
    }

    /// Create a generator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
            issued: FxHashSet::default(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    #[must_use]
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Draw a fresh id, distinct from every id this generator issued before.
    pub fn next_id(&mut self) -> CardId {
        loop {
            let id = CardId(self.inner.gen());
            if self.issued.insert(id) {
                return id;
            }
        }
    }

    /// Number of ids issued so far.
    #[must_use]
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    #[must_use]
    pub fn has_issued(&self, id: CardId) -> bool {
        self.issued.contains(&id)
    }
}
