//! Deterministic random number generation.
//!
//! RULE: Nothing in the pipeline may call a platform RNG.
//! All randomness flows through StageRng instances derived
//! from the single master seed of the run.
//!
//! Each stage gets its own RNG stream, seeded deterministically
//! from (master_seed XOR stage_index). This means:
//!   - Adding a new stage never changes existing stages' streams.
//!   - Each stage's stream is fully reproducible in isolation.

use rand::{distributions::Distribution, seq::SliceRandom, Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single pipeline stage.
pub struct StageRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StageRng {
    /// Create a stage RNG from the master seed and a stable
    /// stage index. The index must never change once assigned.
    pub fn new(master_seed: u64, stage_index: u64) -> Self {
        let derived_seed = master_seed ^ (stage_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform integer in the half-open range [lo, hi).
    /// Returns `lo` when the range is empty.
    pub fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// Uniform index into a collection of length `len` (> 0).
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Pick one element uniformly.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    /// Categorical draw over `(value, weight)` pairs by cumulative roll.
    /// Falls back to the last entry when weights sum below the roll.
    pub fn pick_weighted<T: Copy>(&mut self, table: &[(T, f64)]) -> Option<T> {
        let roll = self.next_f64();
        let mut cumulative = 0.0;
        for (value, weight) in table {
            cumulative += weight;
            if roll < cumulative {
                return Some(*value);
            }
        }
        table.last().map(|(value, _)| *value)
    }

    /// Sample any `rand` distribution from this stream.
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.inner)
    }

    /// Derive an independent generator for library code that needs
    /// to own an `Rng + Clone` (k-means initialisation, bootstraps).
    pub fn fork(&mut self) -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(self.inner.next_u64())
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

/// All stage RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stage(&self, slot: StageSlot) -> StageRng {
        StageRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stage slot assignments.
/// NEVER reorder or remove entries; only append.
/// Reordering changes every stage's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StageSlot {
    Stores = 0,
    Products = 1,
    Customers = 2,
    Transactions = 3,
    Inventory = 4,
    RiskModel = 5,
    ClvModel = 6,
    Segmentation = 7,
}

impl StageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stores => "stores",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Transactions => "transactions",
            Self::Inventory => "inventory",
            Self::RiskModel => "risk_model",
            Self::ClvModel => "clv_model",
            Self::Segmentation => "segmentation",
        }
    }
}
