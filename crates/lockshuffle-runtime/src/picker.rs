#![forbid(unsafe_code)]

//! Mode picking: full coverage before repeats, no immediate repeats.
//!
//! The picker owns a working pool of "not yet chosen this cycle" candidate
//! indices. Every eligible mode is chosen exactly once before the pool refills
//! and anything repeats, and the most recent pick is never chosen twice in a
//! row — except when only one candidate exists at all, in which case it is the
//! only possible answer.
//!
//! # Pool mechanics
//!
//! The pool is a plain vector used as a removable unordered set: a pick swaps
//! the chosen slot with the last live element and shrinks the live region
//! (`Vec::swap_remove`). When the pool drains it is refilled from the full
//! candidate array before the next pick, so callers never observe it empty.
//!
//! # Termination of rejection sampling
//!
//! Random picking re-rolls until the chosen slot differs from the previous
//! pick. This terminates because the single-element pool is handled by a
//! dedicated branch first: whenever the sampling loop is entered the pool
//! holds at least two distinct candidates, at most one of which can equal the
//! previous pick.
//!
//! # Degraded operation
//!
//! If the pool's backing storage cannot be allocated, picking still returns a
//! usable index: the first candidate in sequential mode, or a uniform draw
//! over the whole candidate array in random mode. Allocation is retried on
//! the next pick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Selection discipline for [`ModePicker::pick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Uniformly random over the remaining pool, avoiding the previous pick.
    Random,
    /// Deterministic walk: next live slot after the previous one.
    Sequential,
}

/// Stateful picker over a fixed candidate set of registry indices.
#[derive(Debug)]
pub struct ModePicker {
    /// Full candidate set, registry order. Never mutated after construction.
    candidates: Vec<usize>,
    /// Live pool of not-yet-picked candidates for the current cycle.
    pool: Vec<usize>,
    /// Registry index returned by the previous pick.
    last_picked: Option<usize>,
    /// Previous pool slot, sequential discipline only.
    last_slot: Option<usize>,
    selection: Selection,
    rng: StdRng,
}

impl ModePicker {
    /// Create a picker over `candidates` (must be non-empty).
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty; the parser guarantees a non-empty set
    /// for any non-empty registry, so an empty set here is a host bug.
    pub fn new(candidates: Vec<usize>, selection: Selection) -> Self {
        Self::with_rng(candidates, selection, StdRng::from_entropy())
    }

    /// Create a picker with a seeded RNG, for reproducible sequences.
    pub fn seeded(candidates: Vec<usize>, selection: Selection, seed: u64) -> Self {
        Self::with_rng(candidates, selection, StdRng::seed_from_u64(seed))
    }

    fn with_rng(candidates: Vec<usize>, selection: Selection, rng: StdRng) -> Self {
        assert!(!candidates.is_empty(), "picker needs at least one candidate");
        Self {
            candidates,
            pool: Vec::new(),
            last_picked: None,
            last_slot: None,
            selection,
            rng,
        }
    }

    /// Number of candidates in the full eligible set.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Produce the next mode index to activate.
    pub fn pick(&mut self) -> usize {
        // Make sure the pool's storage exists; degrade (and retry next call)
        // if it cannot be allocated.
        let needed = self.candidates.len().saturating_sub(self.pool.capacity());
        if needed > 0 && self.pool.try_reserve_exact(needed).is_err() {
            return self.degraded_pick();
        }

        if self.pool.is_empty() {
            self.pool.extend_from_slice(&self.candidates);
        }

        if self.pool.len() == 1 {
            // Only one left; use it even if it equals the previous pick.
            self.last_slot = None;
            let mode = self.pool.pop().expect("pool refilled above");
            self.last_picked = Some(mode);
            return mode;
        }

        let slot = match self.selection {
            Selection::Sequential => {
                let slot = self.last_slot.map_or(0, |s| s + 1) % self.pool.len();
                self.last_slot = Some(slot);
                slot
            }
            Selection::Random => loop {
                let slot = self.rng.gen_range(0..self.pool.len());
                if Some(self.pool[slot]) != self.last_picked {
                    break slot;
                }
            },
        };

        let mode = self.pool.swap_remove(slot);
        self.last_picked = Some(mode);
        mode
    }

    /// Fallback when pool storage is unavailable: still a valid index.
    fn degraded_pick(&mut self) -> usize {
        match self.selection {
            Selection::Sequential => self.candidates[0],
            Selection::Random => self.candidates[self.rng.gen_range(0..self.candidates.len())],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
