//! Structural memoization for indicator values.
//!
//! The cache is keyed by *what is being computed*, not by which indicator
//! object asked: a `CacheKey` is a structural description of a computation
//! (kind, inputs, scalar parameters), compared by deep value equality. Two
//! independently constructed indicator graphs with equal keys resolve to the
//! same slot and observe each other's cached results, so UI and strategy
//! code can rebuild indicator trees as often as they like without paying
//! for recomputation.
//!
//! The store itself is owned by the `CandleSeries` the values were computed
//! over, which makes (series identity, key) the effective address of a slot.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use tracing::trace;

/// Structural identity of a computation over a candle series.
///
/// Either a leaf marker (a primitive projection such as the close price) or
/// a composite embedding the keys of its inputs plus scalar parameters such
/// as a window length. Equality and hashing are deep and structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Leaf(&'static str),
    Composite {
        tag: &'static str,
        inputs: Vec<CacheKey>,
        params: Vec<i64>,
    },
}

impl CacheKey {
    pub const fn leaf(tag: &'static str) -> Self {
        CacheKey::Leaf(tag)
    }

    pub fn composite(tag: &'static str, inputs: Vec<CacheKey>, params: Vec<i64>) -> Self {
        CacheKey::Composite {
            tag,
            inputs,
            params,
        }
    }

    /// Build a composite from optional child keys.
    ///
    /// Returns `None` if any child is unkeyed: a computation over an
    /// unidentifiable input has no structural identity of its own and must
    /// not be memoized.
    pub fn compose(
        tag: &'static str,
        inputs: &[Option<&CacheKey>],
        params: Vec<i64>,
    ) -> Option<Self> {
        let inputs = inputs
            .iter()
            .map(|k| k.cloned())
            .collect::<Option<Vec<_>>>()?;
        Some(CacheKey::Composite {
            tag,
            inputs,
            params,
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Leaf(tag) => f.write_str(tag),
            CacheKey::Composite {
                tag,
                inputs,
                params,
            } => {
                write!(f, "{tag}(")?;
                for (i, input) in inputs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{input}")?;
                }
                for p in params {
                    f.write_str("; ")?;
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Per-key value table.
///
/// `values[i]` is the memoized result at candle index `i`; holes are indices
/// never queried. `frontier` is the highest contiguously filled index for
/// recursive (self-referential) indicators — the point their forward fill
/// resumes from.
#[derive(Debug, Default)]
struct CacheSlot {
    values: Vec<Option<Decimal>>,
    frontier: Option<usize>,
}

impl CacheSlot {
    fn get(&self, index: usize) -> Option<Decimal> {
        self.values.get(index).copied().flatten()
    }

    fn put(&mut self, index: usize, value: Decimal) {
        if self.values.len() <= index {
            self.values.resize(index + 1, None);
        }
        self.values[index] = Some(value);
    }
}

/// All memoized indicator values of one candle series.
#[derive(Debug, Default)]
pub(crate) struct CacheStore {
    slots: HashMap<CacheKey, CacheSlot>,
}

impl CacheStore {
    pub(crate) fn lookup(&self, key: &CacheKey, index: usize) -> Option<Decimal> {
        self.slots.get(key).and_then(|slot| slot.get(index))
    }

    pub(crate) fn store(&mut self, key: &CacheKey, index: usize, value: Decimal) {
        self.slots.entry(key.clone()).or_default().put(index, value);
    }

    /// Frontier of a recursive slot together with its value, if any.
    pub(crate) fn frontier(&self, key: &CacheKey) -> Option<(usize, Decimal)> {
        let slot = self.slots.get(key)?;
        let frontier = slot.frontier?;
        let value = slot.get(frontier)?;
        Some((frontier, value))
    }

    /// Store a recursive value and advance the slot frontier to `index`.
    ///
    /// Recursive slots are only ever filled front-to-back, so the frontier
    /// moves monotonically except when `evict_at` rolls it back.
    pub(crate) fn store_recursive(&mut self, key: &CacheKey, index: usize, value: Decimal) {
        let slot = self.slots.entry(key.clone()).or_default();
        slot.put(index, value);
        if slot.frontier.map_or(true, |f| f < index) {
            slot.frontier = Some(index);
        }
    }

    /// Evict every slot's entry at `index` (the series tail) and roll
    /// recursive frontiers back so the next query recomputes exactly the
    /// evicted step.
    pub(crate) fn evict_at(&mut self, index: usize) {
        let mut evicted = 0usize;
        for slot in self.slots.values_mut() {
            if let Some(value) = slot.values.get_mut(index) {
                if value.take().is_some() {
                    evicted += 1;
                }
            }
            if slot.frontier == Some(index) {
                slot.frontier = index.checked_sub(1);
            }
        }
        if evicted > 0 {
            trace!(index, evicted, "evicted tail cache entries");
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
