//! Quantized request keys and the bounded LRU that owns result bundles.
//!
//! The cache is single-threaded: one coordinator drives it, and
//! borrows handed out by [`LruCache::get`] stay valid until the next
//! mutating call. Recency is an intrusive doubly linked list over a slab of
//! nodes, so both the splice-to-MRU in `get` and the eviction in `insert`
//! are O(1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{SurfaceBundle, SurfaceError};

/// Quantization scale giving 1e-6 absolute precision on request parameters.
const QUANT_SCALE: f64 = 1.0e6;

/// A surface request reduced to ten integers.
///
/// Floating parameters are truncated at 1e-6 precision, so requests that
/// differ by less than the scale alias to the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingKey {
    n_sigma: i64,
    n_strike: i64,
    spot: i64,
    rate: i64,
    dividend: i64,
    sigma_lo: i64,
    sigma_hi: i64,
    strike_lo: i64,
    strike_hi: i64,
    expiry: i64,
}

impl PricingKey {
    /// Quantizes the ten request parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n_sigma: usize,
        n_strike: usize,
        spot: f64,
        rate: f64,
        dividend: f64,
        sigma_lo: f64,
        sigma_hi: f64,
        strike_lo: f64,
        strike_hi: f64,
        expiry: f64,
    ) -> Self {
        Self {
            n_sigma: n_sigma as i64,
            n_strike: n_strike as i64,
            spot: quantize(spot),
            rate: quantize(rate),
            dividend: quantize(dividend),
            sigma_lo: quantize(sigma_lo),
            sigma_hi: quantize(sigma_hi),
            strike_lo: quantize(strike_lo),
            strike_hi: quantize(strike_hi),
            expiry: quantize(expiry),
        }
    }
}

/// Truncation toward zero, matching the key layout consumers already rely on.
#[inline]
fn quantize(param: f64) -> i64 {
    (param * QUANT_SCALE) as i64
}

/// Sentinel for "no neighbor" in the recency list.
const NIL: usize = usize::MAX;

struct Node {
    key: PricingKey,
    bundle: SurfaceBundle,
    prev: usize,
    next: usize,
}

/// Bounded LRU mapping [`PricingKey`] to [`SurfaceBundle`].
///
/// Capacity is clamped to at least one entry. `head` is the least recently
/// used node, `tail` the most recently used.
pub struct LruCache {
    capacity: usize,
    map: HashMap<PricingKey, usize>,
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
}

impl LruCache {
    /// Creates a cache holding at most `capacity` bundles (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
        }
    }

    /// Maximum number of live entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Membership test; does not touch recency.
    #[inline]
    pub fn contains(&self, key: &PricingKey) -> bool {
        self.map.contains_key(key)
    }

    /// Borrows the bundle for `key` and marks it most recently used.
    pub fn get(&mut self, key: &PricingKey) -> Result<&SurfaceBundle, SurfaceError> {
        let slot = *self.map.get(key).ok_or(SurfaceError::NotFound)?;
        self.detach(slot);
        self.attach_tail(slot);
        Ok(&self.nodes[slot].bundle)
    }

    /// Stores `bundle` under `key` as the most recently used entry, evicting
    /// the least recently used entry at capacity. Inserting an existing key
    /// replaces its bundle in place.
    pub fn insert(&mut self, key: PricingKey, bundle: SurfaceBundle) {
        if let Some(&slot) = self.map.get(&key) {
            self.nodes[slot].bundle = bundle;
            self.detach(slot);
            self.attach_tail(slot);
            return;
        }

        if self.map.len() == self.capacity {
            // Reuse the evicted slot for the new entry.
            let slot = self.head;
            self.map.remove(&self.nodes[slot].key);
            self.detach(slot);
            self.nodes[slot].key = key;
            self.nodes[slot].bundle = bundle;
            self.map.insert(key, slot);
            self.attach_tail(slot);
            return;
        }

        let slot = self.nodes.len();
        self.nodes.push(Node {
            key,
            bundle,
            prev: NIL,
            next: NIL,
        });
        self.map.insert(key, slot);
        self.attach_tail(slot);
    }

    fn detach(&mut self, slot: usize) {
        let prev = self.nodes[slot].prev;
        let next = self.nodes[slot].next;
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[slot].prev = NIL;
        self.nodes[slot].next = NIL;
    }

    fn attach_tail(&mut self, slot: usize) {
        self.nodes[slot].prev = self.tail;
        self.nodes[slot].next = NIL;
        if self.tail == NIL {
            self.head = slot;
        } else {
            self.nodes[self.tail].next = slot;
        }
        self.tail = slot;
    }
}
