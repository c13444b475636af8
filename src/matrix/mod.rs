//! Fragment matrix: pairs order fragments into comparison fragments.
//!
//! ## Architecture
//!
//! The matrix holds the order fragments this node has received, split by
//! side, and caches every comparison fragment it has built:
//!
//! - **Slab**: Pre-allocated storage for active order fragments
//! - **HashMap** (per side): fragment id to slab key
//! - **HashMap of HashMap**: buy fragment id to sell fragment id to the
//!   comparison fragment built from the pair
//! - **HashSet**: retired fragment ids, so late duplicate deliveries are
//!   ignored
//!
//! A new buy fragment is combined with every active sell fragment and vice
//! versa. Each pair is combined at most once.
//!
//! ## Concurrency
//!
//! All state sits behind one `parking_lot::RwLock`. Inserts and removals take
//! the write lock; lookups and counters take the read lock. The matrix never
//! calls into the builder: the caller forwards the returned fragments.
//!
//! ## Example
//!
//! ```
//! use dark_matcher::matrix::FragmentMatrix;
//! use dark_matcher::shamir::Prime;
//! use dark_matcher::types::{Order, OrderId, Side};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let prime = Prime::reference();
//! let mut rng = ChaCha8Rng::seed_from_u64(3);
//! let buy = Order::new(OrderId::digest(b"buy"), Side::Buy, 1, 2, 10, 1000, 100)
//!     .split(3, 2, &prime, &mut rng)
//!     .unwrap();
//! let sell = Order::new(OrderId::digest(b"sell"), Side::Sell, 1, 2, 10, 1000, 100)
//!     .split(3, 2, &prime, &mut rng)
//!     .unwrap();
//!
//! let matrix = FragmentMatrix::new(prime);
//! assert!(matrix.insert_order_fragment(buy[0].clone()).is_empty());
//!
//! let built = matrix.insert_order_fragment(sell[0].clone());
//! assert_eq!(built.len(), 1);
//! assert!(matrix.lookup(&buy[0].id, &sell[0].id).is_some());
//! ```

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use slab::Slab;
use tracing::{debug, trace};

use crate::shamir::Prime;
use crate::types::{ComparisonFragment, OrderFragment, OrderFragmentId, Side};

/// Concurrent matrix of order fragments and their pairwise comparisons.
#[derive(Debug)]
pub struct FragmentMatrix {
    prime: Prime,
    state: RwLock<MatrixState>,
}

#[derive(Debug, Default)]
struct MatrixState {
    /// Active order fragments
    fragments: Slab<OrderFragment>,

    /// Buy fragment id to slab key
    buys: HashMap<OrderFragmentId, usize>,

    /// Sell fragment id to slab key
    sells: HashMap<OrderFragmentId, usize>,

    /// Buy fragment id -> sell fragment id -> comparison fragment
    comparisons: HashMap<OrderFragmentId, HashMap<OrderFragmentId, ComparisonFragment>>,

    /// Fragment ids that were removed and must not come back
    completed: HashSet<OrderFragmentId>,
}

impl MatrixState {
    fn is_known(&self, id: &OrderFragmentId) -> bool {
        self.completed.contains(id) || self.buys.contains_key(id) || self.sells.contains_key(id)
    }

    fn side_index(&self, side: Side) -> &HashMap<OrderFragmentId, usize> {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    fn side_index_mut(&mut self, side: Side) -> &mut HashMap<OrderFragmentId, usize> {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }
}

impl FragmentMatrix {
    /// Create an empty matrix over `prime`
    pub fn new(prime: Prime) -> Self {
        Self::with_capacity(prime, 0)
    }

    /// Create a matrix with room for `fragment_capacity` active fragments
    pub fn with_capacity(prime: Prime, fragment_capacity: usize) -> Self {
        let state = MatrixState {
            fragments: Slab::with_capacity(fragment_capacity),
            ..MatrixState::default()
        };
        Self {
            prime,
            state: RwLock::new(state),
        }
    }

    /// Field modulus used for share subtraction
    pub fn prime(&self) -> &Prime {
        &self.prime
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert an order fragment and return the comparison fragments it forms
    /// with every active fragment of the opposite side.
    ///
    /// Re-inserting a known or retired fragment returns an empty list, as
    /// does a fragment that combines with nothing. Incompatible pairs are
    /// skipped without any indication of why.
    pub fn insert_order_fragment(&self, fragment: OrderFragment) -> Vec<ComparisonFragment> {
        match fragment.side {
            Side::Buy => self.insert_buy(fragment),
            Side::Sell => self.insert_sell(fragment),
        }
    }

    fn insert_buy(&self, buy: OrderFragment) -> Vec<ComparisonFragment> {
        let mut state = self.state.write();
        if state.is_known(&buy.id) {
            trace!(fragment = %buy.id, "duplicate buy fragment ignored");
            return Vec::new();
        }

        let mut row = HashMap::new();
        for &key in state.sells.values() {
            let sell = &state.fragments[key];
            match ComparisonFragment::combine(&buy, sell, &self.prime) {
                Ok(comparison) => {
                    row.insert(sell.id, comparison);
                }
                Err(_) => trace!(buy = %buy.id, sell = %sell.id, "pair skipped"),
            }
        }

        let built: Vec<ComparisonFragment> = row.values().cloned().collect();
        let buy_id = buy.id;
        let key = state.fragments.insert(buy);
        state.buys.insert(buy_id, key);
        if !row.is_empty() {
            state.comparisons.insert(buy_id, row);
        }

        debug!(fragment = %buy_id, built = built.len(), "buy fragment inserted");
        built
    }

    fn insert_sell(&self, sell: OrderFragment) -> Vec<ComparisonFragment> {
        let mut state = self.state.write();
        if state.is_known(&sell.id) {
            trace!(fragment = %sell.id, "duplicate sell fragment ignored");
            return Vec::new();
        }

        let mut column = Vec::new();
        for &key in state.buys.values() {
            let buy = &state.fragments[key];
            match ComparisonFragment::combine(buy, &sell, &self.prime) {
                Ok(comparison) => column.push(comparison),
                Err(_) => trace!(buy = %buy.id, sell = %sell.id, "pair skipped"),
            }
        }

        let sell_id = sell.id;
        let key = state.fragments.insert(sell);
        state.sells.insert(sell_id, key);
        for comparison in &column {
            state
                .comparisons
                .entry(comparison.buy_fragment_id)
                .or_default()
                .insert(sell_id, comparison.clone());
        }

        debug!(fragment = %sell_id, built = column.len(), "sell fragment inserted");
        column
    }

    /// Retire an order fragment.
    ///
    /// The fragment stops pairing with future arrivals and every cached
    /// comparison fragment involving it is dropped. Comparison fragments
    /// already handed out are unaffected. Removing an unknown fragment still
    /// retires its id, so a late insert of it is ignored.
    pub fn remove_order_fragment(&self, fragment: &OrderFragment) {
        let mut state = self.state.write();
        state.completed.insert(fragment.id);

        let Some(key) = state.side_index_mut(fragment.side).remove(&fragment.id) else {
            trace!(fragment = %fragment.id, "removed fragment was not active");
            return;
        };
        state.fragments.remove(key);

        let dropped = match fragment.side {
            Side::Buy => state
                .comparisons
                .remove(&fragment.id)
                .map_or(0, |row| row.len()),
            Side::Sell => {
                let mut dropped = 0;
                state.comparisons.retain(|_, row| {
                    if row.remove(&fragment.id).is_some() {
                        dropped += 1;
                    }
                    !row.is_empty()
                });
                dropped
            }
        };

        debug!(fragment = %fragment.id, side = ?fragment.side, dropped, "order fragment removed");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Cached comparison fragment for a (buy, sell) fragment pair
    pub fn lookup(&self, buy: &OrderFragmentId, sell: &OrderFragmentId) -> Option<ComparisonFragment> {
        let state = self.state.read();
        state.comparisons.get(buy)?.get(sell).cloned()
    }

    /// Whether a fragment is currently active on the given side
    pub fn contains(&self, side: Side, id: &OrderFragmentId) -> bool {
        self.state.read().side_index(side).contains_key(id)
    }

    /// Whether a fragment id has been retired
    pub fn is_completed(&self, id: &OrderFragmentId) -> bool {
        self.state.read().completed.contains(id)
    }

    /// Number of active buy fragments
    pub fn buy_count(&self) -> usize {
        self.state.read().buys.len()
    }

    /// Number of active sell fragments
    pub fn sell_count(&self) -> usize {
        self.state.read().sells.len()
    }

    /// Number of cached comparison fragments
    pub fn comparison_fragment_count(&self) -> usize {
        self.state.read().comparisons.values().map(HashMap::len).sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
