//! Threshold reconstruction of comparisons.

use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::MatcherConfig;
use crate::error::{MatchError, ShamirError};
use crate::shamir::{self, Prime};
use crate::types::{Comparison, ComparisonFragment, ComparisonFragmentId, ComparisonId};

/// Why an inserted fragment did not count toward its comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The comparison was already reconstructed
    AlreadyBuilt,
    /// This fragment id was already consumed
    DuplicateFragment,
    /// The pending group holds a fragment of a different comparison
    ForeignFragment,
}

/// Result of inserting one comparison fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Recorded; the threshold has not been reached yet
    Pending,
    /// This insert reached the threshold
    Produced(Comparison),
    /// Ignored
    Rejected(Rejection),
}

impl BuildOutcome {
    /// Collapse to the externally visible result: a comparison or nothing
    pub fn into_comparison(self) -> Option<Comparison> {
        match self {
            BuildOutcome::Produced(comparison) => Some(comparison),
            BuildOutcome::Pending | BuildOutcome::Rejected(_) => None,
        }
    }
}

/// Collects comparison fragments from many nodes and reconstructs each
/// comparison exactly once, as soon as `k` distinct fragments have arrived.
#[derive(Debug)]
pub struct ComparisonBuilder {
    k: usize,
    prime: Prime,
    state: RwLock<BuilderState>,
}

#[derive(Debug, Default)]
struct BuilderState {
    /// Fragments received per comparison that has not been built yet
    pending: HashMap<ComparisonId, Vec<ComparisonFragment>>,

    /// Comparisons already reconstructed
    built: HashSet<ComparisonId>,

    /// Every fragment id ever recorded
    consumed: HashSet<ComparisonFragmentId>,
}

impl ComparisonBuilder {
    /// Create a builder with reconstruction threshold `k` over `prime`.
    ///
    /// A threshold of 0 is raised to 1; use [`MatcherConfig::validate`] to
    /// reject it instead.
    pub fn new(k: usize, prime: Prime) -> Self {
        Self {
            k: k.max(1),
            prime,
            state: RwLock::new(BuilderState::default()),
        }
    }

    /// Create a builder from a validated configuration
    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(config.threshold, config.prime.clone())
    }

    /// Reconstruction threshold
    #[inline]
    pub fn threshold(&self) -> usize {
        self.k
    }

    /// Field modulus the comparisons are reconstructed in
    #[inline]
    pub fn prime(&self) -> &Prime {
        &self.prime
    }

    /// Insert a comparison fragment.
    ///
    /// Returns the comparison if this fragment completed it, and `None`
    /// otherwise: below threshold, duplicate, or already built.
    ///
    /// # Errors
    ///
    /// [`MatchError::Reconstruction`] if `k` fragments have arrived but
    /// fewer than `k` of them carry distinct share indices, or the shares
    /// could not be joined. The comparison stays pending; a later fragment
    /// with a fresh index can still complete it.
    pub fn insert_comparison_fragment(
        &self,
        fragment: ComparisonFragment,
    ) -> Result<Option<Comparison>, MatchError> {
        self.insert_with_outcome(fragment).map(BuildOutcome::into_comparison)
    }

    /// Insert a comparison fragment and report exactly what happened to it.
    pub fn insert_with_outcome(&self, fragment: ComparisonFragment) -> Result<BuildOutcome, MatchError> {
        let mut state = self.state.write();
        let comparison_id = fragment.comparison_id;

        if state.built.contains(&comparison_id) {
            return Ok(BuildOutcome::Rejected(Rejection::AlreadyBuilt));
        }
        if !state.consumed.insert(fragment.id) {
            return Ok(BuildOutcome::Rejected(Rejection::DuplicateFragment));
        }

        let group = state.pending.entry(comparison_id).or_default();
        group.push(fragment);
        if group.len() < self.k {
            debug!(comparison = %comparison_id, received = group.len(), k = self.k, "comparison pending");
            return Ok(BuildOutcome::Pending);
        }

        if group.iter().any(|f| f.comparison_id != comparison_id) {
            return Ok(BuildOutcome::Rejected(Rejection::ForeignFragment));
        }

        let comparison = match self.reconstruct(comparison_id, group) {
            Ok(comparison) => comparison,
            Err(err) => {
                warn!(comparison = %comparison_id, error = %err, "reconstruction failed");
                return Err(err);
            }
        };

        state.pending.remove(&comparison_id);
        state.built.insert(comparison_id);
        info!(
            comparison = %comparison_id,
            buy = %comparison.buy_order_id,
            sell = %comparison.sell_order_id,
            "comparison reconstructed"
        );
        Ok(BuildOutcome::Produced(comparison))
    }

    fn reconstruct(&self, id: ComparisonId, group: &[ComparisonFragment]) -> Result<Comparison, MatchError> {
        // First arrival wins for each share index; later clashes are ignored
        let mut seen = HashSet::with_capacity(group.len());
        let mut clash = None;
        let members: Vec<&ComparisonFragment> = group
            .iter()
            .filter(|f| {
                let fresh = seen.insert(f.index());
                if !fresh && clash.is_none() {
                    clash = Some(f.index());
                }
                fresh
            })
            .collect();
        if members.len() < self.k {
            let err = match clash {
                Some(index) => ShamirError::DuplicateIndex(index),
                None => ShamirError::EmptyShares,
            };
            return Err(err.into());
        }

        let indices: Vec<u64> = members.iter().map(|f| f.index()).collect();
        let coefficients = shamir::lagrange_coefficients(&self.prime, &indices)?;

        // All five values are shared over the same indices
        let join = |value: usize| -> Result<BigUint, MatchError> {
            let values = members.iter().map(|f| f.values()[value]);
            Ok(shamir::interpolate(&self.prime, &coefficients, values)?)
        };

        let first = members[0];
        Ok(Comparison {
            id,
            buy_order_id: first.buy_order_id,
            sell_order_id: first.sell_order_id,
            code_diff1: join(0)?,
            code_diff2: join(1)?,
            price_diff: join(2)?,
            volume_diff1: join(3)?,
            volume_diff2: join(4)?,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether the comparison has been reconstructed
    pub fn has_comparison(&self, id: &ComparisonId) -> bool {
        self.state.read().built.contains(id)
    }

    /// Whether the comparison fragment has been received
    pub fn has_comparison_fragment(&self, id: &ComparisonFragmentId) -> bool {
        self.state.read().consumed.contains(id)
    }

    /// Fragments received for a comparison that is still below threshold
    pub fn pending_count(&self, id: &ComparisonId) -> usize {
        self.state.read().pending.get(id).map_or(0, Vec::len)
    }

    /// Drop the pending group of a comparison that will never complete.
    ///
    /// Consumed fragment ids stay consumed, so the dropped fragments cannot
    /// be replayed. Returns the number of fragments dropped.
    pub fn prune_pending(&self, id: &ComparisonId) -> usize {
        let dropped = self.state.write().pending.remove(id).map_or(0, |group| group.len());
        if dropped > 0 {
            debug!(comparison = %id, dropped, "pending comparison pruned");
        }
        dropped
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
