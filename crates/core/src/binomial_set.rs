//! The growable, tombstone-deletable store of live binomials (§4.5): owns storage, the parallel
//! positive-support cache, and the [`SupportTree`] index, but not the divisibility predicate
//! itself — that belongs to [`crate::reducer`], which is the only consumer that knows how to
//! compare two binomials' magnitudes.
//!
//! Conceptually this is a bump-allocated arena addressed by a stable index, with deletions
//! recorded as tombstones rather than compacting the arena (so existing ids never move). The
//! arena's *raison d'être* — stable indices that survive deletion — doesn't actually require an
//! unsafe bump allocator in Rust: a `Vec<Option<Binomial>>` gives the same stable-id,
//! tombstone-on-delete behavior without any unsafe code or self-referential lifetimes, at the
//! cost of one extra pointer-sized discriminant per slot. See `DESIGN.md` for the full rationale.

use ipgb_math::{Binomial, BinomialLike};
use ipgb_utils::BitSet;

use crate::support_tree::SupportTree;

/// A growable store of binomials, each addressable by a stable id that survives deletion of
/// other elements (§4.5).
#[derive(Debug)]
pub struct BinomialSet {
	nonnegative_end: usize,
	elements: Vec<Option<Binomial>>,
	/// `positive_support(nonnegative_end)` cached per slot, parallel to `elements`, so the support
	/// tree can be queried and updated without recomputing a binomial's support on every lookup.
	positive_supports: Vec<Option<BitSet>>,
	tree: SupportTree,
	live_count: usize,
}

impl BinomialSet {
	pub fn new(n: usize, nonnegative_end: usize) -> Self {
		Self {
			nonnegative_end,
			elements: Vec::new(),
			positive_supports: Vec::new(),
			tree: SupportTree::new(n),
			live_count: 0,
		}
	}

	/// Appends `g`, returning its stable id (§4.5 `push`).
	pub fn push(&mut self, g: Binomial) -> usize {
		let id = self.elements.len();
		let support = g.positive_support(self.nonnegative_end);
		self.tree.add(&support, id);
		self.elements.push(Some(g));
		self.positive_supports.push(Some(support));
		self.live_count += 1;
		id
	}

	/// Tombstones the element at `id`; a no-op if it was already deleted (§4.5 `delete_at`).
	pub fn delete_at(&mut self, id: usize) {
		if let Some(support) = self.positive_supports[id].take() {
			self.tree.remove(&support, id);
			self.elements[id] = None;
			self.live_count -= 1;
		}
	}

	/// Overwrites the live element at `id` with `g`, keeping the same id (§4.9 inter-reduction
	/// "replace"): updates the support tree instead of re-registering pairs, since this is a
	/// strict shrink of an existing element, not a new one. Panics if `id` is not currently live —
	/// callers only replace an element they just looked up.
	pub fn replace_at(&mut self, id: usize, g: Binomial) {
		let old_support = self.positive_supports[id].take().expect("id must be live to be replaced");
		self.tree.remove(&old_support, id);
		let new_support = g.positive_support(self.nonnegative_end);
		self.tree.add(&new_support, id);
		self.elements[id] = Some(g);
		self.positive_supports[id] = Some(new_support);
	}

	pub fn get(&self, id: usize) -> Option<&Binomial> {
		self.elements[id].as_ref()
	}

	pub fn positive_support(&self, id: usize) -> Option<&BitSet> {
		self.positive_supports[id].as_ref()
	}

	/// Number of live (non-tombstoned) elements.
	pub fn len(&self) -> usize {
		self.live_count
	}

	pub fn is_empty(&self) -> bool {
		self.live_count == 0
	}

	/// The exclusive upper bound on ids ever issued; an id in `0..capacity()` may or may not still
	/// be live.
	pub fn capacity(&self) -> usize {
		self.elements.len()
	}

	/// All live ids, in insertion order.
	pub fn live_ids(&self) -> impl Iterator<Item = usize> + '_ {
		(0..self.elements.len()).filter(|&id| self.elements[id].is_some())
	}

	/// Every live id whose cached positive support is a subset of `query` (§4.4 query, exposed for
	/// callers that want every candidate rather than the first accepted one).
	pub fn candidates(&self, query: &BitSet) -> Vec<usize> {
		self.tree.enumerate_reducers(query)
	}

	/// The first live id whose positive support is a subset of `query` and for which `accept`
	/// returns true — `accept` is where the caller's actual divisibility test lives (§4.7).
	pub fn find_with(&self, query: &BitSet, accept: impl FnMut(usize) -> bool) -> Option<usize> {
		self.tree.find_reducer(query, accept)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn push_then_get_round_trips() {
		let mut set = BinomialSet::new(3, 3);
		let id = set.push(Binomial::plain(vec![1, -1, 0], vec![1]));
		assert_eq!(set.get(id).unwrap().element(), &[1, -1, 0]);
		assert_eq!(set.len(), 1);
	}

	#[test]
	fn delete_at_tombstones_without_shifting_other_ids() {
		let mut set = BinomialSet::new(3, 3);
		let a = set.push(Binomial::plain(vec![1, 0, 0], vec![1]));
		let b = set.push(Binomial::plain(vec![0, 1, 0], vec![1]));
		set.delete_at(a);
		assert!(set.get(a).is_none());
		assert_eq!(set.get(b).unwrap().element(), &[0, 1, 0]);
		assert_eq!(set.len(), 1);
		assert_eq!(set.capacity(), 2);
	}

	#[test]
	fn deleted_ids_are_not_returned_as_candidates() {
		let mut set = BinomialSet::new(3, 3);
		let a = set.push(Binomial::plain(vec![1, 0, 0], vec![1]));
		set.delete_at(a);
		let query = BitSet::with_indices(3, [0, 1, 2]);
		assert!(set.candidates(&query).is_empty());
	}

	#[test]
	fn live_ids_skips_tombstones() {
		let mut set = BinomialSet::new(2, 2);
		let a = set.push(Binomial::plain(vec![1, 0], vec![1]));
		let b = set.push(Binomial::plain(vec![0, 1], vec![1]));
		set.delete_at(a);
		assert_eq!(set.live_ids().collect::<Vec<_>>(), vec![b]);
	}
}
