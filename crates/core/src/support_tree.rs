//! A trie over positive-support bit-vectors (§4.4): locates stored index sets that are subsets of
//! a query set in time proportional to the size of the supports actually stored, not the number of
//! variables `n` — the search structure behind [`crate::binomial_set::BinomialSet`]'s reducer
//! lookup.

use std::collections::BTreeMap;

use ipgb_utils::BitSet;

#[derive(Debug, Default)]
struct Node {
	/// Children keyed by the next variable present in some stored support below this node, in
	/// strictly increasing order (§4.4 "edges labeled by variable indices in strictly increasing
	/// order"). A variable with no stored support passing through it never gets a node at all —
	/// unlike a dense binary trie, descent only ever touches positions where some stored support
	/// is actually positive.
	children: BTreeMap<usize, Box<Node>>,
	/// Ids whose support path terminates exactly at this node.
	here: Vec<usize>,
}

/// A trie keyed by positive-support bit-vectors over `0..n` (§4.4): supports the subset query
/// "does any stored support lie entirely within this query support", which is exactly the
/// divisibility precondition the completion loop's reducer search needs.
#[derive(Debug)]
pub struct SupportTree {
	n: usize,
	root: Node,
}

impl SupportTree {
	pub fn new(n: usize) -> Self {
		Self { n, root: Node::default() }
	}

	/// Inserts `id` under `support` (§4.4 `add`): walks one child per set bit of `support`, in
	/// increasing order, creating any missing node along the way.
	pub fn add(&mut self, support: &BitSet, id: usize) {
		debug_assert_eq!(support.capacity(), self.n);
		let mut node = &mut self.root;
		for i in support.iter() {
			node = node.children.entry(i).or_insert_with(|| Box::new(Node::default()));
		}
		node.here.push(id);
	}

	/// Removes `id` from under `support` (§4.4 `remove`); a no-op if it was not stored there —
	/// callers are expected to pass the same support they added it with.
	pub fn remove(&mut self, support: &BitSet, id: usize) {
		debug_assert_eq!(support.capacity(), self.n);
		let mut node = &mut self.root;
		for i in support.iter() {
			let Some(child) = node.children.get_mut(&i) else { return };
			node = child;
		}
		node.here.retain(|&stored| stored != id);
	}

	/// Every stored id whose support is a subset of `query` (§4.4 `enumerate_reducers`).
	pub fn enumerate_reducers(&self, query: &BitSet) -> Vec<usize> {
		debug_assert_eq!(query.capacity(), self.n);
		let mut out = Vec::new();
		Self::collect(&self.root, query, &mut out);
		out
	}

	/// The first stored id whose support is a subset of `query` and for which `accept` returns
	/// true (§4.4 `find_reducer`): short-circuits instead of materializing every candidate, since
	/// most callers only need one valid reducer.
	pub fn find_reducer(&self, query: &BitSet, mut accept: impl FnMut(usize) -> bool) -> Option<usize> {
		debug_assert_eq!(query.capacity(), self.n);
		Self::search(&self.root, query, &mut accept)
	}

	/// Every id stored at `node` is a reducer (its support is a prefix of the path taken to reach
	/// `node`, which only ever follows bits `query` has). Descending into a child keyed `i` is only
	/// valid when `query` also has `i` set — anything else would make that stored support *not* a
	/// subset of `query`.
	fn collect(node: &Node, query: &BitSet, out: &mut Vec<usize>) {
		out.extend_from_slice(&node.here);
		for (&i, child) in &node.children {
			if query.get(i) {
				Self::collect(child, query, out);
			}
		}
	}

	fn search(node: &Node, query: &BitSet, accept: &mut impl FnMut(usize) -> bool) -> Option<usize> {
		if let Some(found) = node.here.iter().copied().find(|&id| accept(id)) {
			return Some(found);
		}
		for (&i, child) in &node.children {
			if query.get(i) {
				if let Some(found) = Self::search(child, query, accept) {
					return Some(found);
				}
			}
		}
		None
	}
}
