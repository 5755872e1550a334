//! S-binomial candidate scheduling (§4.6): a pair queue owns no binomial data itself — the caller
//! (the completion loop in [`crate::buchberger`]) supplies a priority for each candidate pair, and
//! the queue only decides *order*.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use crate::config::PairStrategyKind;

/// An unordered candidate pair of element ids (`i != j`, `i` is always the smaller of the two by
/// construction so `(a, b)` and `(b, a)` never both appear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
	pub i: usize,
	pub j: usize,
}

impl Pair {
	fn new(i: usize, j: usize) -> Self {
		if i < j {
			Self { i, j }
		} else {
			Self { i: j, j: i }
		}
	}
}

/// Scheduling policy for candidate S-binomial pairs (§4.6): decides which pair the completion
/// loop draws next, given that [`crate::binomial_set::BinomialSet`] can both grow (new element
/// pushed, pairing it with every existing live element) and shrink (an element tombstoned,
/// dropping every pair that referenced it).
#[derive(Debug)]
pub enum PairQueue {
	Fifo(VecDeque<Pair>),
	/// A global min-heap keyed by caller-supplied priority (lower drawn first); ties broken by
	/// insertion order for determinism. Newly pushed pairs compete immediately with whatever is
	/// already queued, so a low-priority pair discovered mid-run can jump ahead of older,
	/// higher-priority ones.
	PairPriority {
		heap: BinaryHeap<Reverse<(i64, u64, Pair)>>,
		next_seq: u64,
	},
	/// Pairs of equal priority are drawn as a single batch once that priority level is reached;
	/// unlike [`PairQueue::PairPriority`], a pair pushed at a priority level whose batch is
	/// already being drawn from queues for the *next* visit to that level rather than joining the
	/// in-progress batch (§4.6 "batch" semantics).
	BatchPriority {
		pending: BTreeMap<i64, VecDeque<Pair>>,
		current: Option<(i64, VecDeque<Pair>)>,
	},
}

impl PairQueue {
	pub fn new(kind: PairStrategyKind) -> Self {
		match kind {
			PairStrategyKind::Fifo => Self::Fifo(VecDeque::new()),
			PairStrategyKind::PairPriority => Self::PairPriority { heap: BinaryHeap::new(), next_seq: 0 },
			PairStrategyKind::BatchPriority => Self::BatchPriority { pending: BTreeMap::new(), current: None },
		}
	}

	/// Registers every pair `(new_id, existing_id)` formed by a freshly pushed element, each with
	/// a caller-supplied priority (ignored by [`PairQueue::Fifo`]) (§4.6 "grew").
	pub fn on_grow(&mut self, new_id: usize, existing_with_priority: impl IntoIterator<Item = (usize, i64)>) {
		match self {
			Self::Fifo(queue) => {
				for (existing, _priority) in existing_with_priority {
					queue.push_back(Pair::new(new_id, existing));
				}
			}
			Self::PairPriority { heap, next_seq } => {
				for (existing, priority) in existing_with_priority {
					heap.push(Reverse((priority, *next_seq, Pair::new(new_id, existing))));
					*next_seq += 1;
				}
			}
			Self::BatchPriority { pending, .. } => {
				for (existing, priority) in existing_with_priority {
					pending.entry(priority).or_default().push_back(Pair::new(new_id, existing));
				}
			}
		}
	}

	/// Drops every pair that references `removed_id` (§4.6 "shrunk"), since that element can no
	/// longer be combined with anything.
	pub fn on_shrink(&mut self, removed_id: usize) {
		let keep = |p: &Pair| p.i != removed_id && p.j != removed_id;
		match self {
			Self::Fifo(queue) => queue.retain(keep),
			Self::PairPriority { heap, .. } => {
				let retained: BinaryHeap<_> = heap.drain().filter(|Reverse((_, _, p))| keep(p)).collect();
				*heap = retained;
			}
			Self::BatchPriority { pending, current } => {
				for batch in pending.values_mut() {
					batch.retain(keep);
				}
				pending.retain(|_, batch| !batch.is_empty());
				if let Some((_, batch)) = current {
					batch.retain(keep);
				}
			}
		}
	}

	/// Draws the next pair to process, or `None` if the queue is exhausted (§4.6 "pop").
	pub fn pop(&mut self) -> Option<Pair> {
		match self {
			Self::Fifo(queue) => queue.pop_front(),
			Self::PairPriority { heap, .. } => heap.pop().map(|Reverse((_, _, p))| p),
			Self::BatchPriority { pending, current } => {
				loop {
					if let Some((_, batch)) = current {
						if let Some(p) = batch.pop_front() {
							return Some(p);
						}
					}
					let Some((&priority, _)) = pending.iter().next() else {
						*current = None;
						return None;
					};
					let batch = pending.remove(&priority).expect("key just observed present");
					*current = Some((priority, batch));
				}
			}
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn len(&self) -> usize {
		match self {
			Self::Fifo(queue) => queue.len(),
			Self::PairPriority { heap, .. } => heap.len(),
			Self::BatchPriority { pending, current } => {
				pending.values().map(VecDeque::len).sum::<usize>()
					+ current.as_ref().map_or(0, |(_, b)| b.len())
			}
		}
	}
}

/// Whether the pair `(g, h)` can possibly still produce a normal-form-reducible S-binomial given
/// a known lattice point `solution` (§4.6, §4.9): if `solution` already satisfies both `g` and
/// `h`'s defining equality in the same direction, their S-binomial reduces to zero against the
/// fiber itself and is not worth scheduling. Used by [`crate::project_and_lift`] to prune pairs
/// during the "solve while lift" variant (§4.10), where a target point is known up front.
pub fn is_productive_pair(g: &[i64], h: &[i64], solution: &[i64]) -> bool {
	let dot = |v: &[i64]| -> i64 { v.iter().zip(solution.iter()).map(|(&a, &b)| a * b).sum() };
	dot(g) != 0 || dot(h) != 0
}
