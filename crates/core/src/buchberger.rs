//! The completion loop (§4.9): turns a seed generating set of the lattice into a Gröbner basis
//! (a "test set") under a [`MonomialOrder`], via repeated S-binomial construction, truncation,
//! reduction, and (periodically) inter-reduction.

use ipgb_hal::LPOracle;
use ipgb_math::{Binomial, BinomialLike, MonomialOrder};
use ipgb_utils::{bail, Error, Result};
use tracing::{debug, warn};

use crate::binomial_set::BinomialSet;
use crate::config::{AutoReducePolicy, Config};
use crate::pair_queue::PairQueue;
use crate::reducer::{divides, reduce_full};
use crate::truncator::Truncator;

/// Drives [`BinomialSet`]/[`PairQueue`]/[`Truncator`] to completion under a [`MonomialOrder`]
/// (§4.9).
pub struct Buchberger<'a, L: LPOracle> {
	set: BinomialSet,
	queue: PairQueue,
	order: MonomialOrder,
	config: Config,
	nonnegative_end: usize,
	bounded_end: usize,
	graded: bool,
	truncator: Truncator<'a, L>,
	zero_reductions: u64,
	iterations: u64,
	iterations_since_reduce: u32,
	elements_since_reduce: u32,
	basis_size_at_last_reduce: usize,
}

impl<'a, L: LPOracle> Buchberger<'a, L> {
	/// Builds a completion run from `seeds` (a generating set of the lattice — typically
	/// `eᵢ − slacks − r` per lifted variable, or the output of
	/// [`crate::project_and_lift::project_and_lift`]); each seed is oriented under `order` and
	/// passed through `truncator` before being admitted (§4.9 "Initialization").
	pub fn new(
		seeds: Vec<Binomial>,
		order: MonomialOrder,
		config: Config,
		nonnegative_end: usize,
		bounded_end: usize,
		truncator: Truncator<'a, L>,
	) -> Result<Self> {
		let graded = seeds.iter().any(|g| g.degree().is_some());
		let mut this = Self {
			set: BinomialSet::new(order.n_vars(), nonnegative_end),
			queue: PairQueue::new(config.pair_strategy),
			order,
			config,
			nonnegative_end,
			bounded_end,
			graded,
			truncator,
			zero_reductions: 0,
			iterations: 0,
			iterations_since_reduce: 0,
			elements_since_reduce: 0,
			basis_size_at_last_reduce: 0,
		};
		for mut seed in seeds {
			this.orient(&mut seed)?;
			if this.truncator.keep(&seed)? && !seed.is_zero() {
				this.admit(seed);
			}
		}
		Ok(this)
	}

	/// Orients `g` under this run's order in place (§4.9: every admitted element is kept in
	/// canonical, order-positive form).
	fn orient(&self, g: &mut Binomial) -> Result<()> {
		if self.order.is_inverted(g.element()) {
			g.opposite();
		}
		Ok(())
	}

	/// Pushes `g` into the basis and registers its S-pairs against every existing live element
	/// (§4.9 step 8 / "notify the queue").
	fn admit(&mut self, g: Binomial) -> usize {
		let existing: Vec<usize> = self.set.live_ids().collect();
		let priority_of = |other: usize| -> i64 {
			let h = self.set.get(other).expect("live id");
			h.cost().saturating_add(g.cost())
		};
		let with_priority: Vec<(usize, i64)> = existing.iter().map(|&id| (id, priority_of(id))).collect();
		let id = self.set.push(g);
		self.queue.on_grow(id, with_priority);
		self.elements_since_reduce += 1;
		id
	}

	/// Runs the completion loop to termination (§4.9 main loop). Finite by Dickson's lemma: the
	/// leading-term ideal of a growing basis stabilizes after finitely many additions.
	pub fn complete(&mut self) -> Result<()> {
		let span = tracing::info_span!("buchberger::complete");
		let _enter = span.enter();
		loop {
			let Some(pair) = self.queue.pop() else { break };
			self.iterations += 1;
			self.iterations_since_reduce += 1;
			if let Some(limit) = self.config.max_iterations {
				if self.iterations > limit {
					bail!(Error::IterationLimitExceeded);
				}
			}

			let Some(support_i) = self.set.positive_support(pair.i) else { continue };
			let Some(support_j) = self.set.positive_support(pair.j) else { continue };
			// GCD criterion (§4.9 step 3): disjoint positive supports can never cancel, so their
			// S-binomial reduces to zero trivially and need not be constructed at all.
			if support_i.disjoint(support_j) {
				continue;
			}

			let Some(mut s) = self.build_s_binomial(pair.i, pair.j)? else { continue };
			if !self.truncator.keep(&s)? {
				continue;
			}

			let used = reduce_full(&mut s, &self.set, self.nonnegative_end, self.bounded_end, self.graded, None)?;
			let _ = used;
			if s.is_zero() {
				self.zero_reductions += 1;
				if self.zero_reductions > 10 * (self.set.len() as u64).max(1) {
					warn!(
						zero_reductions = self.zero_reductions,
						basis_size = self.set.len(),
						"zero-reduction count far exceeds basis size; the order may be degenerate"
					);
				}
				continue;
			}

			let id = self.admit(s);
			debug!(id, basis_size = self.set.len(), "pushed new basis element");

			if self.should_auto_reduce() {
				self.auto_reduce()?;
			}
		}
		Ok(())
	}

	fn should_auto_reduce(&self) -> bool {
		match self.config.auto_reduce {
			AutoReducePolicy::Never => false,
			AutoReducePolicy::EveryIterations(n) => n > 0 && self.iterations_since_reduce >= n,
			AutoReducePolicy::EveryElementsAdded(n) => n > 0 && self.elements_since_reduce >= n,
			AutoReducePolicy::FractionOfGrowth(f) => {
				let baseline = self.basis_size_at_last_reduce.max(1);
				(self.set.len() as f64) >= (baseline as f64) * (1.0 + f)
			}
		}
	}

	/// Inter-reduction (§4.9 step 9): for each element in reverse insertion order, attempts to
	/// reduce it against the rest of the basis; a strictly smaller result replaces it in place,
	/// and a zero result removes it entirely as redundant.
	fn auto_reduce(&mut self) -> Result<()> {
		let ids: Vec<usize> = self.set.live_ids().collect();
		for &id in ids.iter().rev() {
			let Some(g) = self.set.get(id) else { continue };
			let mut candidate = g.clone();
			let used = reduce_full(
				&mut candidate,
				&self.set,
				self.nonnegative_end,
				self.bounded_end,
				self.graded,
				Some(id),
			)?;
			if candidate.is_zero() {
				self.set.delete_at(id);
				self.queue.on_shrink(id);
			} else if !used.is_empty() {
				self.set.replace_at(id, candidate);
			}
		}
		debug!(basis_size = self.set.len(), "completed auto-reduction pass");
		self.iterations_since_reduce = 0;
		self.elements_since_reduce = 0;
		self.basis_size_at_last_reduce = self.set.len();
		Ok(())
	}

	/// `s = u − v` where `u`, `v` are `self.set`'s elements at `pair.i`/`pair.j`, oriented so that
	/// `order.cmp(u, v)` is not `Less` (§4.9 step 4). Returns `None` if either id was tombstoned
	/// since the pair was queued.
	fn build_s_binomial(&self, i: usize, j: usize) -> Result<Option<Binomial>> {
		let (Some(g), Some(h)) = (self.set.get(i), self.set.get(j)) else { return Ok(None) };
		let (u, v) = if self.order.cmp(g.element(), h.element()) == std::cmp::Ordering::Less {
			(h, g)
		} else {
			(g, h)
		};
		let mut s = u.clone();
		Binomial::minus_into(&mut s, u, v)?;
		Ok(Some(s))
	}

	/// Removes every element whose positive part is a (strict-or-equal) multiple of another's
	/// leading term, i.e. a minimal generating set of the leading-term ideal (§4.9 "minimal
	/// basis"). Consumes `self`'s completed basis and returns the surviving elements.
	pub fn into_minimal_basis(mut self) -> Vec<Binomial> {
		let ids: Vec<usize> = self.set.live_ids().collect();
		for &id in &ids {
			let Some(g) = self.set.get(id) else { continue };
			let query = g.positive_support(self.nonnegative_end);
			let g_clone = g.clone();
			let redundant = self.set.find_with(&query, |other| {
				other != id && self.set.get(other).is_some_and(|h| divides(h, &g_clone, self.nonnegative_end, self.bounded_end))
			});
			if redundant.is_some() {
				self.set.delete_at(id);
			}
		}

		if self.config.reduced_basis {
			self.reduce_trailing_terms();
		}

		self.set.live_ids().map(|id| self.set.get(id).unwrap().clone()).collect()
	}

	/// The reduced-basis post-pass (§4.9): iteratively reduces each element's trailing
	/// (negative-part) term using every other element, so that no element's negative support is
	/// touched by another's positive support either.
	fn reduce_trailing_terms(&mut self) {
		let ids: Vec<usize> = self.set.live_ids().collect();
		for &id in &ids {
			let Some(g) = self.set.get(id) else { continue };
			let mut negated = g.clone();
			negated.opposite();
			let used = reduce_full(
				&mut negated,
				&self.set,
				self.nonnegative_end,
				self.bounded_end,
				self.graded,
				Some(id),
			)
			.unwrap_or_default();
			if !used.is_empty() && !negated.is_zero() {
				negated.opposite();
				self.set.replace_at(id, negated);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ipgb_hal::ReferenceLpOracle;

	fn order() -> MonomialOrder {
		MonomialOrder::from_rows(vec![vec![5.0, 4.0, 3.0]], 3).unwrap()
	}

	fn truncator(a: &[Vec<i64>], b: &[i64], u: &[Option<i64>], nonneg: &[bool], lp: &ReferenceLpOracle) -> Truncator<'_, ReferenceLpOracle> {
		Truncator::new(crate::config::TruncationMode::None, a, b, u, nonneg, lp).unwrap()
	}

	#[test]
	fn completion_of_a_single_relation_is_a_fixed_point() {
		let a: Vec<Vec<i64>> = vec![];
		let b: Vec<i64> = vec![];
		let u = vec![None, None, None];
		let nonneg = vec![true, true, true];
		let lp = ReferenceLpOracle;
		let t = truncator(&a, &b, &u, &nonneg, &lp);

		let seeds = vec![Binomial::plain(vec![1, -1, 0], vec![1])];
		let mut bb = Buchberger::new(seeds, order(), Config::default(), 3, 3, t).unwrap();
		bb.complete().unwrap();
		let basis = bb.into_minimal_basis();
		assert_eq!(basis.len(), 1);
	}

	#[test]
	fn gcd_criterion_skips_disjoint_support_pairs() {
		let a: Vec<Vec<i64>> = vec![];
		let b: Vec<i64> = vec![];
		let u = vec![None, None, None, None];
		let nonneg = vec![true, true, true, true];
		let lp = ReferenceLpOracle;
		let t = truncator(&a, &b, &u, &nonneg, &lp);

		// Disjoint positive supports: {0} and {2}. Their S-binomial is just their sum's
		// support split apart, which the GCD criterion skips before ever constructing it.
		let seeds = vec![
			Binomial::plain(vec![1, -1, 0, 0], vec![1]),
			Binomial::plain(vec![0, 0, 1, -1], vec![1]),
		];
		let order = MonomialOrder::from_rows(vec![vec![4.0, 3.0, 2.0, 1.0]], 4).unwrap();
		let mut bb = Buchberger::new(seeds, order, Config::default(), 4, 4, t).unwrap();
		bb.complete().unwrap();
		let basis = bb.into_minimal_basis();
		assert_eq!(basis.len(), 2);
	}

	#[test]
	fn iteration_limit_is_enforced() {
		let a: Vec<Vec<i64>> = vec![];
		let b: Vec<i64> = vec![];
		let u = vec![None, None, None];
		let nonneg = vec![true, true, true];
		let lp = ReferenceLpOracle;
		let t = truncator(&a, &b, &u, &nonneg, &lp);
		let seeds = vec![
			Binomial::plain(vec![1, -1, 0], vec![1]),
			Binomial::plain(vec![0, 1, -1], vec![1]),
		];
		let mut config = Config::default();
		config.max_iterations = Some(0);
		let mut bb = Buchberger::new(seeds, order(), config, 3, 3, t).unwrap();
		let err = bb.complete().unwrap_err();
		assert!(matches!(err, Error::IterationLimitExceeded));
	}
}
