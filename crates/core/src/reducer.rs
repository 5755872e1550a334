//! Divisibility testing and reduction against a [`crate::binomial_set::BinomialSet`] (§4.7).
//!
//! `g` is a valid reducer of `f` exactly when `g`'s positive support (restricted to the
//! non-negative variables) is contained in `f`'s, `g`'s positive entries are each no larger than
//! `f`'s matching entry, and — for the bounded variables only, where an explicit upper bound makes
//! the *negative* direction meaningful too — `g`'s negative entries are each no smaller in
//! magnitude than `f`'s. The graded variant additionally requires the two binomials' cached
//! degrees to match componentwise before any of the above is checked, since a degree mismatch
//! means the reduction would leave the graded ideal (§9).

use ipgb_math::{Binomial, BinomialLike};
use ipgb_utils::Result;

use crate::binomial_set::BinomialSet;

/// Whether `g` divides `f` under the bounded/non-negative divisibility test (§4.7 `divides`).
pub fn divides(g: &Binomial, f: &Binomial, nonnegative_end: usize, bounded_end: usize) -> bool {
	if let (Some(dg), Some(df)) = (g.degree(), f.degree()) {
		if dg != df {
			return false;
		}
	}

	let g_elem = g.element();
	let f_elem = f.element();
	for i in 0..nonnegative_end {
		if g_elem[i] > 0 && (f_elem[i] < g_elem[i]) {
			return false;
		}
	}
	for i in 0..bounded_end {
		if g_elem[i] < 0 && (f_elem[i] > g_elem[i]) {
			return false;
		}
	}
	true
}

/// The largest `t >= 1` such that subtracting `t * g` from `f` keeps every non-negative
/// coordinate of `f` non-negative and every bounded coordinate within bounds — i.e. the
/// multiplicity of a single reduction step (§4.7 `reduction_factor`). Callers must have already
/// established `divides(g, f, ..)`, which guarantees this is at least 1.
pub fn reduction_factor(g: &Binomial, f: &Binomial, nonnegative_end: usize, bounded_end: usize) -> i64 {
	let g_elem = g.element();
	let f_elem = f.element();
	let mut factor = i64::MAX;
	for i in 0..nonnegative_end {
		if g_elem[i] > 0 {
			factor = factor.min(f_elem[i] / g_elem[i]);
		}
	}
	for i in 0..bounded_end {
		if g_elem[i] < 0 {
			factor = factor.min(f_elem[i] / g_elem[i]);
		}
	}
	factor.max(1)
}

/// One reduction step: finds a live reducer of `f` in `set` and subtracts the largest valid
/// multiple of it, in place. Returns the id of the reducer used, or `None` if `f` is already
/// fully reduced against `set` (§4.7 `reduce_step`).
pub fn reduce_step(
	f: &mut Binomial,
	set: &BinomialSet,
	nonnegative_end: usize,
	bounded_end: usize,
	graded: bool,
	exclude: Option<usize>,
) -> Result<Option<usize>> {
	let query = f.positive_support(nonnegative_end);
	let Some(reducer_id) = set.find_with(&query, |id| {
		if Some(id) == exclude {
			return false;
		}
		let g = set.get(id).expect("support tree only stores live ids");
		!(graded && g.degree().is_none()) && divides(g, f, nonnegative_end, bounded_end)
	}) else {
		return Ok(None);
	};
	let g = set.get(reducer_id).expect("reducer_id was just confirmed live");
	let factor = reduction_factor(g, f, nonnegative_end, bounded_end);
	f.reduce_by(g, factor)?;
	Ok(Some(reducer_id))
}

/// Reduces `f` fully against `set`, applying [`reduce_step`] until no reducer applies or `f`
/// becomes zero (§4.7 `reduce_full`). Returns the ids of every reducer used, in application
/// order — the completion loop consults this to decide whether the candidate was genuinely new
/// information or a redundant S-binomial.
pub fn reduce_full(
	f: &mut Binomial,
	set: &BinomialSet,
	nonnegative_end: usize,
	bounded_end: usize,
	graded: bool,
	exclude: Option<usize>,
) -> Result<Vec<usize>> {
	let mut used = Vec::new();
	while !f.is_zero() {
		match reduce_step(f, set, nonnegative_end, bounded_end, graded, exclude)? {
			Some(id) => used.push(id),
			None => break,
		}
	}
	Ok(used)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn divides_requires_subset_support_and_smaller_magnitude() {
		let g = Binomial::plain(vec![1, -1, 0], vec![1]);
		let f_ok = Binomial::plain(vec![3, -2, 1], vec![1]);
		let f_bad = Binomial::plain(vec![0, -2, 1], vec![1]); // g's positive entry 0 not <= f's 0.
		assert!(divides(&g, &f_ok, 3, 3));
		assert!(!divides(&g, &f_bad, 3, 3));
	}

	#[test]
	fn graded_mismatch_blocks_divisibility_even_if_supports_align() {
		let g = Binomial::graded(vec![1, -1], vec![1], vec![5]);
		let f = Binomial::graded(vec![3, -2], vec![1], vec![9]);
		assert!(!divides(&g, &f, 2, 2));
	}

	#[test]
	fn reduction_factor_is_the_minimum_ratio_over_the_positive_support() {
		let g = Binomial::plain(vec![1, -1, 0], vec![1]);
		let f = Binomial::plain(vec![5, -2, 9], vec![1]);
		assert_eq!(reduction_factor(&g, &f, 3, 3), 2);
	}

	#[test]
	fn reduce_full_drives_a_reducible_binomial_to_zero() {
		let mut set = BinomialSet::new(3, 3);
		set.push(Binomial::plain(vec![1, -1, 0], vec![1]));
		let mut f = Binomial::plain(vec![2, -2, 0], vec![2]);
		let used = reduce_full(&mut f, &set, 3, 3, false, None).unwrap();
		assert!(f.is_zero());
		assert_eq!(used.len(), 1);
	}

	#[test]
	fn reduce_full_is_a_no_op_when_nothing_divides() {
		let set = BinomialSet::new(3, 3);
		let mut f = Binomial::plain(vec![2, -2, 0], vec![2]);
		let used = reduce_full(&mut f, &set, 3, 3, false, None).unwrap();
		assert!(used.is_empty());
		assert_eq!(f.element(), &[2, -2, 0]);
	}
}
