//! The public, algorithm-selecting entry points (§6.5): everything a caller needs to go from an
//! [`IPInstance`] to a test set or an optimal point without touching `Buchberger`,
//! `ProjectAndLift`, or the `BinomialSet`/`PairQueue` machinery directly.

use ipgb_hal::{HermiteOracle, LPOracle};
use ipgb_math::{Binomial, BinomialLike, MonomialOrder};
use ipgb_utils::{Error, Result};

use crate::binomial_set::BinomialSet;
use crate::buchberger::Buchberger;
use crate::config::Config;
use crate::ip_instance::IPInstance;
use crate::project_and_lift::ProjectAndLift;
use crate::reducer::reduce_full;
use crate::truncator::Truncator;

/// Which Markov-basis construction strategy [`markov_basis`] should use (§6.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkovAlgorithm {
	/// Try the `Simple` unit-vector shortcut first; fall back to project-and-lift if it doesn't
	/// apply to the given instance.
	Any,
	/// Require the `Simple` shortcut; fails if the instance doesn't have a dedicated slack per row.
	Simple,
	ProjectAndLift,
}

/// Builds a [`MonomialOrder`] from `rows` against the constraint matrix `(a, b)` it must be
/// well-founded over (§4.3 steps 1-2): row 1 is checked for a negative entry and, if found,
/// shifted by a scaled `LPOracle::positive_row_span` vector until it is strictly positive, before
/// the reverse-lex tiebreaker is appended. Every call site in this crate that orders on an
/// instance's own cost data (rather than a standalone literal order) goes through this function
/// rather than `MonomialOrder::from_rows` directly, so the well-foundedness the completion loop's
/// termination argument depends on (§4.7, §4.9) is never left to a call site to remember.
pub fn build_monomial_order(
	rows: Vec<Vec<f64>>,
	a: &[Vec<i64>],
	b: &[i64],
	n: usize,
	lp: &impl LPOracle,
) -> Result<MonomialOrder> {
	let mut order = MonomialOrder::from_rows(rows, n)?;
	if order.first_row().iter().any(|&c| c < 0.0) {
		let direction = lp.positive_row_span(a, b)?;
		let lambda = order
			.first_row()
			.iter()
			.zip(direction.iter())
			.map(|(&c, &d)| if c < 0.0 { -c / d } else { 0.0 })
			.fold(0.0_f64, f64::max)
			+ 1.0;
		order.shift_first_row(&direction, lambda);
	}
	Ok(order)
}

/// Computes a Gröbner basis (a test set) for `instance` under `order` starting from `markov`
/// (§6.5 `compute_gb`). Every `markov` generator must already lie in `ker(instance.a())`; the
/// caller is responsible for that (typically the output of [`project_and_lift`] or
/// [`simple_markov_basis`]).
pub fn compute_gb(
	instance: &IPInstance,
	markov: Vec<Vec<i64>>,
	order: MonomialOrder,
	config: Config,
	lp: &impl LPOracle,
) -> Result<Vec<Vec<i64>>> {
	let seeds: Result<Vec<Binomial>> = markov
		.into_iter()
		.map(|v| {
			let cost = instance.cost_of(&v)?;
			Ok(Binomial::plain(v, cost))
		})
		.collect();
	let truncator = Truncator::new(
		config.truncation,
		instance.a(),
		instance.b(),
		instance.u(),
		instance.nonneg(),
		lp,
	)?;
	let mut bb = Buchberger::new(
		seeds?,
		order,
		config,
		*instance.nonnegative_end(),
		*instance.bounded_end(),
		truncator,
	)?;
	bb.complete()?;
	Ok(bb.into_minimal_basis().into_iter().map(|g| g.element().to_vec()).collect())
}

/// Runs project-and-lift to build a Markov basis (and, optionally, solve the instance) of
/// `instance` (§6.5 `project_and_lift`).
pub fn project_and_lift(
	instance: &IPInstance,
	config: Config,
	optimize: bool,
	initial_solution: Option<Vec<i64>>,
	lp: &impl LPOracle,
	hermite: &impl HermiteOracle,
) -> Result<(Vec<Vec<i64>>, bool, Option<Vec<i64>>)> {
	let outcome =
		ProjectAndLift::new(instance.clone(), config, optimize, initial_solution, lp, hermite)?.run()?;
	if optimize && !outcome.has_optimal_solution {
		return Err(Error::Unbounded);
	}
	Ok((outcome.markov_basis, outcome.has_optimal_solution, outcome.optimal_solution))
}

/// The `Simple` shortcut (§1 scenario 4, §4.11 `simple_markov_generators`): applicable only when
/// every row of `instance` came from a `≤` constraint with its own dedicated slack.
pub fn simple_markov_basis(instance: &IPInstance) -> Option<Vec<Vec<i64>>> {
	instance.simple_markov_generators()
}

/// Dispatches to the requested Markov-basis algorithm (§6.5 `markov_basis`). `Any` prefers the
/// `Simple` shortcut and falls back to project-and-lift only if the instance doesn't qualify.
pub fn markov_basis(
	instance: &IPInstance,
	algorithm: MarkovAlgorithm,
	config: Config,
	lp: &impl LPOracle,
	hermite: &impl HermiteOracle,
) -> Result<Vec<Vec<i64>>> {
	match algorithm {
		MarkovAlgorithm::Simple => instance.simple_markov_generators().ok_or_else(|| Error::InputInvalid {
			reason: "instance does not have a dedicated slack per row; Simple does not apply".to_string(),
		}),
		MarkovAlgorithm::Any => {
			if let Some(generators) = instance.simple_markov_generators() {
				return Ok(generators);
			}
			let (markov, _, _) = project_and_lift(instance, config, false, None, lp, hermite)?;
			Ok(markov)
		}
		MarkovAlgorithm::ProjectAndLift => {
			let (markov, _, _) = project_and_lift(instance, config, false, None, lp, hermite)?;
			Ok(markov)
		}
	}
}

/// Reduces `solution` (read as a lattice point, not a binomial) against `basis` to a locally
/// optimal point under whatever order `basis` was completed with (§6.5 `optimize_with`): repeated
/// application of the standard monomial-division test, exactly as in
/// [`crate::reducer::reduce_full`], just applied to a bare point instead of a move's difference.
pub fn optimize_with(
	solution: &[i64],
	basis: &[Vec<i64>],
	nonnegative_end: usize,
	bounded_end: usize,
) -> Result<Vec<i64>> {
	let n = solution.len();
	let mut set = BinomialSet::new(n, nonnegative_end);
	for g in basis {
		set.push(Binomial::plain(g.clone(), vec![0]));
	}
	let mut candidate = Binomial::plain(solution.to_vec(), vec![0]);
	reduce_full(&mut candidate, &set, nonnegative_end, bounded_end, false, None)?;
	Ok(candidate.element().to_vec())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ip_instance::{ConstraintSense, RawInstance};
	use ipgb_hal::{ReferenceHermiteOracle, ReferenceLpOracle};

	fn knapsack() -> RawInstance {
		RawInstance {
			a: vec![vec![3, 2, 1]],
			senses: vec![ConstraintSense::LessOrEqual],
			b: vec![4],
			cost: vec![vec![-5, -4, -3]],
			u: vec![None, None, None],
			nonneg: vec![true, true, true],
			minimize: true,
		}
	}

	#[test]
	fn compute_gb_on_the_knapsack_contains_the_known_augmenting_move() {
		let lp = ReferenceLpOracle;
		let hermite = ReferenceHermiteOracle;
		let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();
		let markov = instance.simple_markov_generators().unwrap();
		let order = build_monomial_order(
			vec![instance.cost()[0].iter().map(|&c| c as f64).collect()],
			instance.a(),
			instance.b(),
			instance.n_vars(),
			&lp,
		)
		.unwrap();
		let basis = compute_gb(&instance, markov, order, Config::default(), &lp).unwrap();
		assert!(!basis.is_empty());
		for g in &basis {
			for row in instance.a() {
				let dot: i64 = row.iter().zip(g.iter()).map(|(&a, &x)| a * x).sum();
				assert_eq!(dot, 0);
			}
		}
	}

	#[test]
	fn build_monomial_order_shifts_a_negative_row_strictly_positive() {
		let lp = ReferenceLpOracle;
		let hermite = ReferenceHermiteOracle;
		let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();
		let raw_row: Vec<f64> = instance.cost()[0].iter().map(|&c| c as f64).collect();
		assert!(raw_row.iter().any(|&c| c < 0.0));

		let order = build_monomial_order(vec![raw_row], instance.a(), instance.b(), instance.n_vars(), &lp).unwrap();
		assert!(order.first_row().iter().all(|&c| c > 0.0));
	}

	#[test]
	fn simple_markov_basis_matches_generators_when_applicable() {
		let lp = ReferenceLpOracle;
		let hermite = ReferenceHermiteOracle;
		let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();
		assert_eq!(simple_markov_basis(&instance).unwrap().len(), 3);
	}

	#[test]
	fn markov_basis_any_prefers_simple_when_applicable() {
		let lp = ReferenceLpOracle;
		let hermite = ReferenceHermiteOracle;
		let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();
		let via_any = markov_basis(&instance, MarkovAlgorithm::Any, Config::default(), &lp, &hermite).unwrap();
		let via_simple = markov_basis(&instance, MarkovAlgorithm::Simple, Config::default(), &lp, &hermite).unwrap();
		assert_eq!(via_any, via_simple);
	}

	#[test]
	fn optimize_with_reduces_a_feasible_point_toward_zero_cost_moves() {
		let g = vec![vec![1, -1, 0]];
		let reduced = optimize_with(&[3, 0, 0], &g, 3, 0).unwrap();
		assert_eq!(reduced, vec![0, 3, 0]);
	}
}
