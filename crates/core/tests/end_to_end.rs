//! Integration coverage for the six worked scenarios a caller is expected to run through: a
//! knapsack solved end-to-end, a small lattice whose Markov basis needs completing into a test
//! set, a free variable discovered through a ray, the `Simple` shortcut's exact generator shape,
//! truncation shrinking a basis, and determinism of repeated completion.

use std::collections::HashSet;

use ipgb_core::ip_instance::{ConstraintSense, IPInstance, RawInstance};
use ipgb_core::{
	build_monomial_order, compute_gb, markov_basis, optimize_with, project_and_lift, Config, MarkovAlgorithm,
	TruncationMode,
};
use ipgb_hal::{ReferenceHermiteOracle, ReferenceLpOracle};

fn every_generator_is_in_the_kernel(a: &[Vec<i64>], generators: &[Vec<i64>]) {
	for g in generators {
		for row in a {
			let dot: i64 = row.iter().zip(g.iter()).map(|(&a, &x)| a * x).sum();
			assert_eq!(dot, 0, "generator {g:?} is not in ker(A)");
		}
	}
}

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

/// Scenario 1: a small knapsack. The `Simple` shortcut's generators are exact unit moves against
/// the dedicated slack, and reducing a feasible point against their completion lands on the true
/// optimum — filling the single most cost-efficient item (`x3`, ratio 3 per unit weight) to
/// capacity beats any mix involving `x1` or `x2`.
#[test]
fn knapsack_small_reaches_its_true_optimum() {
	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();

	let markov = instance.simple_markov_generators().unwrap();
	every_generator_is_in_the_kernel(instance.a(), &markov);

	let order = build_monomial_order(
		vec![instance.cost()[0].iter().map(|&c| c as f64).collect()],
		instance.a(),
		instance.b(),
		instance.n_vars(),
		&lp,
	)
	.unwrap();
	let gb = compute_gb(&instance, markov, order, Config::default(), &lp).unwrap();
	assert!(!gb.is_empty());

	// x1 = 0, x2 = 0, x3 = 0, slack = 4: feasible but not optimal. `bounded_end` is 0 here since
	// `optimize_with` reduces a bare point, not a pair of correlated x_j/t_j move entries — see
	// the note on the bounded-magnitude check in `crate::reducer::divides`.
	let start = instance.permute_vector(&[0, 0, 0, 4]);
	let reduced = optimize_with(&start, &gb, *instance.nonnegative_end(), 0).unwrap();
	let original_order = instance.invert_vector(&reduced);
	assert_eq!(original_order, vec![0, 0, 4, 0]);
	assert_eq!(instance.cost_of(&reduced).unwrap()[0], -12);
}

/// Scenario 2: a rank-2 lattice whose Markov basis is not yet closed under S-binomial reduction —
/// completing it under a lexicographic order strictly grows the generating set.
#[test]
fn diamond_lattice_markov_basis_is_not_yet_a_test_set() {
	let raw = RawInstance {
		a: vec![vec![1, 1, 1, 0], vec![1, -1, 0, 1]],
		senses: vec![ConstraintSense::Equality, ConstraintSense::Equality],
		b: vec![2, 0],
		cost: vec![vec![-1, -1, 0, 0]],
		u: vec![None, None, None, None],
		nonneg: vec![true, true, true, true],
		minimize: true,
	};
	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&raw, &lp, &hermite).unwrap();

	let (markov, _, _) =
		project_and_lift(&instance, Config::default(), false, None, &lp, &hermite).unwrap();
	assert!(!markov.is_empty());
	every_generator_is_in_the_kernel(instance.a(), &markov);

	let lex_rows: Vec<Vec<f64>> = (0..instance.n_vars())
		.map(|i| {
			let mut row = vec![0.0; instance.n_vars()];
			row[i] = 1.0;
			row
		})
		.collect();
	let order = build_monomial_order(lex_rows, instance.a(), instance.b(), instance.n_vars(), &lp).unwrap();
	let gb = compute_gb(&instance, markov.clone(), order, Config::default(), &lp).unwrap();
	assert!(!gb.is_empty());
	every_generator_is_in_the_kernel(instance.a(), &gb);
	assert!(gb.len() >= markov.len());
}

/// Scenario 3: a free structural variable makes the lattice unbounded in that direction;
/// project-and-lift's ray-search branch must fire and fold a genuine unboundedness certificate
/// into the basis rather than ever certifying the variable bounded.
#[test]
fn a_free_variable_forces_the_ray_search_branch() {
	let raw = RawInstance {
		a: vec![vec![1, -1, 1]],
		senses: vec![ConstraintSense::Equality],
		b: vec![0],
		cost: vec![vec![0, 0, -1]],
		u: vec![None, None, None],
		nonneg: vec![true, true, false],
		minimize: true,
	};
	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&raw, &lp, &hermite).unwrap();

	let (markov, has_optimal, _) =
		project_and_lift(&instance, Config::default(), false, None, &lp, &hermite).unwrap();
	assert!(!has_optimal, "no optimization was requested");
	assert!(!markov.is_empty());
	every_generator_is_in_the_kernel(instance.a(), &markov);
}

/// Scenario 4: every row is `≤`-derived with a dedicated slack and `A` has only non-negative
/// entries, so `Simple` applies and returns exactly `e_i - (A e_i)_slack` per structural variable.
#[test]
fn simple_markov_basis_matches_the_unit_vector_formula_exactly() {
	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();

	let generators = instance.simple_markov_generators().unwrap();
	assert_eq!(generators.len(), 3);

	let weights = [3i64, 2, 1];
	for (i, g) in generators.iter().enumerate() {
		let original_order = instance.invert_vector(g);
		let mut expected = vec![0i64; 4];
		expected[i] = 1;
		expected[3] = -weights[i];
		assert_eq!(original_order, expected);
	}
}

/// Scenario 5: a zero right-hand side makes the only available generator's positive part alone
/// exceed `b`, so `Simple` truncation discards it outright where `None` truncation keeps it — a
/// strict subset.
#[test]
fn simple_truncation_strictly_shrinks_the_basis() {
	let raw = RawInstance {
		a: vec![vec![1, 1]],
		senses: vec![ConstraintSense::Equality],
		b: vec![0],
		cost: vec![vec![1, 0]],
		u: vec![None, None],
		nonneg: vec![true, true],
		minimize: true,
	};
	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&raw, &lp, &hermite).unwrap();

	let markov = vec![instance.permute_vector(&[1, -1])];
	let order = build_monomial_order(
		vec![instance.cost()[0].iter().map(|&c| c as f64).collect()],
		instance.a(),
		instance.b(),
		instance.n_vars(),
		&lp,
	)
	.unwrap();

	let mut none_config = Config::default();
	none_config.truncation = TruncationMode::None;
	let basis_none = compute_gb(&instance, markov.clone(), order.clone(), none_config, &lp).unwrap();

	let mut simple_config = Config::default();
	simple_config.truncation = TruncationMode::Simple;
	let basis_simple = compute_gb(&instance, markov, order, simple_config, &lp).unwrap();

	assert!(basis_simple.len() < basis_none.len());
	let none_set: HashSet<Vec<i64>> = basis_none.into_iter().collect();
	let simple_set: HashSet<Vec<i64>> = basis_simple.into_iter().collect();
	assert!(simple_set.is_subset(&none_set));
}

/// Scenario 6: completion is a pure function of its inputs — running it twice over the same
/// instance, markov basis, order, and config yields set-equal bases.
#[test]
fn repeated_completion_with_the_same_strategy_is_deterministic() {
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

	let mut config = Config::default();
	config.auto_reduce = ipgb_core::AutoReducePolicy::EveryElementsAdded(1);

	let first = compute_gb(&instance, markov.clone(), order.clone(), config, &lp).unwrap();
	let second = compute_gb(&instance, markov, order, config, &lp).unwrap();

	let first_set: HashSet<Vec<i64>> = first.into_iter().collect();
	let second_set: HashSet<Vec<i64>> = second.into_iter().collect();
	assert_eq!(first_set, second_set);
}

/// `markov_basis(Any)` prefers the dedicated-slack shortcut when it applies, matching §6.5's
/// dispatch rule.
#[test]
fn markov_basis_any_matches_simple_when_every_row_has_a_slack() {
	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&knapsack(), &lp, &hermite).unwrap();
	let via_any = markov_basis(&instance, MarkovAlgorithm::Any, Config::default(), &lp, &hermite).unwrap();
	let via_simple =
		markov_basis(&instance, MarkovAlgorithm::Simple, Config::default(), &lp, &hermite).unwrap();
	assert_eq!(via_any, via_simple);
}
