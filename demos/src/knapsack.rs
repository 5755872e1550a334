//! Solves a small knapsack-shaped integer program end to end: normalize, take the `Simple` Markov
//! shortcut, complete it to a test set under the real cost, and reduce a known feasible point down
//! to the optimum.

use ipgb_core::ip_instance::{ConstraintSense, IPInstance, RawInstance};
use ipgb_core::{build_monomial_order, compute_gb, optimize_with, Config};
use ipgb_hal::{ReferenceHermiteOracle, ReferenceLpOracle};

fn main() -> ipgb_utils::Result<()> {
	tracing_subscriber::fmt::init();

	let raw = RawInstance {
		a: vec![vec![3, 2, 1]],
		senses: vec![ConstraintSense::LessOrEqual],
		b: vec![4],
		cost: vec![vec![-5, -4, -3]],
		u: vec![None, None, None],
		nonneg: vec![true, true, true],
		minimize: true,
	};

	let lp = ReferenceLpOracle;
	let hermite = ReferenceHermiteOracle;
	let instance = IPInstance::normalize(&raw, &lp, &hermite)?;

	let markov = instance
		.simple_markov_generators()
		.expect("every row of this instance has its own slack");
	println!("simple markov basis ({} generators):", markov.len());
	for g in &markov {
		println!("  {:?}", instance.invert_vector(g));
	}

	let order = build_monomial_order(
		vec![instance.cost()[0].iter().map(|&c| c as f64).collect()],
		instance.a(),
		instance.b(),
		instance.n_vars(),
		&lp,
	)?;
	let gb = compute_gb(&instance, markov, order, Config::default(), &lp)?;
	println!("test set ({} elements):", gb.len());
	for g in &gb {
		println!("  {:?}", instance.invert_vector(g));
	}

	let start = instance.permute_vector(&[0, 0, 0, 4]);
	let optimum = optimize_with(&start, &gb, *instance.nonnegative_end(), 0)?;
	println!("optimum: {:?}, cost {}", instance.invert_vector(&optimum), instance.cost_of(&optimum)?[0]);

	Ok(())
}
