//! Builds a Markov basis for a small lattice via project-and-lift, then shows that completing it
//! under a lexicographic order yields a strictly larger test set — the basis alone isn't enough to
//! reduce every fiber point to its unique normal form.

use ipgb_core::ip_instance::{ConstraintSense, IPInstance, RawInstance};
use ipgb_core::{build_monomial_order, compute_gb, project_and_lift, Config};
use ipgb_hal::{ReferenceHermiteOracle, ReferenceLpOracle};

fn main() -> ipgb_utils::Result<()> {
	tracing_subscriber::fmt::init();

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
	let instance = IPInstance::normalize(&raw, &lp, &hermite)?;

	let (markov, _, _) = project_and_lift(&instance, Config::default(), false, None, &lp, &hermite)?;
	println!("markov basis ({} generators):", markov.len());
	for g in &markov {
		println!("  {:?}", instance.invert_vector(g));
	}

	let lex_rows: Vec<Vec<f64>> = (0..instance.n_vars())
		.map(|i| {
			let mut row = vec![0.0; instance.n_vars()];
			row[i] = 1.0;
			row
		})
		.collect();
	let order = build_monomial_order(lex_rows, instance.a(), instance.b(), instance.n_vars(), &lp)?;
	let gb = compute_gb(&instance, markov.clone(), order, Config::default(), &lp)?;
	println!("test set ({} elements, {} more than the markov basis):", gb.len(), gb.len() - markov.len());
	for g in &gb {
		println!("  {:?}", instance.invert_vector(g));
	}

	Ok(())
}
