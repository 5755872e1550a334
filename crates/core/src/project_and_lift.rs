//! Project-and-lift (§4.10): incrementally builds a Markov basis of `ker(A) ∩ ℤⁿ` by starting
//! from a trivial basis over a fully-relaxed (all-free) sublattice and lifting one variable's
//! non-negativity constraint back in at a time, using an `LPOracle` ray search where the lifted
//! coordinate turns out to be unbounded and a `Buchberger` completion where it doesn't.
//!
//! Unlike [`crate::buchberger::Buchberger`], which owns a single fixed [`MonomialOrder`] for its
//! whole run, this module constructs a fresh order (and a fresh `Buchberger`) on every lift — each
//! iteration's objective ("maximize the variable currently being lifted") only needs to hold for
//! that one completion (§9 "shared mutable state on the cost matrix").

use std::collections::HashSet;

use ipgb_hal::{HermiteOracle, LPOracle};
use ipgb_math::{Binomial, BinomialLike};
use ipgb_utils::Result;
use tracing::info_span;

use crate::binomial_set::BinomialSet;
use crate::buchberger::Buchberger;
use crate::config::Config;
use crate::ip_instance::IPInstance;
use crate::reducer::reduce_full;
use crate::truncator::Truncator;

/// The result of running [`ProjectAndLift::run`] to completion (§6.5 `project_and_lift`).
#[derive(Debug, Clone)]
pub struct ProjectAndLiftOutcome {
	/// A Markov basis of `ker(A) ∩ ℤⁿ`, indexed in `working_instance`'s own (fixed) column order.
	pub markov_basis: Vec<Vec<i64>>,
	pub has_optimal_solution: bool,
	/// Present only when the solve-while-lift variant was requested and converged; indexed in
	/// `working_instance`'s column order.
	pub optimal_solution: Option<Vec<i64>>,
}

/// The incremental state of a project-and-lift run (§4.10 `ProjectAndLiftState`).
pub struct ProjectAndLift<'a, L: LPOracle, H: HermiteOracle> {
	/// The permuted IP the whole run works against; never rebuilt or reordered once constructed —
	/// every vector this struct stores is expressed in `working_instance`'s own column order, and
	/// per-iteration relaxations are translated in and out of it rather than chained together.
	working_instance: IPInstance,
	/// Indices (in `working_instance`'s order) whose non-negativity is currently relaxed.
	unlifted: HashSet<usize>,
	/// The current partial generating set, indexed in `working_instance`'s column order.
	markov: Vec<Vec<i64>>,
	/// A carried feasible lattice point, used both to absorb unbounded rays (§4.10 step 3) and, in
	/// the solve-while-lift variant, as the running candidate optimum.
	dual_solution: Vec<i64>,
	optimize: bool,
	optimal_solution: Option<Vec<i64>>,
	config: Config,
	lp: &'a L,
	hermite: &'a H,
}

impl<'a, L: LPOracle, H: HermiteOracle> ProjectAndLift<'a, L, H> {
	/// Initializes a run (§4.10 "Initialization"): relaxing every originally non-negative variable
	/// to free gives a trivial relaxation (no boundedness to respect at all), so its own kernel
	/// basis is already a valid Markov basis — no LP or completion work is needed before the first
	/// lift.
	pub fn new(
		working_instance: IPInstance,
		config: Config,
		optimize: bool,
		initial_solution: Option<Vec<i64>>,
		lp: &'a L,
		hermite: &'a H,
	) -> Result<Self> {
		let unlifted: HashSet<usize> = (0..*working_instance.nonnegative_end()).collect();
		let relaxation = working_instance.relax(&unlifted, lp, hermite)?;
		let markov: Vec<Vec<i64>> =
			relaxation.kernel_basis().iter().map(|row| relaxation.invert_vector(row)).collect();
		let dual_solution = initial_solution.unwrap_or_else(|| working_instance.fiber_solution().clone());

		let mut this = Self {
			working_instance,
			unlifted,
			markov,
			dual_solution,
			optimize,
			optimal_solution: None,
			config,
			lp,
			hermite,
		};
		this.lift_opportunistically();
		Ok(this)
	}

	/// Runs every remaining iteration to completion (§4.10 "Iteration"): each one strictly shrinks
	/// `unlifted`, so the loop terminates after at most `n` iterations.
	pub fn run(mut self) -> Result<ProjectAndLiftOutcome> {
		while !self.unlifted.is_empty() && !(self.optimize && self.optimal_solution.is_some()) {
			self.lift_one_variable()?;
		}
		Ok(ProjectAndLiftOutcome {
			markov_basis: self.markov,
			has_optimal_solution: self.optimal_solution.is_some(),
			optimal_solution: self.optimal_solution,
		})
	}

	/// Any `k ∈ unlifted` with no strictly positive entry in any current generator needs no LP or
	/// Gröbner work at all to lift — it can simply be declared non-negative (§4.10 "Opportunistic
	/// lifting"). Applied repeatedly to a fixed point, since lifting one variable this way can
	/// never expose a fresh positive entry for another, but a single pass is cheap to re-run until
	/// it finds nothing.
	fn lift_opportunistically(&mut self) {
		loop {
			let before = self.unlifted.len();
			self.unlifted.retain(|&k| self.markov.iter().any(|v| v[k] > 0));
			if self.unlifted.len() == before {
				break;
			}
		}
	}

	fn lift_one_variable(&mut self) -> Result<()> {
		let i = *self.unlifted.iter().min().expect("loop guard ensures unlifted is non-empty");
		let relaxation = self.working_instance.relax(&self.unlifted, self.lp, self.hermite)?;
		let pos_i = relaxation.inverse_permutation()[i];

		let span = info_span!("project_and_lift::lift_variable", variable = i, branch = tracing::field::Empty);
		let _enter = span.enter();

		match self.lp.unboundedness_ray(relaxation.a(), relaxation.nonneg(), pos_i)? {
			Some(ray) => {
				span.record("branch", "ray");
				let ray_working = relaxation.invert_vector(&ray);
				if !self.markov.iter().any(|v| v == &ray_working) {
					self.markov.push(ray_working);
				}
				self.absorb_ray_into_dual_solution(&relaxation, &ray);
			}
			None => {
				span.record("branch", "buchberger");
				self.relift_via_buchberger(&relaxation, pos_i)?;
			}
		}

		self.unlifted.remove(&i);
		self.lift_opportunistically();

		if self.optimize {
			self.check_optimality()?;
		}
		Ok(())
	}

	/// The bounded branch (§4.10 step 4): maximizing `xᵢ` under `relaxation` as the sole objective
	/// row, complete the current partial basis under it, and take the resulting reduced basis as
	/// the new `markov` — this is what actually certifies `i`'s boundedness and folds it in.
	fn relift_via_buchberger(&mut self, relaxation: &IPInstance, pos_i: usize) -> Result<()> {
		let n = relaxation.n_vars();
		let mut maximize_i = vec![0.0; n];
		maximize_i[pos_i] = 1.0;
		let order = crate::api::build_monomial_order(
			vec![maximize_i],
			relaxation.a(),
			relaxation.b(),
			n,
			self.lp,
		)?;

		let seeds: Result<Vec<Binomial>> = self
			.markov
			.iter()
			.map(|v| {
				let v_rel = relaxation.permute_vector(v);
				let cost = relaxation.cost_of(&v_rel)?;
				Ok(Binomial::plain(v_rel, cost))
			})
			.collect();

		let truncator = Truncator::new(
			self.config.truncation,
			relaxation.a(),
			relaxation.b(),
			relaxation.u(),
			relaxation.nonneg(),
			self.lp,
		)?;
		let mut bb = Buchberger::new(
			seeds?,
			order,
			self.config,
			*relaxation.nonnegative_end(),
			*relaxation.bounded_end(),
			truncator,
		)?;
		bb.complete()?;

		self.markov =
			bb.into_minimal_basis().iter().map(|g| relaxation.invert_vector(g.element())).collect();
		Ok(())
	}

	/// The unbounded branch's bookkeeping (§4.10 step 3): `ray` only certifies that moving along
	/// it keeps every *currently-unlifted* coordinate non-negative, so adding enough copies of it
	/// to `dual_solution` clears any negative entry the carried point still has there, without
	/// disturbing coordinates already lifted (where `ray` is zero by construction of the search).
	fn absorb_ray_into_dual_solution(&mut self, relaxation: &IPInstance, ray: &[i64]) {
		let mut dual_rel = relaxation.permute_vector(&self.dual_solution);
		let mut multiplier = 0i64;
		for (&step, &current) in ray.iter().zip(dual_rel.iter()) {
			if step > 0 && current < 0 {
				let needed = (-current + step - 1) / step;
				multiplier = multiplier.max(needed);
			}
		}
		if multiplier > 0 {
			for (coord, &step) in dual_rel.iter_mut().zip(ray.iter()) {
				*coord += multiplier * step;
			}
			self.dual_solution = relaxation.invert_vector(&dual_rel);
		}
	}

	/// The solve-while-lift variant (§4.10 "When optimizing"): completes a fresh run under the
	/// real objective over the current (possibly still-partial) `markov`, reduces the carried
	/// point against it, and accepts the reduction as optimal the moment it lands on a point that
	/// is feasible for *every* variable of the original instance, not just the lifted ones.
	fn check_optimality(&mut self) -> Result<()> {
		let n = self.working_instance.n_vars();
		let order_row: Vec<f64> = self.working_instance.cost()[0].iter().map(|&c| c as f64).collect();
		let order = crate::api::build_monomial_order(
			vec![order_row],
			self.working_instance.a(),
			self.working_instance.b(),
			n,
			self.lp,
		)?;

		let seeds: Result<Vec<Binomial>> = self
			.markov
			.iter()
			.map(|v| {
				let cost = self.working_instance.cost_of(v)?;
				Ok(Binomial::plain(v.clone(), cost))
			})
			.collect();
		let truncator = Truncator::new(
			self.config.truncation,
			self.working_instance.a(),
			self.working_instance.b(),
			self.working_instance.u(),
			self.working_instance.nonneg(),
			self.lp,
		)?;
		let mut bb = Buchberger::new(
			seeds?,
			order,
			self.config,
			*self.working_instance.nonnegative_end(),
			*self.working_instance.bounded_end(),
			truncator,
		)?;
		bb.complete()?;
		let basis = bb.into_minimal_basis();

		let mut set = BinomialSet::new(n, *self.working_instance.nonnegative_end());
		for g in basis {
			set.push(g);
		}
		let cost = self.working_instance.cost_of(&self.dual_solution)?;
		let mut candidate = Binomial::plain(self.dual_solution.clone(), cost);
		reduce_full(
			&mut candidate,
			&set,
			*self.working_instance.nonnegative_end(),
			*self.working_instance.bounded_end(),
			false,
			None,
		)?;

		if point_is_feasible(candidate.element(), &self.working_instance) {
			self.optimal_solution = Some(candidate.element().to_vec());
		}
		Ok(())
	}
}

/// Whether `v` respects every non-negativity and upper-bound constraint of `instance`, over *all*
/// of its variables — not just the ones a partial lift has certified so far.
fn point_is_feasible(v: &[i64], instance: &IPInstance) -> bool {
	itertools::izip!(v, instance.nonneg(), instance.u()).all(|(&x, &nonneg, &bound)| {
		(!nonneg || x >= 0) && bound.is_none_or(|bound| x <= bound)
	})
}
