//! The explicit `Config` struct (§4.12, §9 "Global configuration"): every tunable policy of
//! [`crate::buchberger::Buchberger`] and [`crate::project_and_lift::ProjectAndLift`] is threaded
//! in by value; there is no module-level mutable state anywhere in this crate.

/// When to run the inter-reduction pass during completion (§4.9 step 9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoReducePolicy {
	/// Never auto-reduce; only the final minimal/reduced-basis pass runs.
	Never,
	/// Every `n` main-loop iterations (pair draws), regardless of whether they pushed anything.
	EveryIterations(u32),
	/// Every `n` elements pushed into the basis since the last auto-reduction.
	EveryElementsAdded(u32),
	/// When the basis has grown by this fraction since the last auto-reduction (e.g. `0.5` means
	/// "has grown 50% since last time").
	FractionOfGrowth(f64),
}

/// Which divisibility/feasibility filter the truncator applies (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationMode {
	None,
	Simple,
	Model(ModelKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
	Lp,
	Ip,
}

/// Which [`crate::pair_queue::PairQueue`] strategy generates S-binomial candidates (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStrategyKind {
	Fifo,
	PairPriority,
	BatchPriority,
}

/// Every tunable policy threaded explicitly into [`crate::buchberger::Buchberger`] and
/// [`crate::project_and_lift::ProjectAndLift`] (§4.12). Replaces the source's module-level
/// mutable globals (auto-reduce frequency, cache size, log level) with a single value-semantic
/// struct; there is no silent global mutation anywhere in this crate (§9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
	pub auto_reduce: AutoReducePolicy,
	pub truncation: TruncationMode,
	pub pair_strategy: PairStrategyKind,
	/// Whether to run the §4.9 reduced-basis post-pass after minimal-basis trimming.
	pub reduced_basis: bool,
	/// Optional safety cap on main-loop iterations, surfaced as
	/// [`ipgb_utils::Error::IterationLimitExceeded`] — an addition beyond the base error list
	/// (§4.12), needed so a misconfigured degenerate order cannot loop forever in a library call
	/// with no external timeout.
	pub max_iterations: Option<u64>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			auto_reduce: AutoReducePolicy::EveryElementsAdded(100),
			truncation: TruncationMode::None,
			pair_strategy: PairStrategyKind::Fifo,
			reduced_basis: false,
			max_iterations: None,
		}
	}
}
