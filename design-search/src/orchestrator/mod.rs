//! Search orchestrator: concurrent provider fan-out and round-robin merge.
//!
//! Every active provider is queried with the same per-provider budget, and
//! the surviving lists are interleaved so that no single gallery dominates
//! the head of the combined result.

pub mod budget;
pub mod interleave;
pub mod search;

pub use budget::per_provider_budget;
pub use interleave::interleave;
pub use search::{active_providers, orchestrate_search};
