//! Probabilistic belief tracking over the hidden character assignment.
//!
//! This module is composed of:
//! - `matrix`: the N×N `BeliefMatrix` (row = player, column = starting role slot).
//! - `normalize`: Sinkhorn–Knopp balancing with one excluded row and column.
//! - `update`: copy-on-write reveal and swap operators plus event dispatch.
//! - `state`: per-agent lifecycle (`Fresh` → `Updated` → `Discarded`).
//! - `telemetry`: entropy and accuracy summaries for logging.

mod error;
mod matrix;
mod normalize;
mod state;
pub mod telemetry;
mod update;

pub use error::BeliefError;
pub use matrix::BeliefMatrix;
pub use normalize::{
    DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS, NormalizerConfig, balance_in_place, normalize,
};
pub use state::{AgentBelief, BeliefPhase};
pub use update::{
    Audience, BeliefEvent, apply_event, apply_reveal, apply_reveal_at, apply_swap,
    initial_belief, resolve_role_column,
};
