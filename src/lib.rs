//! # edca_sim - EDCA Channel Contention Simulator
//!
//! A discrete-event Monte-Carlo simulator of contention-based channel access
//! in a shared-medium wireless network, modeled after the EDCA backoff
//! mechanism. A population of access-point and station nodes competes for a
//! shared transmission slot over many repeated rounds; randomized exponential
//! backoff drives the success/collision outcomes.
//!
//! ## Core Components
//!
//! - **ContentionParams**: immutable per-class configuration (AIFS, CW bounds)
//! - **Node**: per-node backoff state machine with cumulative tallies
//! - **contend**: one contention round - AIFS-differentiated countdown plus
//!   per-group collision resolution
//! - **ContentionSim**: driver running N rounds over a fixed population with
//!   a single seeded generator
//!
//! ## Usage
//!
//! ```no_run
//! use edca_sim::{AccessClass, ContentionParams, ContentionSim, SimConfig};
//!
//! let config = SimConfig {
//!     rounds: 10_000,
//!     groups: 2,
//!     stas_per_group: 10,
//!     ap: ContentionParams::new(AccessClass::Ap, 2, 15, 63).unwrap(),
//!     sta: ContentionParams::new(AccessClass::Sta, 3, 15, 1023).unwrap(),
//!     seed: None,
//! };
//!
//! let result = ContentionSim::new(config).unwrap().run();
//! result.print_summary();
//! ```
//!
//! Runs are reproducible: pass `seed: Some(..)` and two runs with identical
//! parameters produce identical tallies.

pub mod edca_backoff;
pub mod edca_driver;
pub mod edca_node;
pub mod edca_params;
pub mod edca_round;
pub mod edca_stats;

#[cfg(test)]
mod test_util;

// Re-export commonly used types
pub use edca_backoff::BackoffSource;
pub use edca_driver::{ContentionSim, SimConfig};
pub use edca_node::{GroupId, Node, NodeId};
pub use edca_params::{AccessClass, ConfigError, ContentionParams};
pub use edca_round::{contend, RoundOutcome};
pub use edca_stats::{NodeReport, SimResult};
