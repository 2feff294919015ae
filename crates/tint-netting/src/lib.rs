//! # tint-netting
//!
//! **Pure intake and batch-reduction primitives for TINT.**
//!
//! - **Commitments**: hide an intent's amount behind
//!   `keccak256(amount || blinding)` until it is revealed for netting
//! - **Netting**: reduce opposing sell/buy amounts to one residual,
//!   a direction, and an efficiency figure
//!
//! Both are side-effect free: no I/O, no shared state, same input → same
//! output.

pub mod commitment;
pub mod netting;

pub use commitment::{Commitment, commit, random_blinding, verify};
pub use netting::{NetDirection, NetResult, compute_net_position};
