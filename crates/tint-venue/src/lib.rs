//! # tint-venue
//!
//! **Venue discovery for residual settlement.**
//!
//! Derives the deterministic pool id for each candidate fee tier of a
//! token pair, reads each pool's state through a [`PoolStateReader`], and
//! selects the most liquid one. Query failures are typed
//! ([`TierProbe::QueryError`]) so an unreachable node is distinguishable
//! from an empty pool, but neither aborts discovery.

pub mod discovery;
pub mod reader;

pub use discovery::{TierProbe, VenueSelector, select_best};
pub use reader::{PoolStateReader, Slot0};
