//! revpack placement — reverse bin-packing (spread) host selection.
//!
//! Given a container's resource request and a snapshot of candidate
//! hosts, picks the host that will be least utilized after placement.
//! This crate holds no cluster state and launches nothing; the hosting
//! scheduler acts on the returned decision.
//!
//! # Components
//!
//! - **`scorer`** — Per-host projected utilization and ranking order
//! - **`strategy`** — `PlacementStrategy` trait and the `revbinpack` strategy
//! - **`registry`** — Name → strategy lookup resolved at startup
//! - **`convert`** — Container spec to resource request conversion

pub mod convert;
pub mod error;
pub mod registry;
pub mod scorer;
pub mod strategy;

pub use convert::container_to_request;
pub use error::{PlacementError, PlacementResult};
pub use registry::StrategyRegistry;
pub use scorer::{
    Evaluation, ExcludedHost, Exclusion, ScoredCandidate, evaluate_hosts, rank_hosts, validate_request,
};
pub use strategy::{PlacementStrategy, ReverseBinpack, decide};
