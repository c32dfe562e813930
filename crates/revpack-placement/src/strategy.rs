//! Placement strategies.
//!
//! A [`PlacementStrategy`] turns a resource request and a host snapshot
//! into a single host. Strategies are selected by name through the
//! [`StrategyRegistry`](crate::registry::StrategyRegistry).

use revpack_core::{HostCapacity, ResourceRequest};
use tracing::{debug, warn};

use crate::error::{PlacementError, PlacementResult};
use crate::scorer::rank_hosts;

/// A named, interchangeable host selection policy.
///
/// Implementations must be stateless across calls (or internally
/// synchronized) since one instance serves concurrent callers.
pub trait PlacementStrategy: Send + Sync {
    /// Name the strategy is registered under.
    fn name(&self) -> &'static str;

    /// One-time setup, called before the first decision.
    fn initialize(&mut self) -> PlacementResult<()> {
        Ok(())
    }

    /// Pick one of `hosts` for `request`.
    ///
    /// The returned reference always points into `hosts`.
    fn decide<'a>(
        &self,
        request: &ResourceRequest,
        hosts: &'a [HostCapacity],
    ) -> PlacementResult<&'a HostCapacity>;
}

/// Reverse bin-packing: place on the host that will be least utilized
/// afterward, so load spreads evenly across the fleet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseBinpack;

impl ReverseBinpack {
    pub const NAME: &'static str = "revbinpack";

    pub fn new() -> Self {
        Self
    }
}

impl PlacementStrategy for ReverseBinpack {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn decide<'a>(
        &self,
        request: &ResourceRequest,
        hosts: &'a [HostCapacity],
    ) -> PlacementResult<&'a HostCapacity> {
        decide(request, hosts)
    }
}

/// Choose the feasible host with the lowest projected utilization.
///
/// Hosts smaller than the request, hosts that would exceed 100% on
/// either axis, and hosts with negative capacity are skipped. Among
/// equal scores the host listed first wins. Fails with
/// [`PlacementError::InvalidRequest`] on a negative request and with
/// [`PlacementError::ResourceUnavailable`] when nothing survives.
pub fn decide<'a>(
    request: &ResourceRequest,
    hosts: &'a [HostCapacity],
) -> PlacementResult<&'a HostCapacity> {
    let ranked = rank_hosts(request, hosts)?;
    let Some(best) = ranked.first() else {
        warn!(
            memory_bytes = request.memory_bytes,
            cpu_shares = request.cpu_shares,
            candidates = hosts.len(),
            "no host can take the request"
        );
        return Err(PlacementError::ResourceUnavailable);
    };

    debug!(
        host = %best.host.id,
        score = best.combined_score,
        cpu = best.cpu_score,
        memory = best.memory_score,
        feasible = ranked.len(),
        "selected host"
    );
    Ok(best.host)
}
