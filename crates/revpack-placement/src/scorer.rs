//! Host scoring for spread placement.
//!
//! A host's score on one axis is the percentage of its usable capacity
//! that would be committed after placing the request. The combined score
//! is CPU% + memory%, so lower means emptier after placement.

use std::cmp::Ordering;
use std::fmt;

use revpack_core::{HostCapacity, ResourceRequest};
use serde::Serialize;
use tracing::debug;

use crate::error::{PlacementError, PlacementResult};

/// Score given to an axis the request does not ask for.
pub const NEUTRAL_SCORE: i64 = 100;

/// Highest per-axis score a host may reach and still be ranked.
pub const MAX_AXIS_SCORE: i64 = 100;

/// A feasible host together with its projected utilization.
///
/// Ordering is by `combined_score` ascending, then by `position` (the
/// host's index in the input), so the first-seen host wins ties.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate<'a> {
    pub host: &'a HostCapacity,
    pub position: usize,
    pub cpu_score: i64,
    pub memory_score: i64,
    pub combined_score: i64,
}

impl PartialEq for ScoredCandidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredCandidate<'_> {}

impl PartialOrd for ScoredCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.combined_score
            .cmp(&other.combined_score)
            .then(self.position.cmp(&other.position))
    }
}

/// Why a host was left out of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Negative usable or reserved capacity.
    Malformed,
    /// Usable capacity is below the request on some axis.
    TooSmall,
    /// Projected utilization exceeds 100% on some axis.
    Overcommitted,
    /// The projection did not fit in an `i64`.
    Overflow,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::Malformed => "malformed",
            Exclusion::TooSmall => "too_small",
            Exclusion::Overcommitted => "overcommitted",
            Exclusion::Overflow => "overflow",
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projected utilization percentage on one axis, truncated.
///
/// `None` on arithmetic overflow or zero capacity.
fn axis_score(reserved: i64, requested: i64, usable: i64) -> Option<i64> {
    if requested == 0 {
        return Some(NEUTRAL_SCORE);
    }
    reserved
        .checked_add(requested)?
        .checked_mul(100)?
        .checked_div(usable)
}

/// Score a single host for the request.
///
/// `position` is the host's index in the caller's list and is only used
/// for tie-breaking. The request must already have passed
/// [`validate_request`].
pub(crate) fn score_host<'a>(
    host: &'a HostCapacity,
    request: &ResourceRequest,
    position: usize,
) -> Result<ScoredCandidate<'a>, Exclusion> {
    if !host.is_well_formed() {
        return Err(Exclusion::Malformed);
    }
    if !host.fits(request) {
        return Err(Exclusion::TooSmall);
    }

    let cpu_score = axis_score(host.reserved_cpus, request.cpu_shares, host.usable_cpus)
        .ok_or(Exclusion::Overflow)?;
    let memory_score = axis_score(host.reserved_memory, request.memory_bytes, host.usable_memory)
        .ok_or(Exclusion::Overflow)?;

    // Catches stale reservations that the raw capacity check lets through.
    if cpu_score > MAX_AXIS_SCORE || memory_score > MAX_AXIS_SCORE {
        return Err(Exclusion::Overcommitted);
    }

    Ok(ScoredCandidate {
        host,
        position,
        cpu_score,
        memory_score,
        combined_score: cpu_score + memory_score,
    })
}

/// A host left out of the ranking and the reason why.
#[derive(Debug, Clone, Serialize)]
pub struct ExcludedHost<'a> {
    pub host: &'a HostCapacity,
    pub position: usize,
    pub reason: Exclusion,
}

/// Every host of one request, split into ranked survivors and exclusions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation<'a> {
    /// Survivors, best (emptiest) first.
    pub ranking: Vec<ScoredCandidate<'a>>,
    /// Excluded hosts in input order.
    pub excluded: Vec<ExcludedHost<'a>>,
}

/// Reject requests with a negative field.
pub fn validate_request(request: &ResourceRequest) -> PlacementResult<()> {
    if request.memory_bytes < 0 {
        return Err(PlacementError::InvalidRequest(format!(
            "negative memory request: {}",
            request.memory_bytes
        )));
    }
    if request.cpu_shares < 0 {
        return Err(PlacementError::InvalidRequest(format!(
            "negative cpu request: {}",
            request.cpu_shares
        )));
    }
    Ok(())
}

/// Score every host, keeping the exclusion reason for the ones that drop out.
pub fn evaluate_hosts<'a>(
    request: &ResourceRequest,
    hosts: &'a [HostCapacity],
) -> PlacementResult<Evaluation<'a>> {
    validate_request(request)?;

    let mut evaluation = Evaluation::default();
    for (position, host) in hosts.iter().enumerate() {
        match score_host(host, request, position) {
            Ok(candidate) => evaluation.ranking.push(candidate),
            Err(reason) => {
                debug!(host = %host.id, %reason, "host excluded");
                evaluation.excluded.push(ExcludedHost {
                    host,
                    position,
                    reason,
                });
            }
        }
    }

    evaluation.ranking.sort();
    Ok(evaluation)
}

/// Score all hosts and return the survivors, best (emptiest) first.
pub fn rank_hosts<'a>(
    request: &ResourceRequest,
    hosts: &'a [HostCapacity],
) -> PlacementResult<Vec<ScoredCandidate<'a>>> {
    Ok(evaluate_hosts(request, hosts)?.ranking)
}
