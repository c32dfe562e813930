//! Shared types used across revpack crates.
//!
//! Resource values are signed 64-bit integers to match what host
//! schedulers report. Negative values are representable on the wire;
//! the placement engine decides what to do with them.

use serde::{Deserialize, Serialize};

/// Unique identifier for a candidate host.
pub type HostId = String;

/// Resource demand of the workload being placed.
///
/// A zero field means the workload made no explicit request on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub memory_bytes: i64,
    pub cpu_shares: i64,
}

impl ResourceRequest {
    pub fn new(memory_bytes: i64, cpu_shares: i64) -> Self {
        Self {
            memory_bytes,
            cpu_shares,
        }
    }
}

/// A single candidate host's resource view at decision time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapacity {
    pub id: HostId,
    /// Total schedulable memory in bytes.
    pub usable_memory: i64,
    /// Total schedulable CPU shares.
    pub usable_cpus: i64,
    /// Memory already committed to other workloads.
    #[serde(default)]
    pub reserved_memory: i64,
    /// CPU shares already committed to other workloads.
    #[serde(default)]
    pub reserved_cpus: i64,
}

impl HostCapacity {
    /// True when every capacity and reservation value is non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.usable_memory >= 0
            && self.usable_cpus >= 0
            && self.reserved_memory >= 0
            && self.reserved_cpus >= 0
    }

    /// True when usable capacity covers the request on both axes.
    pub fn fits(&self, request: &ResourceRequest) -> bool {
        self.usable_memory >= request.memory_bytes && self.usable_cpus >= request.cpu_shares
    }
}

// ── Wire envelopes ─────────────────────────────────────────────────

/// Container configuration as handed over by the host scheduler.
///
/// Only `memory_bytes` and `cpu_shares` influence placement. Other fields
/// the scheduler sends are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub memory_bytes: i64,
    #[serde(default)]
    pub cpu_shares: i64,
}

/// One placement request: a container and the hosts it may land on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementEnvelope {
    pub container: ContainerSpec,
    #[serde(default)]
    pub hosts: Vec<HostCapacity>,
}

/// Reply to a [`PlacementEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementReply {
    Host(HostCapacity),
    Error(String),
}
