//! Conversion from the scheduler's container spec to a resource request.

use revpack_core::{ContainerSpec, ResourceRequest};

/// Extract the resource request from a [`ContainerSpec`].
///
/// The image is ignored; only memory and CPU shares matter
/// for placement.
pub fn container_to_request(spec: &ContainerSpec) -> ResourceRequest {
    ResourceRequest {
        memory_bytes: spec.memory_bytes,
        cpu_shares: spec.cpu_shares,
    }
}
