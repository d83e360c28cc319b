//! Summary statistics over a cluster assignment

use serde::Serialize;

use crate::cluster::ClusterAssignment;
use crate::data::Catalog;

/// Aggregate statistics for a finished assignment
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentStats {
    /// Total number of clusters
    pub cluster_count: usize,

    /// Clusters containing a single event (background events)
    pub background_count: usize,

    /// Size of the largest cluster
    pub largest_cluster_size: usize,

    /// Mean cluster size
    pub mean_cluster_size: f64,

    /// Fraction of events sitting in clusters of two or more
    pub clustered_fraction: f64,
}

/// Compute aggregate statistics for an assignment
pub fn assignment_stats(assignment: &ClusterAssignment) -> AssignmentStats {
    let cluster_count = assignment.clusters.len();
    let background_count = assignment.clusters.iter().filter(|c| c.size == 1).count();
    let largest_cluster_size = assignment.clusters.iter().map(|c| c.size).max().unwrap_or(0);
    let total_events = assignment.events.len();
    let clustered: usize = assignment
        .clusters
        .iter()
        .filter(|c| c.size > 1)
        .map(|c| c.size)
        .sum();

    AssignmentStats {
        cluster_count,
        background_count,
        largest_cluster_size,
        mean_cluster_size: if cluster_count == 0 {
            0.0
        } else {
            total_events as f64 / cluster_count as f64
        },
        clustered_fraction: if total_events == 0 {
            0.0
        } else {
            clustered as f64 / total_events as f64
        },
    }
}

/// Mean magnitude over a set of member events
pub fn mean_magnitude(catalog: &Catalog, members: &[usize]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    members
        .iter()
        .map(|&m| catalog.event(m).magnitude)
        .sum::<f64>()
        / members.len() as f64
}
