//! Cluster assignment types

pub mod metrics;
pub mod prune;

use serde::{Deserialize, Serialize};

/// One event's placement after pruning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAssignment {
    /// Event index in the time-sorted catalog
    pub event: usize,

    /// Root index of the cluster this event belongs to
    pub cluster_id: usize,

    /// Whether this event is its cluster's root
    pub is_root: bool,

    /// Nearest-predecessor link target from the forest (None for event 0)
    pub parent: Option<usize>,

    /// Distance along that link
    pub distance: Option<f64>,
}

/// A connected component remaining after pruning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier (by convention, the root event's index)
    pub id: usize,

    /// Earliest member event
    pub root: usize,

    /// Member events, ascending by index
    pub members: Vec<usize>,

    /// Number of members
    pub size: usize,

    /// Time from first to last member
    pub time_span: f64,
}

/// Full clustering of a catalog at one cutoff
///
/// Clusters partition the catalog: every event appears in exactly one
/// cluster's member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// Cutoff the forest was pruned at
    pub cutoff: f64,

    /// Per-event placements, indexed by event
    pub events: Vec<EventAssignment>,

    /// Clusters ordered by root index
    pub clusters: Vec<Cluster>,
}
