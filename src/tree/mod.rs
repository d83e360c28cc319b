//! Proximity forest representation and construction

pub mod builder;
pub mod metric;

use serde::{Deserialize, Serialize};

/// Directed link from a later event to its nearest causal predecessor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityLink {
    /// The later event the link belongs to
    pub child: usize,

    /// The minimum-distance strictly-preceding event
    pub parent: usize,

    /// Proximity value between parent and child
    pub distance: f64,

    /// Magnitude-rescaled temporal component of the distance
    pub rescaled_time: f64,

    /// Magnitude-rescaled spatial component of the distance
    pub rescaled_distance: f64,
}

/// Nearest-predecessor links over a whole catalog
///
/// One link per event of index >= 1; the first event is the implicit root.
/// Immutable once built, so a cutoff can be swapped and pruning re-run
/// without rebuilding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    /// Number of events the forest spans
    pub event_count: usize,

    /// Links ordered by child index (`links[i]` belongs to event `i + 1`)
    pub links: Vec<ProximityLink>,
}

impl Forest {
    /// The link attached to an event, if it has one
    pub fn link_for(&self, event: usize) -> Option<&ProximityLink> {
        if event == 0 {
            None
        } else {
            self.links.get(event - 1)
        }
    }
}
