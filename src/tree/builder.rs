//! Nearest-predecessor forest construction

use rayon::prelude::*;

use crate::config::MetricParams;
use crate::data::Catalog;
use crate::tree::metric::proximity;
use crate::tree::{Forest, ProximityLink};

/// Catalogs below this size are searched sequentially; larger ones fan out
/// over the rayon pool
const PARALLEL_THRESHOLD: usize = 1000;

/// Build the nearest-predecessor forest over a catalog
///
/// Each event after the first links to the predecessor minimizing the
/// proximity metric, ties resolved to the earliest predecessor. A catalog
/// with fewer than two events yields an empty forest, not an error.
///
/// Every event's search is independent, so large catalogs run the scans in
/// parallel; both paths go through the same per-event search and produce
/// identical links.
pub fn build_forest(catalog: &Catalog, params: &MetricParams) -> Forest {
    let n = catalog.len();
    if n < 2 {
        return Forest {
            event_count: n,
            links: Vec::new(),
        };
    }

    log::info!("Building proximity forest over {} events", n);

    let links: Vec<ProximityLink> = if n < PARALLEL_THRESHOLD {
        (1..n)
            .map(|child| nearest_predecessor(catalog, child, params))
            .collect()
    } else {
        (1..n)
            .into_par_iter()
            .map(|child| nearest_predecessor(catalog, child, params))
            .collect()
    };

    log::info!("Linked {} events to their nearest predecessors", links.len());

    Forest {
        event_count: n,
        links,
    }
}

/// Exhaustive scan over all causal predecessors of one event
fn nearest_predecessor(catalog: &Catalog, child: usize, params: &MetricParams) -> ProximityLink {
    let event = catalog.event(child);

    let mut best = 0;
    let mut best_proximity = proximity(catalog.event(0), event, params);

    for candidate in 1..child {
        let p = proximity(catalog.event(candidate), event, params);
        // Strict comparison keeps the earliest predecessor on ties
        if p.distance < best_proximity.distance {
            best = candidate;
            best_proximity = p;
        }
    }

    ProximityLink {
        child,
        parent: best,
        distance: best_proximity.distance,
        rescaled_time: best_proximity.rescaled_time,
        rescaled_distance: best_proximity.rescaled_distance,
    }
}
