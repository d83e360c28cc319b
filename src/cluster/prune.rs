//! Forest pruning and component labeling

use std::collections::HashMap;

use crate::cluster::{Cluster, ClusterAssignment, EventAssignment};
use crate::data::Catalog;
use crate::error::DeclusterError;
use crate::tree::Forest;

/// Union-Find over event indices for connected component analysis
struct DisjointSets {
    /// Parent pointers (parent[i] = parent of event i)
    parent: Vec<usize>,

    /// Size of each set (for union by size)
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    /// Find the root of the set containing x with path compression
    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Union the sets containing x and y
    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return; // Already in the same set
        }

        // Attach the smaller set under the root of the larger one
        if self.size[root_x] >= self.size[root_y] {
            self.parent[root_y] = root_x;
            self.size[root_x] += self.size[root_y];
        } else {
            self.parent[root_x] = root_y;
            self.size[root_y] += self.size[root_x];
        }
    }
}

/// Cut links above the cutoff and label the remaining components
///
/// Links with `distance <= cutoff` survive; the connected components they
/// define become clusters, each rooted at its earliest member, with
/// `cluster_id` equal to the root's index. Pure function of its inputs:
/// pruning twice at the same cutoff reproduces the same assignment, and a
/// different cutoff never requires rebuilding the forest.
pub fn prune(
    catalog: &Catalog,
    forest: &Forest,
    cutoff: f64,
) -> Result<ClusterAssignment, DeclusterError> {
    if !cutoff.is_finite() || cutoff < 0.0 {
        return Err(DeclusterError::InvalidCutoff(cutoff));
    }
    if catalog.len() != forest.event_count {
        return Err(DeclusterError::MalformedInput(format!(
            "forest spans {} events but catalog has {}",
            forest.event_count,
            catalog.len()
        )));
    }

    let n = forest.event_count;
    let mut sets = DisjointSets::new(n);

    let mut kept = 0;
    for link in &forest.links {
        if link.distance <= cutoff {
            sets.union(link.child, link.parent);
            kept += 1;
        }
    }

    log::debug!(
        "Kept {} of {} links at cutoff {:.3e}",
        kept,
        forest.links.len(),
        cutoff
    );

    // Group events by component; scanning in index order keeps each member
    // list ascending, so the first member is the earliest event
    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for event in 0..n {
        let set = sets.find(event);
        components.entry(set).or_default().push(event);
    }

    let mut clusters: Vec<Cluster> = components
        .into_values()
        .map(|members| {
            let root = members[0];
            let time_span =
                catalog.event(members[members.len() - 1]).time - catalog.event(root).time;
            Cluster {
                id: root,
                root,
                size: members.len(),
                time_span,
                members,
            }
        })
        .collect();
    clusters.sort_by_key(|c| c.root);

    let mut cluster_of = vec![0; n];
    for cluster in &clusters {
        for &member in &cluster.members {
            cluster_of[member] = cluster.id;
        }
    }

    let events: Vec<EventAssignment> = (0..n)
        .map(|event| {
            let link = forest.link_for(event);
            EventAssignment {
                event,
                cluster_id: cluster_of[event],
                is_root: cluster_of[event] == event,
                parent: link.map(|l| l.parent),
                distance: link.map(|l| l.distance),
            }
        })
        .collect();

    Ok(ClusterAssignment {
        cutoff,
        events,
        clusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricParams;
    use crate::data::Event;
    use crate::tree::builder::build_forest;

    fn catalog_of(raw: Vec<(f64, f64, f64, f64)>) -> Catalog {
        let events = raw
            .into_iter()
            .map(|(time, x, y, magnitude)| Event {
                time,
                location: vec![x, y],
                magnitude,
            })
            .collect();
        Catalog::from_events(events).unwrap()
    }

    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (*seed >> 11) as f64 / (1u64 << 53) as f64
    }

    fn random_catalog(count: usize, seed: u64) -> Catalog {
        let mut state = seed;
        let raw = (0..count)
            .map(|_| {
                (
                    lcg(&mut state) * 500.0,
                    lcg(&mut state) * 100.0,
                    lcg(&mut state) * 100.0,
                    lcg(&mut state) * 5.0,
                )
            })
            .collect();
        catalog_of(raw)
    }

    #[test]
    fn zero_cutoff_yields_singletons() {
        let catalog = random_catalog(20, 5);
        let forest = build_forest(&catalog, &MetricParams::default());
        let assignment = prune(&catalog, &forest, 0.0).unwrap();

        assert_eq!(assignment.clusters.len(), catalog.len());
        for cluster in &assignment.clusters {
            assert_eq!(cluster.size, 1);
            assert_eq!(cluster.root, cluster.members[0]);
        }
        for assigned in &assignment.events {
            assert!(assigned.is_root);
            assert_eq!(assigned.cluster_id, assigned.event);
        }
    }

    #[test]
    fn max_distance_cutoff_yields_one_cluster() {
        let catalog = random_catalog(20, 9);
        let forest = build_forest(&catalog, &MetricParams::default());
        let max_distance = forest
            .links
            .iter()
            .map(|l| l.distance)
            .fold(f64::MIN, f64::max);

        let assignment = prune(&catalog, &forest, max_distance).unwrap();

        assert_eq!(assignment.clusters.len(), 1);
        assert_eq!(assignment.clusters[0].root, 0);
        assert_eq!(assignment.clusters[0].size, catalog.len());
    }

    #[test]
    fn pruning_is_idempotent() {
        let catalog = random_catalog(40, 21);
        let forest = build_forest(&catalog, &MetricParams::default());
        let median = {
            let mut distances: Vec<f64> = forest.links.iter().map(|l| l.distance).collect();
            distances.sort_by(f64::total_cmp);
            distances[distances.len() / 2]
        };

        let first = prune(&catalog, &forest, median).unwrap();
        let second = prune(&catalog, &forest, median).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn clusters_partition_the_catalog() {
        let catalog = random_catalog(50, 33);
        let forest = build_forest(&catalog, &MetricParams::default());
        let assignment = prune(&catalog, &forest, 1e-3).unwrap();

        let mut seen = vec![false; catalog.len()];
        for cluster in &assignment.clusters {
            for &member in &cluster.members {
                assert!(!seen[member], "event {} appears twice", member);
                seen[member] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn raising_the_cutoff_never_splits_clusters() {
        let catalog = random_catalog(40, 77);
        let forest = build_forest(&catalog, &MetricParams::default());

        let mut cutoffs: Vec<f64> = forest.links.iter().map(|l| l.distance).collect();
        cutoffs.sort_by(f64::total_cmp);

        let mut previous: Option<ClusterAssignment> = None;
        for &cutoff in &cutoffs {
            let current = prune(&catalog, &forest, cutoff).unwrap();
            if let Some(finer) = previous {
                assert!(current.clusters.len() <= finer.clusters.len());
                // Every finer cluster stays together in the coarser clustering
                for cluster in &finer.clusters {
                    let coarse_id = current.events[cluster.members[0]].cluster_id;
                    for &member in &cluster.members {
                        assert_eq!(current.events[member].cluster_id, coarse_id);
                    }
                }
            }
            previous = Some(current);
        }
    }

    #[test]
    fn root_is_the_event_whose_link_was_cut() {
        // Chain 0 <- 1 <- 2 with a long gap before event 2: cutting its
        // link makes it the root of its own cluster
        let catalog = catalog_of(vec![
            (0.0, 0.0, 0.0, 2.0),
            (1.0, 0.1, 0.0, 2.0),
            (500.0, 90.0, 90.0, 2.0),
        ]);
        let forest = build_forest(&catalog, &MetricParams::default());
        let gap_distance = forest.link_for(2).unwrap().distance;

        let assignment = prune(&catalog, &forest, gap_distance / 2.0).unwrap();

        assert_eq!(assignment.events[2].cluster_id, 2);
        assert!(assignment.events[2].is_root);
        // The forest link is still reported even though it was cut
        assert_eq!(assignment.events[2].parent, forest.link_for(2).map(|l| l.parent));
    }

    #[test]
    fn invalid_cutoffs_are_rejected() {
        let catalog = random_catalog(10, 2);
        let forest = build_forest(&catalog, &MetricParams::default());

        for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                prune(&catalog, &forest, bad),
                Err(DeclusterError::InvalidCutoff(_))
            ));
        }
    }

    #[test]
    fn singleton_catalog_prunes_to_one_root() {
        let catalog = catalog_of(vec![(0.0, 0.0, 0.0, 1.0)]);
        let forest = build_forest(&catalog, &MetricParams::default());
        let assignment = prune(&catalog, &forest, 1.0).unwrap();

        assert_eq!(assignment.clusters.len(), 1);
        assert!(assignment.events[0].is_root);
        assert_eq!(assignment.events[0].parent, None);
    }
}
