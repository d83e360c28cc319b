//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};
use statrs::statistics::Statistics;

use crate::cluster::metrics::{assignment_stats, mean_magnitude};
use crate::cluster::ClusterAssignment;
use crate::data::Catalog;
use crate::tree::Forest;

/// Save declustering results to the specified directory
pub fn save_results(
    catalog: &Catalog,
    forest: &Forest,
    assignment: &ClusterAssignment,
    output_dir: &str,
) -> Result<()> {
    log::info!(
        "Saving {} clusters to {}",
        assignment.clusters.len(),
        output_dir
    );

    fs::create_dir_all(output_dir)?;

    save_events(catalog, forest, assignment, output_dir)?;
    save_clusters(catalog, assignment, output_dir)?;
    save_summary(catalog, forest, assignment, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// One row per event: catalog fields, cluster assignment, and the forest
/// link with its rescaled decomposition (blank for the first event)
fn save_events(
    catalog: &Catalog,
    forest: &Forest,
    assignment: &ClusterAssignment,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving per-event assignments");

    let path = Path::new(output_dir).join("events.csv");
    let mut file = File::create(path)?;

    let coord_names: Vec<String> = (0..catalog.dim()).map(coord_name).collect();
    writeln!(
        file,
        "event,time,{},magnitude,cluster_id,is_root,parent,distance,rescaled_time,rescaled_distance",
        coord_names.join(",")
    )?;

    for assigned in &assignment.events {
        let event = catalog.event(assigned.event);
        let coords = event
            .location
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");

        match forest.link_for(assigned.event) {
            Some(link) => writeln!(
                file,
                "{},{},{},{},{},{},{},{:e},{:e},{:e}",
                assigned.event,
                event.time,
                coords,
                event.magnitude,
                assigned.cluster_id,
                assigned.is_root,
                link.parent,
                link.distance,
                link.rescaled_time,
                link.rescaled_distance
            )?,
            None => writeln!(
                file,
                "{},{},{},{},{},{},,,,",
                assigned.event,
                event.time,
                coords,
                event.magnitude,
                assigned.cluster_id,
                assigned.is_root
            )?,
        }
    }

    Ok(())
}

/// One row per cluster
fn save_clusters(catalog: &Catalog, assignment: &ClusterAssignment, output_dir: &str) -> Result<()> {
    log::info!("Saving per-cluster statistics");

    let path = Path::new(output_dir).join("clusters.csv");
    let mut file = File::create(path)?;

    writeln!(file, "cluster_id,root,size,time_span,mean_magnitude")?;

    for cluster in &assignment.clusters {
        writeln!(
            file,
            "{},{},{},{},{}",
            cluster.id,
            cluster.root,
            cluster.size,
            cluster.time_span,
            mean_magnitude(catalog, &cluster.members)
        )?;
    }

    Ok(())
}

/// Summary information about the run
fn save_summary(
    catalog: &Catalog,
    forest: &Forest,
    assignment: &ClusterAssignment,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let stats = assignment_stats(assignment);

    let log_distances: Vec<f64> = forest.links.iter().map(|l| l.distance.log10()).collect();
    let distance_stats = if log_distances.is_empty() {
        json!(null)
    } else {
        json!({
            "min_log10": Statistics::min(&log_distances),
            "max_log10": Statistics::max(&log_distances),
            "mean_log10": Statistics::mean(&log_distances),
        })
    };

    let summary = json!({
        "catalog": {
            "event_count": catalog.len(),
            "dimensions": catalog.dim(),
            "time_span": catalog.time_span(),
        },
        "forest": {
            "link_count": forest.links.len(),
            "log10_distances": distance_stats,
        },
        "cutoff": {
            "value": assignment.cutoff,
            "log10": assignment.cutoff.log10(),
        },
        "clusters": {
            "cluster_count": stats.cluster_count,
            "background_count": stats.background_count,
            "largest_cluster_size": stats.largest_cluster_size,
            "mean_cluster_size": stats.mean_cluster_size,
            "clustered_fraction": stats.clustered_fraction,
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

fn coord_name(dim: usize) -> String {
    match dim {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "z".to_string(),
        d => format!("c{}", d),
    }
}
