//! Automatic cutoff selection from the link distance distribution

use itertools::Itertools;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::error::DeclusterError;
use crate::tree::Forest;

/// Minimum number of links needed before a split is attempted
const MIN_LINKS: usize = 16;

/// Number of evaluation points in the density grid
const GRID_POINTS: usize = 256;

/// The valley must sit below this fraction of the lower mode's density for
/// the split to count as bimodal; shallower dips are sampling noise
const SEPARATION_RATIO: f64 = 0.5;

/// An automatically selected cutoff and the split that produced it
#[derive(Debug, Clone, Copy)]
pub struct CutoffEstimate {
    /// Threshold on the raw proximity value
    pub cutoff: f64,

    /// The same threshold in log10 space, where the split was found
    pub log10_cutoff: f64,

    /// log10 positions of the two separated modes (clustered, background)
    pub modes: (f64, f64),

    /// Density at the valley between the modes
    pub valley_density: f64,
}

/// Estimate the cutoff separating clustered from background link distances
///
/// Gaussian kernel density estimate over log10 distances with Silverman
/// bandwidth; the cutoff is the minimum-density point between the two
/// dominant modes. Returns `CutoffUndetermined` whenever the distribution
/// has no clear bimodal split (too few links, a single mode, or a valley
/// barely below the peaks) rather than guessing a threshold.
pub fn estimate_cutoff(forest: &Forest) -> Result<CutoffEstimate, DeclusterError> {
    let samples: Vec<f64> = forest.links.iter().map(|l| l.distance.log10()).collect();
    let n = samples.len();

    if n < MIN_LINKS {
        return Err(DeclusterError::CutoffUndetermined(format!(
            "only {} links, need at least {}",
            n, MIN_LINKS
        )));
    }

    log::info!("Estimating cutoff from {} link distances", n);

    let sigma = samples.iter().std_dev();
    let mut ordered = Data::new(samples.clone());
    let iqr = ordered.interquartile_range();

    // Silverman's rule, robust variant
    let spread = if iqr > 0.0 { sigma.min(iqr / 1.34) } else { sigma };
    let bandwidth = 0.9 * spread * (n as f64).powf(-0.2);

    let kernel = Normal::new(0.0, bandwidth).map_err(|_| {
        DeclusterError::CutoffUndetermined("degenerate log-distance distribution".to_string())
    })?;

    let (min_sample, max_sample) = samples
        .iter()
        .minmax()
        .into_option()
        .map(|(lo, hi)| (*lo, *hi))
        .ok_or_else(|| DeclusterError::CutoffUndetermined("no link distances".to_string()))?;

    let lo = min_sample - 3.0 * bandwidth;
    let hi = max_sample + 3.0 * bandwidth;
    let step = (hi - lo) / (GRID_POINTS - 1) as f64;
    let grid: Vec<f64> = (0..GRID_POINTS).map(|i| lo + step * i as f64).collect();

    let density: Vec<f64> = grid
        .par_iter()
        .map(|&x| samples.iter().map(|&s| kernel.pdf(x - s)).sum::<f64>() / n as f64)
        .collect();

    // Interior local maxima of the density curve
    let mut peaks: Vec<usize> = Vec::new();
    for i in 1..GRID_POINTS - 1 {
        if density[i] > density[i - 1] && density[i] >= density[i + 1] {
            peaks.push(i);
        }
    }

    if peaks.len() < 2 {
        return Err(DeclusterError::CutoffUndetermined(
            "log-distance distribution is unimodal".to_string(),
        ));
    }

    // The two dominant modes, ordered left to right along the grid
    peaks.sort_by(|a, b| density[*b].total_cmp(&density[*a]));
    let (left, right) = if peaks[0] < peaks[1] {
        (peaks[0], peaks[1])
    } else {
        (peaks[1], peaks[0])
    };

    if right - left < 2 {
        return Err(DeclusterError::CutoffUndetermined(
            "dominant modes are adjacent".to_string(),
        ));
    }

    let valley = (left + 1..right)
        .min_by(|a, b| density[*a].total_cmp(&density[*b]))
        .ok_or_else(|| {
            DeclusterError::CutoffUndetermined("dominant modes are adjacent".to_string())
        })?;

    let lower_peak = density[left].min(density[right]);
    if density[valley] >= SEPARATION_RATIO * lower_peak {
        return Err(DeclusterError::CutoffUndetermined(
            "no clear separation between modes".to_string(),
        ));
    }

    let log10_cutoff = grid[valley];

    log::info!(
        "Bimodal split at 10^{:.2} between modes 10^{:.2} and 10^{:.2}",
        log10_cutoff,
        grid[left],
        grid[right]
    );

    Ok(CutoffEstimate {
        cutoff: 10f64.powf(log10_cutoff),
        log10_cutoff,
        modes: (grid[left], grid[right]),
        valley_density: density[valley],
    })
}
