//! Asymmetric causal proximity between events

use crate::config::MetricParams;
use crate::data::Event;

/// A computed proximity value and its rescaled decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Combined proximity value
    pub distance: f64,

    /// Temporal component after magnitude rescaling
    pub rescaled_time: f64,

    /// Spatial component after magnitude rescaling
    pub rescaled_distance: f64,
}

/// Proximity from an earlier event to a strictly later one
///
/// Combines elapsed time, Euclidean separation raised to the fractal
/// dimension, and a magnitude weight that lets larger parents reach further:
///
/// ```text
/// eta = dt * r^d * 10^(-b * m_parent)
/// ```
///
/// split into `rescaled_time = dt * 10^(-q*b*m)` and
/// `rescaled_distance = r^d * 10^((q-1)*b*m)` with `eta` their product.
/// Elapsed time and separation are floored by the params so the value is
/// finite and strictly positive even for duplicate events. Causal ordering
/// (`parent.time <= child.time`, same-time ties broken by catalog index) is
/// the caller's responsibility.
pub fn proximity(parent: &Event, child: &Event, params: &MetricParams) -> Proximity {
    let dt = (child.time - parent.time).max(params.min_time_sep);
    let r = euclidean(parent, child).max(params.min_space_sep);

    let spatial = r.powf(params.fractal_dim);
    let reach = params.b_value * parent.magnitude;

    Proximity {
        distance: dt * spatial * 10f64.powf(-reach),
        rescaled_time: dt * 10f64.powf(-params.mag_split * reach),
        rescaled_distance: spatial * 10f64.powf((params.mag_split - 1.0) * reach),
    }
}

fn euclidean(a: &Event, b: &Event) -> f64 {
    a.location
        .iter()
        .zip(&b.location)
        .map(|(p, q)| (p - q) * (p - q))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time: f64, x: f64, y: f64, magnitude: f64) -> Event {
        Event {
            time,
            location: vec![x, y],
            magnitude,
        }
    }

    #[test]
    fn larger_parent_magnitude_reaches_further() {
        let params = MetricParams::default();
        let child = event(10.0, 3.0, 4.0, 2.0);

        let weak = proximity(&event(0.0, 0.0, 0.0, 2.0), &child, &params);
        let strong = proximity(&event(0.0, 0.0, 0.0, 5.0), &child, &params);

        assert!(strong.distance < weak.distance);
    }

    #[test]
    fn duplicate_events_get_a_finite_positive_distance() {
        let params = MetricParams::default();
        let a = event(1.0, 2.0, 3.0, 4.0);
        let b = event(1.0, 2.0, 3.0, 4.0);

        let p = proximity(&a, &b, &params);

        assert!(p.distance.is_finite());
        assert!(p.distance > 0.0);
        assert!(p.rescaled_time.is_finite() && p.rescaled_time > 0.0);
        assert!(p.rescaled_distance.is_finite() && p.rescaled_distance > 0.0);
    }

    #[test]
    fn decomposition_multiplies_back_to_the_distance() {
        let params = MetricParams::new(0.9, 1.6, 0.4);
        let a = event(0.0, 0.0, 0.0, 4.2);
        let b = event(3.5, 12.0, -7.0, 2.0);

        let p = proximity(&a, &b, &params);
        let product = p.rescaled_time * p.rescaled_distance;

        assert!((product - p.distance).abs() <= 1e-12 * p.distance.abs());
    }

    #[test]
    fn proximity_is_deterministic() {
        let params = MetricParams::default();
        let a = event(0.0, 1.0, 1.0, 3.0);
        let b = event(2.0, 4.0, 5.0, 2.5);

        assert_eq!(proximity(&a, &b, &params), proximity(&a, &b, &params));
    }

    #[test]
    fn closer_in_time_means_closer_overall() {
        let params = MetricParams::default();
        let near = event(1.0, 10.0, 10.0, 2.0);
        let far = event(100.0, 10.0, 10.0, 2.0);
        let origin = event(0.0, 0.0, 0.0, 3.0);

        assert!(
            proximity(&origin, &near, &params).distance
                < proximity(&origin, &far, &params).distance
        );
    }
}
