//! Configuration for the proximity metric

/// Parameters of the nearest-neighbor proximity metric
#[derive(Debug, Clone, Copy)]
pub struct MetricParams {
    /// Gutenberg-Richter b-value controlling how far large magnitudes reach
    pub b_value: f64,

    /// Fractal dimension of the epicenter distribution (exponent on the
    /// spatial separation)
    pub fractal_dim: f64,

    /// Fraction of the magnitude weight assigned to the rescaled time term;
    /// the remainder goes to the rescaled distance term
    pub mag_split: f64,

    /// Minimum temporal separation, so same-time events still get a
    /// positive distance
    pub min_time_sep: f64,

    /// Minimum spatial separation, so co-located events still get a
    /// positive distance
    pub min_space_sep: f64,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            b_value: 1.0,
            fractal_dim: 1.6,
            mag_split: 0.5,
            min_time_sep: 1e-6,
            min_space_sep: 1e-6,
        }
    }
}

impl MetricParams {
    /// Create parameters with custom scaling exponents, keeping the default
    /// separation floors
    pub fn new(b_value: f64, fractal_dim: f64, mag_split: f64) -> Self {
        Self {
            b_value,
            fractal_dim,
            mag_split,
            ..Self::default()
        }
    }
}
