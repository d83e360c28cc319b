//! Error types for the declustering pipeline

use thiserror::Error;

/// Errors surfaced by the core declustering stages
#[derive(Debug, Error)]
pub enum DeclusterError {
    /// The input catalog could not be parsed or failed validation
    #[error("malformed catalog input: {0}")]
    MalformedInput(String),

    /// The catalog contained no events at all
    #[error("catalog must contain at least one event")]
    InsufficientData,

    /// Automatic cutoff selection found no bimodal split to cut at
    #[error("cutoff could not be determined: {0}")]
    CutoffUndetermined(String),

    /// A caller-supplied cutoff was negative or non-finite
    #[error("invalid cutoff {0}: must be finite and non-negative")]
    InvalidCutoff(f64),
}
