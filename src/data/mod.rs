//! Event catalog types and loading

pub mod catalog;

use serde::{Deserialize, Serialize};

use crate::error::DeclusterError;

/// A single timestamped, located, magnitude-bearing occurrence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Occurrence time, in the catalog's time units
    pub time: f64,

    /// Spatial coordinates in a Euclidean frame (2-D or 3-D in practice)
    pub location: Vec<f64>,

    /// Event magnitude
    pub magnitude: f64,
}

/// A time-sorted sequence of events
///
/// Events are identified by their index in sorted order. Ties in time keep
/// their original input order, so identification is deterministic.
#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Validate and sort a batch of events into a catalog
    ///
    /// Fails on an empty batch, non-finite field values, or events with
    /// inconsistent location dimensions.
    pub fn from_events(mut events: Vec<Event>) -> Result<Self, DeclusterError> {
        if events.is_empty() {
            return Err(DeclusterError::InsufficientData);
        }

        let dim = events[0].location.len();
        if dim == 0 {
            return Err(DeclusterError::MalformedInput(
                "events must carry at least one spatial coordinate".to_string(),
            ));
        }

        for (i, event) in events.iter().enumerate() {
            if !event.time.is_finite() || !event.magnitude.is_finite() {
                return Err(DeclusterError::MalformedInput(format!(
                    "event {} has a non-finite time or magnitude",
                    i
                )));
            }
            if event.location.len() != dim {
                return Err(DeclusterError::MalformedInput(format!(
                    "event {} has {} coordinates, expected {}",
                    i,
                    event.location.len(),
                    dim
                )));
            }
            if event.location.iter().any(|c| !c.is_finite()) {
                return Err(DeclusterError::MalformedInput(format!(
                    "event {} has a non-finite coordinate",
                    i
                )));
            }
        }

        // Stable sort: equal times keep input order
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        Ok(Self { events })
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the catalog holds no events (never true for a constructed
    /// catalog, but kept for API completeness)
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at the given time-sorted index
    pub fn event(&self, index: usize) -> &Event {
        &self.events[index]
    }

    /// Iterate events in time order
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Dimension of the location coordinates
    pub fn dim(&self) -> usize {
        self.events[0].location.len()
    }

    /// Time covered from first to last event
    pub fn time_span(&self) -> f64 {
        self.events[self.events.len() - 1].time - self.events[0].time
    }
}
