//! CSV catalog loading

use std::path::Path;

use polars::prelude::*;

use crate::data::{Catalog, Event};
use crate::error::DeclusterError;

/// Load an event catalog from a CSV file
///
/// Expects a header row with `time`, `magnitude`, coordinate columns `x`
/// and `y`, and optionally `z` for 3-D catalogs. Rows may arrive in any
/// order; the catalog is sorted by time with ties keeping file order.
pub fn load_catalog(path: &str) -> Result<Catalog, DeclusterError> {
    log::info!("Reading catalog file: {}", path);

    if !Path::new(path).exists() {
        return Err(DeclusterError::MalformedInput(format!(
            "file not found: {}",
            path
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .and_then(|frame| frame.collect())
        .map_err(|e| DeclusterError::MalformedInput(e.to_string()))?;

    log::info!("Loaded {} catalog rows", df.height());

    if df.height() == 0 {
        return Err(DeclusterError::InsufficientData);
    }

    let time = numeric_column(&df, "time")?;
    let magnitude = numeric_column(&df, "magnitude")?;
    let x = numeric_column(&df, "x")?;
    let y = numeric_column(&df, "y")?;
    let z = if df.column("z").is_ok() {
        Some(numeric_column(&df, "z")?)
    } else {
        None
    };

    let mut events = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut location = vec![x[i], y[i]];
        if let Some(ref depth) = z {
            location.push(depth[i]);
        }
        events.push(Event {
            time: time[i],
            location,
            magnitude: magnitude[i],
        });
    }

    let catalog = Catalog::from_events(events)?;

    log::info!(
        "Catalog holds {} events over {:.3} time units",
        catalog.len(),
        catalog.time_span()
    );

    Ok(catalog)
}

/// Pull a column as f64 values, rejecting missing or non-numeric cells
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, DeclusterError> {
    let series = df
        .column(name)
        .map_err(|_| {
            DeclusterError::MalformedInput(format!("missing required column '{}'", name))
        })?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|_| DeclusterError::MalformedInput(format!("column '{}' is not numeric", name)))?;

    let values = series
        .f64()
        .map_err(|e| DeclusterError::MalformedInput(e.to_string()))?;

    if values.null_count() > 0 {
        return Err(DeclusterError::MalformedInput(format!(
            "column '{}' contains missing or non-numeric values",
            name
        )));
    }

    Ok(values.into_no_null_iter().collect())
}
