//! Coordinate axes of footprint files.
//!
//! Footprint files define a model domain's grid. Only the `lat`, `lon` and
//! `height` coordinate variables are read; the footprint data itself is
//! never touched.

use std::path::Path;

use tracing::debug;

use crate::error::NetCdfResult;
use crate::native::{open, read_f64};

/// Names tried, in order, for each axis.
const LAT_NAMES: &[&str] = &["lat", "latitude"];
const LON_NAMES: &[&str] = &["lon", "longitude"];
const HEIGHT_NAMES: &[&str] = &["height"];

/// Coordinate axes read from a footprint file.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintAxes {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub height: Vec<f64>,
}

/// Read `lat`, `lon` and `height` from a footprint file.
///
/// Axes stored as float or integer variables are converted to `f64`.
pub fn read_footprint_axes<P: AsRef<Path>>(path: P) -> NetCdfResult<FootprintAxes> {
    let path = path.as_ref();
    let file = open(path)?;

    let axes = FootprintAxes {
        lat: read_f64(&file, LAT_NAMES)?,
        lon: read_f64(&file, LON_NAMES)?,
        height: read_f64(&file, HEIGHT_NAMES)?,
    };

    debug!(
        path = %path.display(),
        n_lat = axes.lat.len(),
        n_lon = axes.lon.len(),
        n_height = axes.height.len(),
        "Read footprint axes"
    );
    Ok(axes)
}
