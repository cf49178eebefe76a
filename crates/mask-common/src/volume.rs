//! Domain coordinate volumes and longitude conventions.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{MaskError, MaskResult};

/// Longitude range used by a domain's coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LongitudeConvention {
    /// Longitudes in [-180, 180).
    #[default]
    #[serde(rename = "signed_180")]
    Signed180,
    /// Longitudes in [0, 360).
    #[serde(rename = "unsigned_360")]
    Unsigned360,
}

impl LongitudeConvention {
    /// Express `lon` in this convention.
    pub fn normalize(&self, lon: f64) -> f64 {
        match self {
            LongitudeConvention::Signed180 => to_signed_lon(lon),
            LongitudeConvention::Unsigned360 => {
                let wrapped = lon.rem_euclid(360.0);
                // rem_euclid can round up to exactly 360 for tiny negatives
                if wrapped >= 360.0 {
                    0.0
                } else {
                    wrapped
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LongitudeConvention::Signed180 => "signed_180",
            LongitudeConvention::Unsigned360 => "unsigned_360",
        }
    }
}

impl std::fmt::Display for LongitudeConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a longitude into [-180, 180).
pub fn to_signed_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

/// Convert longitudes mixing [-180, 180) and [0, 360) into [0, 360).
///
/// Negative values get 360 added, everything else is returned unchanged.
/// The output is index-aligned with the input.
pub fn convert_lons_0360(lons: &[f64]) -> Vec<f64> {
    lons.iter()
        .map(|&lon| {
            if lon >= 0.0 {
                return lon;
            }
            // Tiny negatives round up to exactly 360
            let shifted = lon + 360.0;
            if shifted >= 360.0 {
                0.0
            } else {
                shifted
            }
        })
        .collect()
}

/// Coordinate axes of a model domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainVolume {
    /// Domain name (e.g. "EUROPE")
    pub domain: String,
    /// Cell-centre latitudes, strictly monotonic
    pub lat: Vec<f64>,
    /// Cell-centre longitudes
    pub lon: Vec<f64>,
    /// Release height levels
    pub height: Vec<f64>,
    /// Convention the `lon` axis is expressed in
    pub convention: LongitudeConvention,
}

impl DomainVolume {
    /// Build a volume, checking the axes are usable as a grid.
    pub fn new(
        domain: impl Into<String>,
        lat: Vec<f64>,
        lon: Vec<f64>,
        height: Vec<f64>,
        convention: LongitudeConvention,
    ) -> MaskResult<Self> {
        let domain = domain.into();

        if lat.is_empty() || lon.is_empty() || height.is_empty() {
            return Err(MaskError::InvalidCoordinates(format!(
                "{}: empty axis (lat={}, lon={}, height={})",
                domain,
                lat.len(),
                lon.len(),
                height.len()
            )));
        }
        if lat.iter().chain(&lon).chain(&height).any(|v| !v.is_finite()) {
            return Err(MaskError::InvalidCoordinates(format!(
                "{}: non-finite coordinate value",
                domain
            )));
        }
        if !strictly_monotonic(&lat) {
            return Err(MaskError::InvalidCoordinates(format!(
                "{}: latitudes are not strictly monotonic",
                domain
            )));
        }
        if lat.iter().any(|v| v.abs() > 90.0) {
            return Err(MaskError::InvalidCoordinates(format!(
                "{}: latitude outside [-90, 90]",
                domain
            )));
        }

        Ok(Self {
            domain,
            lat,
            lon,
            height,
            convention,
        })
    }

    /// Grid shape as `(n_lat, n_lon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len(), self.lon.len())
    }

    /// Re-express the longitude axis in `convention`.
    ///
    /// Conversion to [`LongitudeConvention::Unsigned360`] goes through
    /// [`convert_lons_0360`].
    pub fn with_convention(mut self, convention: LongitudeConvention) -> Self {
        if convention != self.convention {
            self.lon = match convention {
                LongitudeConvention::Unsigned360 => convert_lons_0360(&self.lon),
                LongitudeConvention::Signed180 => {
                    self.lon.iter().map(|&lon| to_signed_lon(lon)).collect()
                }
            };
            self.convention = convention;
        }
        self
    }

    /// Centre of cell `(row, col)` as `(lon, lat)`.
    pub fn cell_centre(&self, row: usize, col: usize) -> (f64, f64) {
        (self.lon[col], self.lat[row])
    }

    /// Bounds of cell `(row, col)`, half way to the neighbouring centres.
    pub fn cell_bounds(&self, row: usize, col: usize) -> BoundingBox {
        let (lat_lo, lat_hi) = axis_bounds(&self.lat, row, |a, b| b - a);
        let (lon_lo, lon_hi) = axis_bounds(&self.lon, col, wrapped_delta);
        BoundingBox::new(lon_lo, lat_lo.max(-90.0), lon_hi, lat_hi.min(90.0))
    }

    /// Extent of all cell centres.
    pub fn bbox(&self) -> BoundingBox {
        let (min_lat, max_lat) = min_max(&self.lat);
        let (min_lon, max_lon) = min_max(&self.lon);
        BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
    }
}

fn strictly_monotonic(values: &[f64]) -> bool {
    let increasing = values.windows(2).all(|w| w[1] > w[0]);
    let decreasing = values.windows(2).all(|w| w[1] < w[0]);
    increasing || decreasing
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Longitude difference wrapped into (-180, 180].
fn wrapped_delta(a: f64, b: f64) -> f64 {
    let d = (b - a).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Lower/upper edge of the cell around `values[i]`.
fn axis_bounds(values: &[f64], i: usize, delta: impl Fn(f64, f64) -> f64) -> (f64, f64) {
    let centre = values[i];
    let before = if i > 0 {
        delta(values[i - 1], centre)
    } else if values.len() > 1 {
        delta(centre, values[1])
    } else {
        0.0
    };
    let after = if i + 1 < values.len() {
        delta(centre, values[i + 1])
    } else {
        before
    };

    let a = centre - before / 2.0;
    let b = centre + after / 2.0;
    (a.min(b), a.max(b))
}
