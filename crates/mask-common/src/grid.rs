//! Country index grids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};

/// Index of a country in a country lookup table.
pub type CountryIndex = u32;

/// Sentinel for cells that belong to no country.
///
/// Never used as the index of a real country.
pub const NO_COUNTRY: CountryIndex = 0;

/// A 2-D grid of country indices, shape `(n_lat, n_lon)`.
///
/// Data is stored row-major: row `i` holds latitude `lat[i]`, column `j`
/// longitude `lon[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryGrid {
    n_lat: usize,
    n_lon: usize,
    data: Vec<CountryIndex>,
}

impl CountryGrid {
    /// Create a grid with every cell unset.
    pub fn new(n_lat: usize, n_lon: usize) -> Self {
        Self {
            n_lat,
            n_lon,
            data: vec![NO_COUNTRY; n_lat * n_lon],
        }
    }

    /// Wrap row-major data, checking it matches the shape.
    pub fn from_vec(n_lat: usize, n_lon: usize, data: Vec<CountryIndex>) -> MaskResult<Self> {
        if data.len() != n_lat * n_lon {
            return Err(MaskError::ShapeMismatch {
                expected: (n_lat, n_lon),
                actual: (data.len() / n_lon.max(1), n_lon),
            });
        }
        Ok(Self { n_lat, n_lon, data })
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[CountryIndex]>>(rows: &[R]) -> MaskResult<Self> {
        let n_lat = rows.len();
        let n_lon = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n_lat * n_lon);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_lon {
                return Err(MaskError::ShapeMismatch {
                    expected: (n_lat, n_lon),
                    actual: (n_lat, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n_lat, n_lon, data })
    }

    /// Grid shape as `(n_lat, n_lon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_lat, self.n_lon)
    }

    pub fn n_lat(&self) -> usize {
        self.n_lat
    }

    pub fn n_lon(&self) -> usize {
        self.n_lon
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<CountryIndex> {
        if row >= self.n_lat || col >= self.n_lon {
            return None;
        }
        self.data.get(row * self.n_lon + col).copied()
    }

    /// Set the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the grid.
    pub fn set(&mut self, row: usize, col: usize, value: CountryIndex) {
        assert!(
            row < self.n_lat && col < self.n_lon,
            "cell ({}, {}) outside grid {:?}",
            row,
            col,
            self.shape()
        );
        self.data[row * self.n_lon + col] = value;
    }

    /// True if the cell holds the sentinel.
    pub fn is_unset(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(NO_COUNTRY)
    }

    pub fn as_slice(&self) -> &[CountryIndex] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [CountryIndex] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<CountryIndex> {
        self.data
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[CountryIndex]> {
        self.data.chunks(self.n_lon.max(1))
    }

    /// Copy out the grid as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<CountryIndex>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// Number of cells holding `value`.
    pub fn count(&self, value: CountryIndex) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }

    /// Positions `(row, col)` of every cell holding `value`.
    pub fn cells_of(&self, value: CountryIndex) -> BTreeSet<(usize, usize)> {
        let n_lon = self.n_lon;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == value)
            .map(|(k, _)| (k / n_lon, k % n_lon))
            .collect()
    }

    /// Distinct country indices present, sentinel excluded.
    pub fn distinct_indices(&self) -> BTreeSet<CountryIndex> {
        self.data
            .iter()
            .copied()
            .filter(|&v| v != NO_COUNTRY)
            .collect()
    }

    /// Apply `f` to every assigned cell; unset cells stay unset.
    pub fn remap<F>(&self, f: F) -> CountryGrid
    where
        F: Fn(CountryIndex) -> CountryIndex,
    {
        CountryGrid {
            n_lat: self.n_lat,
            n_lon: self.n_lon,
            data: self
                .data
                .iter()
                .map(|&v| if v == NO_COUNTRY { v } else { f(v) })
                .collect(),
        }
    }
}
