//! Country mask datasets.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use mask_common::{
    CountryCode, CountryGrid, CountryIndex, CountryTable, DomainVolume, MaskError, MaskResult,
};
use netcdf_parser::{CountryFile, NetCdfError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::with_nc_suffix;

/// Descriptive attributes stored with a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub title: String,
    pub author: String,
    /// Boundary layers the mask was built from
    pub database: String,
    pub date_created: DateTime<Utc>,
}

impl Provenance {
    pub fn new(author: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            title: "Grid of country extent across the domain".to_string(),
            author: author.into(),
            database: database.into(),
            date_created: Utc::now(),
        }
    }

    fn into_attributes(self, domain: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("title".to_string(), self.title),
            ("author".to_string(), self.author),
            ("database".to_string(), self.database),
            (
                "date_created".to_string(),
                self.date_created.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("domain".to_string(), domain.to_string()),
        ])
    }
}

/// A country index grid with its coordinates and lookup table.
///
/// The lookup table holds exactly the countries present in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryMaskDataset {
    pub domain: String,
    pub country: CountryGrid,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub countries: CountryTable,
    /// Global attributes: title, author, database, date_created, domain
    pub attributes: BTreeMap<String, String>,
}

impl CountryMaskDataset {
    pub fn shape(&self) -> (usize, usize) {
        self.country.shape()
    }

    /// Index of `code` in this dataset's lookup table.
    pub fn index_of(&self, code: &str) -> Option<CountryIndex> {
        CountryCode::parse(code).and_then(|c| self.countries.index_of(&c))
    }

    /// Cells owned by `code`; empty when the country is absent.
    pub fn cells_of_code(&self, code: &str) -> BTreeSet<(usize, usize)> {
        self.index_of(code)
            .map(|index| self.country.cells_of(index))
            .unwrap_or_default()
    }

    pub fn country_codes(&self) -> Vec<&str> {
        self.countries.codes()
    }

    pub fn to_country_file(&self) -> MaskResult<CountryFile> {
        let attributes = self
            .attributes
            .iter()
            .filter(|(key, _)| key.as_str() != netcdf_parser::DOMAIN_ATTRIBUTE)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(CountryFile::from_grid(
            &self.domain,
            &self.country,
            &self.lat,
            &self.lon,
            &self.countries,
            attributes,
        )?)
    }

    pub fn from_country_file(file: &CountryFile) -> MaskResult<Self> {
        let mut attributes = file.attributes.clone();
        attributes.insert(
            netcdf_parser::DOMAIN_ATTRIBUTE.to_string(),
            file.domain.clone(),
        );
        Ok(Self {
            domain: file.domain.clone(),
            country: file.to_grid()?,
            lat: file.lat.clone(),
            lon: file.lon.clone(),
            countries: file.to_table()?,
            attributes,
        })
    }

    /// Write the dataset as a NetCDF file, adding `.nc` to `path` if needed.
    ///
    /// Returns the path written.
    pub fn save(&self, path: &Path) -> MaskResult<PathBuf> {
        let path = with_nc_suffix(path);
        self.to_country_file()?
            .write(&path)
            .map_err(|e| match e {
                NetCdfError::IoError(io) => MaskError::Io(io),
                other => MaskError::Persistence(other.to_string()),
            })?;
        info!(domain = %self.domain, path = %path.display(), "Saved country mask");
        Ok(path)
    }
}

/// Build a dataset from a rasterized grid.
///
/// The lookup table is the subset of `reference` present in `grid`. With
/// `reset_index` the present countries are renumbered 1..n in ascending
/// reference order and the grid is remapped to match; otherwise reference
/// indices are kept.
pub fn assemble_dataset(
    volume: &DomainVolume,
    grid: CountryGrid,
    reference: &CountryTable,
    reset_index: bool,
    provenance: Provenance,
) -> MaskResult<CountryMaskDataset> {
    if grid.shape() != volume.shape() {
        return Err(MaskError::ShapeMismatch {
            expected: volume.shape(),
            actual: grid.shape(),
        });
    }

    let present_indices = grid.distinct_indices();
    if let Some(missing) = present_indices.iter().find(|&&i| reference.get(i).is_none()) {
        return Err(MaskError::InvalidConfiguration(format!(
            "grid index {} is not in the reference table",
            missing
        )));
    }
    let present = reference.subset(&present_indices);

    let (country, countries) = if reset_index {
        let (renumbered, mapping) = present.renumbered();
        let grid = grid.remap(|old| mapping.get(&old).copied().unwrap_or(old));
        (grid, renumbered)
    } else {
        (grid, present)
    };

    debug!(
        domain = %volume.domain,
        countries = countries.len(),
        reset_index,
        "Assembled country mask"
    );

    Ok(CountryMaskDataset {
        domain: volume.domain.clone(),
        country,
        lat: volume.lat.clone(),
        lon: volume.lon.clone(),
        countries,
        attributes: provenance.into_attributes(&volume.domain),
    })
}
