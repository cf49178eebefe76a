//! Country mask files.
//!
//! A country file stores one domain's country index grid together with its
//! coordinate axes and the lookup table of countries present in the grid:
//!
//! | variable        | type      | dimensions   |
//! |-----------------|-----------|--------------|
//! | `country`       | NC_INT    | (lat, lon)   |
//! | `lat`           | NC_DOUBLE | (lat)        |
//! | `lon`           | NC_DOUBLE | (lon)        |
//! | `country_index` | NC_INT    | (ncountries) |
//! | `country_code`  | NC_STRING | (ncountries) |
//! | `name`          | NC_STRING | (ncountries) |
//!
//! Files are netCDF-4. Lookup variables are omitted when no country is
//! present, since a zero length would make `ncountries` unlimited.

use std::collections::BTreeMap;
use std::path::Path;

use mask_common::{CountryCode, CountryGrid, CountryIndex, CountryRecord, CountryTable};
use tracing::{debug, info};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{open, read_f64, text_value};

/// Global attribute holding the domain name.
pub const DOMAIN_ATTRIBUTE: &str = "domain";

/// Contents of a country mask file.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFile {
    pub domain: String,
    /// Grid shape as `(n_lat, n_lon)`
    pub shape: (usize, usize),
    /// Country indices, row-major
    pub country: Vec<i32>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub country_index: Vec<i32>,
    pub country_code: Vec<String>,
    pub name: Vec<String>,
    /// Global text attributes (title, author, ...)
    pub attributes: BTreeMap<String, String>,
}

impl CountryFile {
    /// Build file contents from a grid and its lookup table.
    pub fn from_grid(
        domain: &str,
        grid: &CountryGrid,
        lat: &[f64],
        lon: &[f64],
        table: &CountryTable,
        attributes: BTreeMap<String, String>,
    ) -> NetCdfResult<Self> {
        let country = grid
            .as_slice()
            .iter()
            .map(|&v| index_to_i32(v))
            .collect::<NetCdfResult<Vec<_>>>()?;
        let country_index = table
            .iter()
            .map(|r| index_to_i32(r.index))
            .collect::<NetCdfResult<Vec<_>>>()?;

        let file = Self {
            domain: domain.to_string(),
            shape: grid.shape(),
            country,
            lat: lat.to_vec(),
            lon: lon.to_vec(),
            country_index,
            country_code: table.codes().into_iter().map(String::from).collect(),
            name: table.names().into_iter().map(String::from).collect(),
            attributes,
        };
        file.check_consistent()?;
        Ok(file)
    }

    /// The country index grid.
    pub fn to_grid(&self) -> NetCdfResult<CountryGrid> {
        let data = self
            .country
            .iter()
            .map(|&v| {
                CountryIndex::try_from(v).map_err(|_| {
                    NetCdfError::InvalidFormat(format!("negative country index {}", v))
                })
            })
            .collect::<NetCdfResult<Vec<_>>>()?;
        CountryGrid::from_vec(self.shape.0, self.shape.1, data)
            .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))
    }

    /// The lookup table.
    pub fn to_table(&self) -> NetCdfResult<CountryTable> {
        let records = self
            .country_index
            .iter()
            .zip(&self.country_code)
            .zip(&self.name)
            .map(|((&index, code), name)| {
                let index = CountryIndex::try_from(index).map_err(|_| {
                    NetCdfError::InvalidFormat(format!("negative country index {}", index))
                })?;
                let code = CountryCode::parse(code).ok_or_else(|| {
                    NetCdfError::InvalidFormat(format!("invalid country code '{}'", code))
                })?;
                Ok(CountryRecord {
                    index,
                    code,
                    name: name.clone(),
                })
            })
            .collect::<NetCdfResult<Vec<_>>>()?;
        CountryTable::from_records(records).map_err(|e| NetCdfError::InvalidFormat(e.to_string()))
    }

    fn check_consistent(&self) -> NetCdfResult<()> {
        let (n_lat, n_lon) = self.shape;
        if self.country.len() != n_lat * n_lon || self.lat.len() != n_lat || self.lon.len() != n_lon
        {
            return Err(NetCdfError::InvalidFormat(format!(
                "grid {}x{} does not match {} values, {} lat, {} lon",
                n_lat,
                n_lon,
                self.country.len(),
                self.lat.len(),
                self.lon.len()
            )));
        }
        let n = self.country_index.len();
        if self.country_code.len() != n || self.name.len() != n {
            return Err(NetCdfError::InvalidFormat(format!(
                "lookup table lengths differ: {} indices, {} codes, {} names",
                n,
                self.country_code.len(),
                self.name.len()
            )));
        }
        Ok(())
    }

    fn write_nc(&self, path: &Path) -> NetCdfResult<()> {
        let (n_lat, n_lon) = self.shape;

        let mut nc = netcdf::create(path)?;
        nc.add_dimension("lat", n_lat)?;
        nc.add_dimension("lon", n_lon)?;

        {
            let mut var = nc.add_variable::<i32>("country", &["lat", "lon"])?;
            var.put_attribute("long_name", "country index")?;
            var.put_attribute("missing_value_meaning", "0 = no country")?;
            var.put_values(&self.country, ..)?;
        }
        {
            let mut var = nc.add_variable::<f64>("lat", &["lat"])?;
            var.put_attribute("units", "degrees_north")?;
            var.put_values(&self.lat, ..)?;
        }
        {
            let mut var = nc.add_variable::<f64>("lon", &["lon"])?;
            var.put_attribute("units", "degrees_east")?;
            var.put_values(&self.lon, ..)?;
        }

        if !self.country_index.is_empty() {
            nc.add_dimension("ncountries", self.country_index.len())?;
            nc.add_variable::<i32>("country_index", &["ncountries"])?
                .put_values(&self.country_index, ..)?;

            for (name, values) in [("country_code", &self.country_code), ("name", &self.name)] {
                let mut var = nc.add_string_variable(name, &["ncountries"])?;
                for (i, value) in values.iter().enumerate() {
                    var.put_string(value, [i])?;
                }
            }
        }

        for (key, value) in &self.attributes {
            nc.add_attribute(key, value.as_str())?;
        }
        nc.add_attribute(DOMAIN_ATTRIBUTE, self.domain.as_str())?;

        Ok(())
    }

    fn read_nc(nc: &netcdf::File) -> NetCdfResult<Self> {
        let domain = nc
            .attribute(DOMAIN_ATTRIBUTE)
            .and_then(|attr| text_value(&attr))
            .ok_or_else(|| NetCdfError::MissingData("domain attribute".to_string()))?;

        let country_var = nc
            .variable("country")
            .ok_or_else(|| NetCdfError::MissingData("country variable".to_string()))?;
        let shape = match country_var.dimensions() {
            [lat, lon] => (lat.len(), lon.len()),
            other => {
                return Err(NetCdfError::InvalidFormat(format!(
                    "country variable has {} dimensions, expected (lat, lon)",
                    other.len()
                )))
            }
        };

        let (country_index, country_code, name) = match nc.variable("country_index") {
            Some(var) => (
                var.get_values::<i32, _>(..)?,
                read_strings(nc, "country_code")?,
                read_strings(nc, "name")?,
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        let attributes = nc
            .attributes()
            .filter(|attr| attr.name() != DOMAIN_ATTRIBUTE)
            .filter_map(|attr| text_value(&attr).map(|text| (attr.name().to_string(), text)))
            .collect();

        let file = Self {
            domain,
            shape,
            country: country_var.get_values::<i32, _>(..)?,
            lat: read_f64(nc, &["lat"])?,
            lon: read_f64(nc, &["lon"])?,
            country_index,
            country_code,
            name,
            attributes,
        };
        file.check_consistent()?;
        Ok(file)
    }

    /// Write to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> NetCdfResult<()> {
        let path = path.as_ref();
        self.check_consistent()?;

        // Write next to the target and rename into place
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = tempfile::Builder::new()
            .prefix(".country")
            .suffix(".nc")
            .tempfile_in(dir)?
            .into_temp_path();
        self.write_nc(&tmp)?;
        tmp.persist(path).map_err(|e| NetCdfError::IoError(e.error))?;

        info!(
            path = %path.display(),
            domain = %self.domain,
            n_lat = self.shape.0,
            n_lon = self.shape.1,
            countries = self.country_index.len(),
            "Wrote country file"
        );
        Ok(())
    }

    /// Read a country file.
    pub fn read<P: AsRef<Path>>(path: P) -> NetCdfResult<Self> {
        let path = path.as_ref();
        let file = Self::read_nc(&open(path)?)?;
        debug!(path = %path.display(), domain = %file.domain, "Read country file");
        Ok(file)
    }
}

/// Write `contents` to `path`.
pub fn write_country_file<P: AsRef<Path>>(path: P, contents: &CountryFile) -> NetCdfResult<()> {
    contents.write(path)
}

/// Read a country file, checking it was made for `domain`.
pub fn get_country<P: AsRef<Path>>(domain: &str, country_file: P) -> NetCdfResult<CountryFile> {
    let file = CountryFile::read(country_file)?;
    if !file.domain.eq_ignore_ascii_case(domain.trim()) {
        return Err(NetCdfError::InvalidFormat(format!(
            "country file is for domain '{}', not '{}'",
            file.domain, domain
        )));
    }
    Ok(file)
}

fn index_to_i32(index: CountryIndex) -> NetCdfResult<i32> {
    i32::try_from(index)
        .map_err(|_| NetCdfError::InvalidFormat(format!("country index {} exceeds NC_INT", index)))
}

fn read_strings(nc: &netcdf::File, name: &str) -> NetCdfResult<Vec<String>> {
    let var = nc
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;
    let n = var.dimensions().first().map(|d| d.len()).unwrap_or(0);
    (0..n)
        .map(|i| var.get_string([i]).map_err(NetCdfError::from))
        .collect()
}
