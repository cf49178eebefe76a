//! NetCDF reading and writing for country masks.
//!
//! This crate provides:
//! - Footprint coordinate reading ([`read_footprint_axes`])
//! - Country mask files ([`CountryFile`], [`get_country`])
//!
//! All files go through libnetcdf, so both classic and netCDF-4/HDF5
//! footprints are readable. System requirements: `libhdf5-dev` and
//! `libnetcdf-dev`.

pub mod country_file;
pub mod error;
pub mod footprint;
pub mod native;

pub use country_file::{get_country, write_country_file, CountryFile, DOMAIN_ATTRIBUTE};
pub use error::{NetCdfError, NetCdfResult};
pub use footprint::{read_footprint_axes, FootprintAxes};
pub use native::silence_hdf5_errors;
