//! Country masks for atmospheric transport model domains.
//!
//! Rasterizes national land territories and exclusive economic zones onto a
//! domain's lat/lon grid, producing an integer grid whose values identify
//! the owning country plus a lookup table of the countries present.
//!
//! # Pipeline
//!
//! ```text
//! domain name ──► DomainRegistry ──► footprint file ──► DomainVolume
//!                                                          │
//! BoundarySource ──► land / ocean polygons ──► rasterize_layer (per layer)
//!                                                          │
//!                               combine_layers (land wins) ┘
//!                                                          │
//!                                         mask_fill_gaps (optional)
//!                                                          │
//!                          assemble_dataset ──► CountryMaskDataset ──► .nc
//! ```
//!
//! # Example
//!
//! ```ignore
//! use countrymask::{create_country_mask_eez, DataPaths, MaskOptions, ShapefileBoundaries};
//!
//! let paths = DataPaths::from_env();
//! let source = ShapefileBoundaries::from_data_paths(&paths);
//! let options = MaskOptions {
//!     reset_index: true,
//!     save: true,
//!     output_path: Some("country_EUROPE".into()),
//!     ..MaskOptions::default()
//! };
//! let dataset = create_country_mask_eez("EUROPE", &options, &source)?;
//! println!("{} countries", dataset.countries.len());
//! ```

pub mod boundaries;
pub mod combine;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod fill;
pub mod raster;

use std::path::Path;

// Re-export commonly used types at crate root
pub use boundaries::{
    boundary_source, reference_table, BoundaryLayer, BoundarySource, CountryPolygon,
    GeoJsonBoundaries, LayerSchema, MemoryBoundaries, ShapefileBoundaries,
};
pub use combine::{build_country_mask, combine_layers, create_country_mask_eez, mask_from_layers};
pub use config::{DataPaths, MaskOptions, RasterMode, TerritoryPolicy};
pub use dataset::{assemble_dataset, CountryMaskDataset, Provenance};
pub use domain::{domain_volume, DomainName, DomainRegistry, DomainSpec};
pub use fill::mask_fill_gaps;
pub use mask_common::{
    convert_lons_0360, CountryCode, CountryGrid, CountryIndex, CountryTable, DomainVolume,
    LongitudeConvention, MaskError, MaskResult, NO_COUNTRY,
};
pub use netcdf_parser::{silence_hdf5_errors, CountryFile};
pub use raster::{
    rasterize_layer, AllTouchedLocator, CellLocator, CentrePointLocator, GridCell, RasterLayer,
};

/// Read a saved country mask, checking it belongs to `domain`.
pub fn get_country<P: AsRef<Path>>(domain: &str, country_file: P) -> MaskResult<CountryFile> {
    DomainName::parse(domain)?;
    Ok(netcdf_parser::get_country(domain, country_file)?)
}
