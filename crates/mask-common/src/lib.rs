//! Common types shared by the country mask crates.

pub mod bbox;
pub mod country;
pub mod error;
pub mod grid;
pub mod volume;

pub use bbox::BoundingBox;
pub use country::{CountryCode, CountryRecord, CountryTable};
pub use error::{MaskError, MaskResult};
pub use grid::{CountryGrid, CountryIndex, NO_COUNTRY};
pub use volume::{convert_lons_0360, DomainVolume, LongitudeConvention};
