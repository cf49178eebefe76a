//! Common helpers for countrymask integration tests
//!
//! Provides:
//! - Footprint files with known axes, written to temporary directories
//! - The synthetic European domain volume
//! - In-memory boundary layers built from the square fixtures

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use countrymask::{CountryCode, CountryPolygon, DomainVolume, LongitudeConvention, MemoryBoundaries};
use test_utils::{axis_between, domain, SquareCountry, DISTANT_LAND, EUROPE_LAND, EUROPE_OCEAN};

/// Latitude and longitude axes of the synthetic European domain.
pub fn europe_axes() -> (Vec<f64>, Vec<f64>) {
    (
        axis_between(domain::LAT_RANGE.0, domain::LAT_RANGE.1, domain::STEP),
        axis_between(domain::LON_RANGE.0, domain::LON_RANGE.1, domain::STEP),
    )
}

pub fn europe_volume() -> DomainVolume {
    let (lat, lon) = europe_axes();
    DomainVolume::new(
        domain::NAME,
        lat,
        lon,
        domain::HEIGHTS.to_vec(),
        LongitudeConvention::Signed180,
    )
    .expect("fixture axes are valid")
}

/// Grid position of the cell centred on `(lon, lat)` in the European domain.
pub fn europe_cell(lon: f64, lat: f64) -> (usize, usize) {
    let row = ((lat - domain::LAT_RANGE.0) / domain::STEP).round() as usize;
    let col = ((lon - domain::LON_RANGE.0) / domain::STEP).round() as usize;
    (row, col)
}

/// Write a footprint file at `<fp_dir>/<domain>/<file_name>`.
///
/// The file carries the coordinate axes plus a zero-filled `fp` variable,
/// like the transport model's output.
pub fn write_footprint(
    fp_dir: &Path,
    domain: &str,
    file_name: &str,
    lat: &[f64],
    lon: &[f64],
    height: &[f64],
) -> PathBuf {
    let dir = fp_dir.join(domain);
    std::fs::create_dir_all(&dir).expect("create footprint directory");

    let path = dir.join(file_name);
    let mut nc = netcdf::create(&path).expect("create footprint file");
    nc.add_dimension("lat", lat.len()).unwrap();
    nc.add_dimension("lon", lon.len()).unwrap();
    nc.add_dimension("height", height.len()).unwrap();
    nc.add_attribute("title", "FLEXPART footprint").unwrap();

    for (name, values, units) in [
        ("lat", lat, "degrees_north"),
        ("lon", lon, "degrees_east"),
        ("height", height, "m"),
    ] {
        let mut var = nc.add_variable::<f64>(name, &[name]).unwrap();
        var.put_attribute("units", units).unwrap();
        var.put_values(values, ..).unwrap();
    }
    nc.add_variable::<f32>("fp", &["lat", "lon"])
        .unwrap()
        .put_values(&vec![0.0f32; lat.len() * lon.len()], ..)
        .unwrap();

    path
}

/// Write the synthetic European footprint below `fp_dir`.
pub fn write_europe_footprint(fp_dir: &Path) -> PathBuf {
    let (lat, lon) = europe_axes();
    write_footprint(
        fp_dir,
        domain::NAME,
        "EUROPE_201601.nc",
        &lat,
        &lon,
        &domain::HEIGHTS,
    )
}

pub fn square_polygon(square: &SquareCountry) -> CountryPolygon {
    CountryPolygon::from_ring(
        CountryCode::parse(square.code).unwrap(),
        square.name,
        &square.ring(),
    )
    .with_sovereign(
        CountryCode::parse(square.sovereign_code).unwrap(),
        square.sovereign_name,
    )
}

pub fn square_polygons(squares: &[SquareCountry]) -> Vec<CountryPolygon> {
    squares.iter().map(square_polygon).collect()
}

/// Write `squares` as a polygon shapefile at `path` (plus its `.dbf`),
/// using the given attribute names for code, name, sovereign code and
/// sovereign name.
pub fn write_square_shapefile(path: &Path, squares: &[SquareCountry], fields: [&str; 4]) {
    use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};

    let table = fields.iter().fold(TableWriterBuilder::new(), |builder, field| {
        builder.add_character_field(FieldName::try_from(*field).unwrap(), 64)
    });
    let mut writer = shapefile::Writer::from_path(path, table).expect("create shapefile");

    for square in squares {
        let points = square
            .ring()
            .iter()
            .map(|&(x, y)| shapefile::Point::new(x, y))
            .collect();
        let polygon = shapefile::Polygon::new(shapefile::PolygonRing::Outer(points));

        let mut record = Record::default();
        let values = [
            square.code,
            square.name,
            square.sovereign_code,
            square.sovereign_name,
        ];
        for (field, value) in fields.iter().zip(values) {
            record.insert(
                field.to_string(),
                FieldValue::Character(Some(value.to_string())),
            );
        }
        writer
            .write_shape_and_record(&polygon, &record)
            .expect("write shapefile record");
    }
}

/// European land (plus distant countries) and ocean layers.
pub fn europe_boundaries() -> MemoryBoundaries {
    let mut land = square_polygons(&EUROPE_LAND);
    land.extend(square_polygons(&DISTANT_LAND));
    MemoryBoundaries::new(land, square_polygons(&EUROPE_OCEAN))
}
