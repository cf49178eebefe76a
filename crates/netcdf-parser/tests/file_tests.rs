//! Integration tests: write country and footprint files to disk and read
//! them back.

use std::collections::BTreeMap;

use netcdf_parser::{get_country, read_footprint_axes, write_country_file, CountryFile, NetCdfError};
use test_utils::{regular_axis, require_test_file, temp_test_dir};

fn europe_file() -> CountryFile {
    CountryFile {
        domain: "EUROPE".to_string(),
        shape: (2, 3),
        country: vec![0, 1, 1, 2, 2, 0],
        lat: vec![50.5, 51.5],
        lon: vec![-1.5, -0.5, 0.5],
        country_index: vec![1, 2],
        country_code: vec!["FRA".to_string(), "GBR".to_string()],
        name: vec!["France".to_string(), "United Kingdom".to_string()],
        attributes: BTreeMap::from([
            ("author".to_string(), "tester".to_string()),
            ("title".to_string(), "Grid of country extent across the domain".to_string()),
        ]),
    }
}

#[test]
fn test_country_file_on_disk() {
    let dir = temp_test_dir();
    let path = dir.path().join("country_EUROPE.nc");
    let file = europe_file();

    write_country_file(&path, &file).unwrap();
    let read = get_country("EUROPE", &path).unwrap();
    assert_eq!(read, file);

    // netCDF-4 files are HDF5 containers
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89HDF\r\n\x1a\n");
}

#[test]
fn test_country_file_overwrite() {
    let dir = temp_test_dir();
    let path = dir.path().join("country.nc");

    write_country_file(&path, &europe_file()).unwrap();
    let smaller = CountryFile {
        country: vec![0; 6],
        country_index: vec![],
        country_code: vec![],
        name: vec![],
        ..europe_file()
    };
    write_country_file(&path, &smaller).unwrap();

    assert_eq!(get_country("EUROPE", &path).unwrap(), smaller);
}

#[test]
fn test_get_country_domain_mismatch() {
    let dir = temp_test_dir();
    let path = dir.path().join("country.nc");
    write_country_file(&path, &europe_file()).unwrap();

    assert!(get_country("europe", &path).is_ok());
    assert!(matches!(
        get_country("ARCTIC", &path),
        Err(NetCdfError::InvalidFormat(_))
    ));
}

#[test]
fn test_footprint_axes_on_disk() {
    let dir = temp_test_dir();
    let path = dir.path().join("fp.nc");
    let lat = regular_axis(30.5, 0.25, 12);
    let lon = regular_axis(-10.0, 0.375, 20);

    {
        let mut nc = netcdf::create(&path).unwrap();
        nc.add_dimension("lat", lat.len()).unwrap();
        nc.add_dimension("lon", lon.len()).unwrap();
        nc.add_dimension("height", 2).unwrap();
        nc.add_variable::<f64>("lat", &["lat"])
            .unwrap()
            .put_values(&lat, ..)
            .unwrap();
        let lon_f32: Vec<f32> = lon.iter().map(|&v| v as f32).collect();
        nc.add_variable::<f32>("lon", &["lon"])
            .unwrap()
            .put_values(&lon_f32, ..)
            .unwrap();
        nc.add_variable::<i32>("height", &["height"])
            .unwrap()
            .put_values(&[40, 500], ..)
            .unwrap();
        nc.add_variable::<f32>("fp", &["lat", "lon"])
            .unwrap()
            .put_values(&vec![1.0e-3f32; lat.len() * lon.len()], ..)
            .unwrap();
    }

    let axes = read_footprint_axes(&path).unwrap();
    assert_eq!(axes.lat, lat);
    // Multiples of 1/8 are exact in f32
    assert_eq!(axes.lon, lon);
    assert_eq!(axes.height, vec![40.0, 500.0]);
}

#[test]
fn test_non_netcdf_file_is_rejected() {
    let dir = temp_test_dir();
    let path = dir.path().join("fp.nc");
    std::fs::write(&path, "lat,lon\n50.5,-1.5\n").unwrap();

    assert!(matches!(
        read_footprint_axes(&path),
        Err(NetCdfError::Library(_))
    ));
    assert!(matches!(
        get_country("EUROPE", &path),
        Err(NetCdfError::Library(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = temp_test_dir();
    let result = read_footprint_axes(dir.path().join("absent.nc"));
    assert!(matches!(result, Err(NetCdfError::IoError(_))));
}

#[test]
fn test_real_footprint_file() {
    let path = require_test_file!("EUROPE_footprint.nc");

    let axes = read_footprint_axes(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));

    assert!(axes.lat.len() > 1);
    assert!(axes.lon.len() > 1);
    assert!(!axes.height.is_empty());
}
