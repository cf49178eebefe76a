//! Shared helpers around the netcdf library.

use std::path::Path;
use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// HDF5 prints diagnostics even for errors the caller handles, e.g. when
/// probing for a variable that does not exist. Safe to call repeatedly.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable automatic error printing.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a file for reading.
///
/// A missing file is reported as an I/O error rather than a library error.
pub(crate) fn open(path: &Path) -> NetCdfResult<netcdf::File> {
    silence_hdf5_errors();
    std::fs::metadata(path)?;
    Ok(netcdf::open(path)?)
}

/// Values of the first variable found under one of `names`, as `f64`.
pub(crate) fn read_f64(file: &netcdf::File, names: &[&str]) -> NetCdfResult<Vec<f64>> {
    let var = names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", names[0])))?;

    var.get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", names[0], e)))
}

/// Text value of an attribute, `None` for non-text attributes.
pub(crate) fn text_value(attr: &netcdf::Attribute) -> Option<String> {
    match attr.value().ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
