//! Land and ocean mask combination.

use mask_common::{CountryGrid, CountryTable, DomainVolume, MaskError, MaskResult, NO_COUNTRY};
use tracing::{info, instrument};

use crate::boundaries::{
    apply_territory_policy, filter_countries, reference_table, BoundaryLayer, BoundarySource,
    CountryPolygon,
};
use crate::config::MaskOptions;
use crate::dataset::{assemble_dataset, CountryMaskDataset, Provenance};
use crate::domain::domain_volume;
use crate::fill::mask_fill_gaps;
use crate::raster::{locator_for, rasterize_layer};

/// Union of two grids; land wins where both have a country.
pub fn combine_layers(land: &CountryGrid, ocean: &CountryGrid) -> MaskResult<CountryGrid> {
    if land.shape() != ocean.shape() {
        return Err(MaskError::ShapeMismatch {
            expected: land.shape(),
            actual: ocean.shape(),
        });
    }

    let data = land
        .as_slice()
        .iter()
        .zip(ocean.as_slice())
        .map(|(&l, &o)| if l != NO_COUNTRY { l } else { o })
        .collect();
    CountryGrid::from_vec(land.n_lat(), land.n_lon(), data)
}

/// Build the country mask of a named domain.
///
/// The domain grid is read from the footprint files under
/// `options.fp_directory`; boundaries come from `source`.
pub fn create_country_mask_eez(
    domain: &str,
    options: &MaskOptions,
    source: &dyn BoundarySource,
) -> MaskResult<CountryMaskDataset> {
    options.validate()?;
    let volume = domain_volume(domain, options.fp_directory.as_deref())?;
    build_country_mask(&volume, options, source)
}

/// Build a country mask over an already resolved domain volume.
///
/// Both boundary layers are loaded so that the reference table, and with it
/// every country index, is the same whichever layers are rasterized.
pub fn build_country_mask(
    volume: &DomainVolume,
    options: &MaskOptions,
    source: &dyn BoundarySource,
) -> MaskResult<CountryMaskDataset> {
    options.validate()?;

    let land = apply_territory_policy(source.load(BoundaryLayer::Land)?, options.territory_policy);
    let ocean = apply_territory_policy(
        source.load(BoundaryLayer::Ocean)?,
        options.territory_policy,
    );
    let reference = reference_table(&land, &ocean);

    mask_from_layers(
        volume,
        options,
        &land,
        &ocean,
        &reference,
        Provenance::new(options.author_name(), source.description()),
    )
}

/// Build a country mask from loaded layers and an explicit reference table.
#[instrument(skip_all, fields(domain = %volume.domain))]
pub fn mask_from_layers(
    volume: &DomainVolume,
    options: &MaskOptions,
    land: &[CountryPolygon],
    ocean: &[CountryPolygon],
    reference: &CountryTable,
    provenance: Provenance,
) -> MaskResult<CountryMaskDataset> {
    options.validate()?;

    let (land, ocean) = match options.country_filter()? {
        Some(codes) => (
            filter_countries(land.to_vec(), &codes, reference)?,
            filter_countries(ocean.to_vec(), &codes, reference)?,
        ),
        None => (land.to_vec(), ocean.to_vec()),
    };

    let locator = locator_for(options.raster_mode);
    let land_grid = options
        .include_land_territories
        .then(|| rasterize_layer(volume, &land, reference, locator.as_ref()).grid);
    let ocean_grid = options
        .include_ocean_territories
        .then(|| rasterize_layer(volume, &ocean, reference, locator.as_ref()).grid);

    let grid = match (land_grid, ocean_grid) {
        (Some(land), Some(ocean)) => combine_layers(&land, &ocean)?,
        (Some(grid), None) | (None, Some(grid)) => grid,
        (None, None) => {
            return Err(MaskError::InvalidConfiguration(
                "no boundary layer selected".to_string(),
            ))
        }
    };

    let grid = if options.fill_gaps {
        mask_fill_gaps(&grid)
    } else {
        grid
    };

    let dataset = assemble_dataset(volume, grid, reference, options.reset_index, provenance)?;

    info!(
        land = options.include_land_territories,
        ocean = options.include_ocean_territories,
        fill_gaps = options.fill_gaps,
        countries = dataset.countries.len(),
        "Created country mask"
    );

    if options.save {
        let output = options.output_path.as_deref().ok_or_else(|| {
            MaskError::InvalidConfiguration("save requested without an output_path".to_string())
        })?;
        dataset.save(output)?;
    }

    Ok(dataset)
}
