//! Polygon rasterization onto domain grids.
//!
//! Each cell is owned by at most one country. Countries are tried in
//! ascending reference index and the first one with an overlapping polygon
//! wins, so the result never depends on file order or thread scheduling.

use geo::{Coord, Intersects, Point, Rect};
use mask_common::volume::to_signed_lon;
use mask_common::{BoundingBox, CountryGrid, CountryIndex, CountryTable, DomainVolume, NO_COUNTRY};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::boundaries::CountryPolygon;
use crate::config::RasterMode;

/// A grid cell expressed in [-180, 180) longitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    /// Centre longitude
    pub lon: f64,
    /// Centre latitude
    pub lat: f64,
    /// Cell rectangle; two parts when the cell straddles the antimeridian
    pub parts: Vec<BoundingBox>,
}

impl GridCell {
    pub fn new(volume: &DomainVolume, row: usize, col: usize) -> Self {
        let (lon, lat) = volume.cell_centre(row, col);
        let bounds = volume.cell_bounds(row, col);

        let west = to_signed_lon(bounds.min_lon);
        let east = west + bounds.width();
        let parts = if east <= 180.0 {
            vec![BoundingBox::new(west, bounds.min_lat, east, bounds.max_lat)]
        } else {
            vec![
                BoundingBox::new(west, bounds.min_lat, 180.0, bounds.max_lat),
                BoundingBox::new(-180.0, bounds.min_lat, east - 360.0, bounds.max_lat),
            ]
        };

        Self {
            row,
            col,
            lon: to_signed_lon(lon),
            lat,
            parts,
        }
    }

    /// Whether `bbox` could touch this cell.
    pub fn may_touch(&self, bbox: &BoundingBox) -> bool {
        self.parts.iter().any(|part| part.intersects(bbox))
    }
}

/// Decides whether a cell belongs to a polygon.
pub trait CellLocator: Send + Sync {
    fn overlaps(&self, cell: &GridCell, polygon: &CountryPolygon) -> bool;
}

/// Cell centre inside the polygon or on its boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentrePointLocator;

impl CellLocator for CentrePointLocator {
    fn overlaps(&self, cell: &GridCell, polygon: &CountryPolygon) -> bool {
        polygon.geometry.intersects(&Point::new(cell.lon, cell.lat))
    }
}

/// Any part of the cell rectangle touches the polygon.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllTouchedLocator;

impl CellLocator for AllTouchedLocator {
    fn overlaps(&self, cell: &GridCell, polygon: &CountryPolygon) -> bool {
        cell.parts.iter().any(|b| {
            let rect = Rect::new(
                Coord { x: b.min_lon, y: b.min_lat },
                Coord { x: b.max_lon, y: b.max_lat },
            );
            polygon.geometry.intersects(&rect)
        })
    }
}

/// Locator implementing `mode`.
pub fn locator_for(mode: RasterMode) -> Box<dyn CellLocator> {
    match mode {
        RasterMode::CellCentre => Box::new(CentrePointLocator),
        RasterMode::AllTouched => Box::new(AllTouchedLocator),
    }
}

/// One rasterized boundary layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    /// Reference indices, `NO_COUNTRY` where nothing overlaps
    pub grid: CountryGrid,
    /// Reference records of the countries present in `grid`
    pub present: CountryTable,
}

struct Candidate<'a> {
    index: CountryIndex,
    bbox: BoundingBox,
    polygon: &'a CountryPolygon,
}

/// Rasterize `polygons` onto the grid of `volume`.
///
/// Cells receive the reference index of the first country (ascending
/// index) with a polygon overlapping them according to `locator`.
/// Polygons whose code is not in `reference` are skipped.
pub fn rasterize_layer(
    volume: &DomainVolume,
    polygons: &[CountryPolygon],
    reference: &CountryTable,
    locator: &dyn CellLocator,
) -> RasterLayer {
    let (n_lat, n_lon) = volume.shape();

    let mut candidates = Vec::with_capacity(polygons.len());
    let mut unknown = 0usize;
    for polygon in polygons {
        let Some(index) = reference.index_of(&polygon.code) else {
            unknown += 1;
            continue;
        };
        if let Some(bbox) = polygon.bbox() {
            candidates.push(Candidate {
                index,
                bbox,
                polygon,
            });
        }
    }
    if unknown > 0 {
        warn!(skipped = unknown, "Polygons with codes missing from the reference table");
    }
    // Stable sort keeps file order among a country's parts
    candidates.sort_by_key(|c| c.index);

    let mut grid = CountryGrid::new(n_lat, n_lon);
    grid.as_mut_slice()
        .par_chunks_mut(n_lon)
        .enumerate()
        .for_each(|(row, cells)| {
            let row_bounds = volume.cell_bounds(row, 0);
            let row_candidates: Vec<&Candidate> = candidates
                .iter()
                .filter(|c| {
                    c.bbox.max_lat >= row_bounds.min_lat && c.bbox.min_lat <= row_bounds.max_lat
                })
                .collect();
            if row_candidates.is_empty() {
                return;
            }

            for (col, value) in cells.iter_mut().enumerate() {
                let cell = GridCell::new(volume, row, col);
                *value = row_candidates
                    .iter()
                    .find(|c| cell.may_touch(&c.bbox) && locator.overlaps(&cell, c.polygon))
                    .map(|c| c.index)
                    .unwrap_or(NO_COUNTRY);
            }
        });

    let present = reference.subset(&grid.distinct_indices());

    debug!(
        polygons = candidates.len(),
        n_lat,
        n_lon,
        "Rasterized polygons"
    );
    info!(
        domain = %volume.domain,
        assigned = grid.len() - grid.count(NO_COUNTRY),
        countries = present.len(),
        "Rasterized boundary layer"
    );

    RasterLayer { grid, present }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_common::{CountryCode, LongitudeConvention};

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn square(c: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> CountryPolygon {
        CountryPolygon::from_ring(
            code(c),
            c,
            &[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)],
        )
    }

    /// 4x4 grid of 1 degree cells, centres at 0.5..3.5.
    fn small_volume() -> DomainVolume {
        let axis = vec![0.5, 1.5, 2.5, 3.5];
        DomainVolume::new(
            "TEST",
            axis.clone(),
            axis,
            vec![0.0],
            LongitudeConvention::Signed180,
        )
        .unwrap()
    }

    fn table(codes: &[&str]) -> CountryTable {
        CountryTable::reference(codes.iter().map(|c| (code(c), c.to_string())))
    }

    #[test]
    fn test_centre_point_rasterization() {
        let polygons = vec![square("AAA", 0.0, 0.0, 2.0, 2.0)];
        let layer = rasterize_layer(
            &small_volume(),
            &polygons,
            &table(&["AAA"]),
            &CentrePointLocator,
        );

        assert_eq!(
            layer.grid.to_rows(),
            vec![
                vec![1, 1, 0, 0],
                vec![1, 1, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ]
        );
        assert_eq!(layer.present.codes(), vec!["AAA"]);
    }

    #[test]
    fn test_all_touched_covers_partial_cells() {
        let polygons = vec![square("AAA", 1.2, 1.2, 1.8, 1.8)];
        let reference = table(&["AAA"]);

        let centre = rasterize_layer(&small_volume(), &polygons, &reference, &CentrePointLocator);
        assert_eq!(centre.grid.count(1), 1);

        let touched = rasterize_layer(&small_volume(), &polygons, &reference, &AllTouchedLocator);
        assert_eq!(touched.grid.count(1), 1);
        assert_eq!(touched.grid.get(1, 1), Some(1));

        let off_centre = vec![square("AAA", 0.6, 0.6, 0.9, 0.9)];
        let centre = rasterize_layer(&small_volume(), &off_centre, &reference, &CentrePointLocator);
        assert!(centre.present.is_empty());
        let touched = rasterize_layer(&small_volume(), &off_centre, &reference, &AllTouchedLocator);
        assert_eq!(touched.grid.get(0, 0), Some(1));
    }

    #[test]
    fn test_lowest_index_wins_overlap() {
        // BBB listed first but AAA has the lower reference index
        let polygons = vec![
            square("BBB", 0.0, 0.0, 4.0, 4.0),
            square("AAA", 0.0, 0.0, 1.0, 1.0),
        ];
        let layer = rasterize_layer(
            &small_volume(),
            &polygons,
            &table(&["AAA", "BBB"]),
            &CentrePointLocator,
        );
        assert_eq!(layer.grid.get(0, 0), Some(1));
        assert_eq!(layer.grid.count(2), 15);
    }

    #[test]
    fn test_unknown_codes_skipped() {
        let polygons = vec![square("ZZZ", 0.0, 0.0, 4.0, 4.0)];
        let layer = rasterize_layer(
            &small_volume(),
            &polygons,
            &table(&["AAA"]),
            &CentrePointLocator,
        );
        assert_eq!(layer.grid.count(NO_COUNTRY), 16);
        assert!(layer.present.is_empty());
    }

    #[test]
    fn test_multi_part_country_single_index() {
        let polygons = vec![
            square("AAA", 0.0, 0.0, 1.0, 1.0),
            square("AAA", 3.0, 3.0, 4.0, 4.0),
        ];
        let layer = rasterize_layer(
            &small_volume(),
            &polygons,
            &table(&["AAA"]),
            &CentrePointLocator,
        );
        assert_eq!(layer.grid.cells_of(1).len(), 2);
        assert_eq!(layer.present.len(), 1);
    }

    #[test]
    fn test_unsigned_grid_across_antimeridian() {
        let volume = DomainVolume::new(
            "PACIFIC",
            vec![0.5, 1.5],
            vec![178.5, 179.5, 180.5, 181.5],
            vec![0.0],
            LongitudeConvention::Unsigned360,
        )
        .unwrap();
        // East of the antimeridian, in signed longitudes
        let polygons = vec![square("AAA", -180.0, 0.0, -178.0, 2.0)];
        let layer = rasterize_layer(&volume, &polygons, &table(&["AAA"]), &CentrePointLocator);

        assert_eq!(layer.grid.to_rows(), vec![vec![0, 0, 1, 1], vec![0, 0, 1, 1]]);
    }

    #[test]
    fn test_cell_parts_split_at_antimeridian() {
        let volume = DomainVolume::new(
            "PACIFIC",
            vec![0.0],
            vec![179.0, 180.0, 181.0],
            vec![0.0],
            LongitudeConvention::Unsigned360,
        )
        .unwrap();
        let cell = GridCell::new(&volume, 0, 1);
        assert_eq!(cell.lon, -180.0);
        assert_eq!(cell.parts.len(), 2);
        assert_eq!(cell.parts[0].min_lon, 179.5);
        assert_eq!(cell.parts[1].max_lon, -179.5);
    }
}
