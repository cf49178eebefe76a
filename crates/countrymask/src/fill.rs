//! Gap filling for country grids.
//!
//! Rasterizing at cell centres leaves single empty cells along narrow
//! features (islands, straits, coastlines). A gap surrounded by one country
//! is assigned to that country.

use mask_common::{CountryGrid, NO_COUNTRY};
use tracing::debug;

/// Fill empty cells whose orthogonal neighbours agree.
///
/// A cell with value [`NO_COUNTRY`] is filled when it is an interior cell
/// (all four orthogonal neighbours exist) and every neighbour that has a
/// country carries the same index. At least one neighbour must have a
/// country. Edge and corner cells are never filled.
///
/// Decisions are made against the input values only, so filling one cell
/// never enables filling another in the same call.
pub fn mask_fill_gaps(grid: &CountryGrid) -> CountryGrid {
    let (n_lat, n_lon) = grid.shape();
    let mut filled = grid.clone();
    if n_lat < 3 || n_lon < 3 {
        return filled;
    }

    let mut count = 0usize;
    for row in 1..n_lat - 1 {
        for col in 1..n_lon - 1 {
            if !grid.is_unset(row, col) {
                continue;
            }
            let neighbours = [
                grid.get(row - 1, col),
                grid.get(row + 1, col),
                grid.get(row, col - 1),
                grid.get(row, col + 1),
            ];

            let mut owner = None;
            let mut agree = true;
            for value in neighbours.into_iter().flatten().filter(|&v| v != NO_COUNTRY) {
                match owner {
                    None => owner = Some(value),
                    Some(existing) if existing != value => {
                        agree = false;
                        break;
                    }
                    Some(_) => {}
                }
            }

            if let (true, Some(value)) = (agree, owner) {
                filled.set(row, col, value);
                count += 1;
            }
        }
    }

    debug!(filled = count, n_lat, n_lon, "Filled grid gaps");
    filled
}
