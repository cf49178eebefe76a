//! Test data generators for axes and country grids.
//!
//! These generators create predictable, verifiable patterns. Nothing here
//! uses a system RNG, so failures are reproducible.

/// Creates an evenly spaced axis of `n` values starting at `start`.
///
/// # Example
///
/// ```
/// use test_utils::regular_axis;
///
/// assert_eq!(regular_axis(-1.0, 0.5, 3), vec![-1.0, -0.5, 0.0]);
/// ```
pub fn regular_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Creates an axis from `first` to `last` inclusive with spacing `step`.
pub fn axis_between(first: f64, last: f64, step: f64) -> Vec<f64> {
    let n = ((last - first) / step).round() as usize + 1;
    regular_axis(first, step, n)
}

/// Creates a grid of country blocks with isolated gaps.
///
/// Cell values are drawn from `1..=n_countries` by a fixed linear
/// congruential sequence seeded with `seed`, grouped into 2x2 blocks.
/// Roughly one cell in five is a gap (`0`), but no two gaps are
/// orthogonal neighbours.
pub fn isolated_gap_grid(n_lat: usize, n_lon: usize, n_countries: u32, seed: u64) -> Vec<Vec<u32>> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    let block_values: Vec<Vec<u32>> = (0..n_lat.div_ceil(2))
        .map(|_| {
            (0..n_lon.div_ceil(2))
                .map(|_| 1 + next() % n_countries.max(1))
                .collect()
        })
        .collect();

    let mut grid: Vec<Vec<u32>> = (0..n_lat)
        .map(|r| (0..n_lon).map(|c| block_values[r / 2][c / 2]).collect())
        .collect();

    for r in 0..n_lat {
        for c in 0..n_lon {
            let up_is_gap = r > 0 && grid[r - 1][c] == 0;
            let left_is_gap = c > 0 && grid[r][c - 1] == 0;
            if !up_is_gap && !left_is_gap && next() % 5 == 0 {
                grid[r][c] = 0;
            }
        }
    }
    grid
}
