//! Common test fixtures for country mask tests.
//!
//! This module provides pre-defined grids and boundary layers that represent
//! common scenarios: the reference gap-filling grid, a synthetic European
//! domain and square "countries" with known land/ocean overlaps.

/// Gap-filling reference grids.
pub mod gaps {
    /// Input grid; `0` marks cells without a country.
    pub const REFERENCE_INPUT: [[u32; 6]; 6] = [
        [1, 1, 1, 4, 4, 4],
        [1, 0, 1, 2, 2, 2],
        [1, 1, 1, 2, 0, 0],
        [3, 3, 3, 2, 2, 2],
        [3, 0, 3, 5, 5, 5],
        [3, 3, 0, 5, 6, 6],
    ];

    /// Expected result of a single gap-filling pass over [`REFERENCE_INPUT`].
    ///
    /// (1,1), (2,4) and (4,1) are filled. (2,5) sits on the right edge and
    /// (5,2) on the bottom edge, so both stay empty.
    pub const REFERENCE_FILLED: [[u32; 6]; 6] = [
        [1, 1, 1, 4, 4, 4],
        [1, 1, 1, 2, 2, 2],
        [1, 1, 1, 2, 2, 0],
        [3, 3, 3, 2, 2, 2],
        [3, 3, 3, 5, 5, 5],
        [3, 3, 0, 5, 6, 6],
    ];
}

/// Synthetic domain covering western Europe at 1 degree resolution.
pub mod domain {
    pub const NAME: &str = "EUROPE";
    /// First and last latitude centre, ascending
    pub const LAT_RANGE: (f64, f64) = (30.5, 74.5);
    /// First and last longitude centre, ascending
    pub const LON_RANGE: (f64, f64) = (-19.5, 39.5);
    pub const STEP: f64 = 1.0;
    pub const HEIGHTS: [f64; 2] = [40.0, 500.0];
}

/// An axis-aligned square country.
#[derive(Debug, Clone, Copy)]
pub struct SquareCountry {
    pub code: &'static str,
    pub name: &'static str,
    pub sovereign_code: &'static str,
    pub sovereign_name: &'static str,
    /// (min_lon, min_lat, max_lon, max_lat)
    pub bounds: (f64, f64, f64, f64),
}

impl SquareCountry {
    /// Closed exterior ring, counter-clockwise.
    pub fn ring(&self) -> Vec<(f64, f64)> {
        let (x0, y0, x1, y1) = self.bounds;
        vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]
    }

    /// Whether `(lon, lat)` lies inside or on the square.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (x0, y0, x1, y1) = self.bounds;
        lon >= x0 && lon <= x1 && lat >= y0 && lat <= y1
    }
}

/// Land layer inside the European domain.
pub const EUROPE_LAND: [SquareCountry; 4] = [
    SquareCountry {
        code: "GBR",
        name: "United Kingdom",
        sovereign_code: "GBR",
        sovereign_name: "United Kingdom",
        bounds: (-6.0, 50.0, 2.0, 59.0),
    },
    SquareCountry {
        code: "ESP",
        name: "Spain",
        sovereign_code: "ESP",
        sovereign_name: "Spain",
        bounds: (-9.0, 36.0, 3.0, 43.0),
    },
    SquareCountry {
        code: "NOR",
        name: "Norway",
        sovereign_code: "NOR",
        sovereign_name: "Norway",
        bounds: (5.0, 58.0, 30.0, 71.0),
    },
    SquareCountry {
        code: "FRO",
        name: "Faroe Islands",
        sovereign_code: "DNK",
        sovereign_name: "Denmark",
        bounds: (-8.0, 61.0, -6.0, 63.0),
    },
];

/// Ocean (EEZ) layer inside the European domain.
///
/// The NOR zone overlaps GBR land between 0E-2E and 56N-59N, and the GBR
/// zone covers the FRO land square. ESP overlaps nothing but itself.
pub const EUROPE_OCEAN: [SquareCountry; 3] = [
    SquareCountry {
        code: "GBR",
        name: "United Kingdom",
        sovereign_code: "GBR",
        sovereign_name: "United Kingdom",
        bounds: (-12.0, 48.0, 0.0, 64.0),
    },
    SquareCountry {
        code: "ESP",
        name: "Spain",
        sovereign_code: "ESP",
        sovereign_name: "Spain",
        bounds: (-14.0, 34.0, 6.0, 46.0),
    },
    SquareCountry {
        code: "NOR",
        name: "Norway",
        sovereign_code: "NOR",
        sovereign_name: "Norway",
        bounds: (0.0, 56.0, 35.0, 75.0),
    },
];

/// Land squares well outside the European domain.
pub const DISTANT_LAND: [SquareCountry; 3] = [
    SquareCountry {
        code: "BRA",
        name: "Brazil",
        sovereign_code: "BRA",
        sovereign_name: "Brazil",
        bounds: (-73.0, -33.0, -35.0, 5.0),
    },
    SquareCountry {
        code: "CHN",
        name: "China",
        sovereign_code: "CHN",
        sovereign_name: "China",
        bounds: (73.0, 18.0, 135.0, 53.0),
    },
    SquareCountry {
        code: "NZL",
        name: "New Zealand",
        sovereign_code: "NZL",
        sovereign_name: "New Zealand",
        bounds: (166.0, -47.0, 179.0, -34.0),
    },
];

/// GeoJSON FeatureCollection text for `countries`, using the given
/// property names for code, name, sovereign code and sovereign name.
pub fn square_feature_collection(countries: &[SquareCountry], fields: [&str; 4]) -> String {
    let features: Vec<String> = countries
        .iter()
        .map(|c| {
            let coords: Vec<String> = c
                .ring()
                .iter()
                .map(|(x, y)| format!("[{}, {}]", x, y))
                .collect();
            format!(
                r#"{{"type": "Feature", "properties": {{"{}": "{}", "{}": "{}", "{}": "{}", "{}": "{}"}}, "geometry": {{"type": "Polygon", "coordinates": [[{}]]}}}}"#,
                fields[0],
                c.code,
                fields[1],
                c.name,
                fields[2],
                c.sovereign_code,
                fields[3],
                c.sovereign_name,
                coords.join(", ")
            )
        })
        .collect();

    format!(
        r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
        features.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_grids_differ_only_in_gaps() {
        for r in 0..6 {
            for c in 0..6 {
                let before = gaps::REFERENCE_INPUT[r][c];
                let after = gaps::REFERENCE_FILLED[r][c];
                assert!(before == after || before == 0);
            }
        }
    }

    #[test]
    fn test_square_ring_is_closed() {
        let ring = EUROPE_LAND[0].ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_feature_collection_mentions_codes() {
        let json = square_feature_collection(&EUROPE_LAND, ["A", "B", "C", "D"]);
        assert!(json.contains("\"A\": \"GBR\""));
        assert!(json.contains("\"D\": \"Denmark\""));
    }
}
