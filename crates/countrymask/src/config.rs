//! Configuration for country mask generation.

use std::path::{Path, PathBuf};

use mask_common::{CountryCode, MaskError, MaskResult};
use serde::{Deserialize, Serialize};

/// How a grid cell is matched against a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterMode {
    /// The cell centre lies inside (or on the boundary of) the polygon.
    #[default]
    CellCentre,
    /// Any part of the cell rectangle touches the polygon.
    AllTouched,
}

impl RasterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CellCentre => "cell_centre",
            Self::AllTouched => "all_touched",
        }
    }
}

impl std::str::FromStr for RasterMode {
    type Err = MaskError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cell_centre" | "cell_center" | "centre" | "center" => Ok(Self::CellCentre),
            "all_touched" | "alltouched" => Ok(Self::AllTouched),
            other => Err(MaskError::InvalidConfiguration(format!(
                "unknown raster mode '{}', expected cell_centre or all_touched",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RasterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which code a territory's polygons are assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerritoryPolicy {
    /// Territories keep their own code (e.g. Faroe Islands = FRO).
    #[default]
    Territory,
    /// Territories are merged into their sovereign state (FRO -> DNK).
    Sovereign,
}

/// Options for [`create_country_mask_eez`](crate::create_country_mask_eez).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Rasterize the land boundary layer.
    pub include_land_territories: bool,

    /// Rasterize the EEZ (ocean) boundary layer.
    pub include_ocean_territories: bool,

    /// Fill isolated empty cells from agreeing neighbours.
    pub fill_gaps: bool,

    /// Renumber present countries contiguously from 1.
    pub reset_index: bool,

    /// Write the dataset to `output_path`.
    pub save: bool,

    /// Root of the per-domain footprint directories.
    /// Falls back to [`DataPaths::fp_directory`] when unset.
    pub fp_directory: Option<PathBuf>,

    /// Output file; a `.nc` suffix is added when missing.
    pub output_path: Option<PathBuf>,

    pub raster_mode: RasterMode,

    pub territory_policy: TerritoryPolicy,

    /// Restrict the mask to these country codes.
    pub country_list: Option<Vec<String>>,

    /// Recorded in the `author` attribute; defaults to `$USER`.
    pub author: Option<String>,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            include_land_territories: true,
            include_ocean_territories: true,
            fill_gaps: true,
            reset_index: false,
            save: false,
            fp_directory: None,
            output_path: None,
            raster_mode: RasterMode::CellCentre,
            territory_policy: TerritoryPolicy::Territory,
            country_list: None,
            author: None,
        }
    }
}

impl MaskOptions {
    /// Options for a land-only mask.
    pub fn land_only() -> Self {
        Self {
            include_ocean_territories: false,
            ..Self::default()
        }
    }

    /// Options for an ocean-only (EEZ) mask.
    pub fn ocean_only() -> Self {
        Self {
            include_land_territories: false,
            ..Self::default()
        }
    }

    /// Load options from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> MaskResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> MaskResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| MaskError::InvalidConfiguration(format!("invalid options: {}", e)))
    }

    /// Validate the options.
    pub fn validate(&self) -> MaskResult<()> {
        if !self.include_land_territories && !self.include_ocean_territories {
            return Err(MaskError::InvalidConfiguration(
                "at least one of include_land_territories and include_ocean_territories must be set"
                    .to_string(),
            ));
        }

        if self.save && self.output_path.is_none() {
            return Err(MaskError::InvalidConfiguration(
                "save requested without an output_path".to_string(),
            ));
        }

        self.country_filter().map(|_| ())
    }

    /// Parsed `country_list`.
    pub fn country_filter(&self) -> MaskResult<Option<Vec<CountryCode>>> {
        let Some(list) = &self.country_list else {
            return Ok(None);
        };
        list.iter()
            .map(|s| {
                CountryCode::parse(s).ok_or_else(|| {
                    MaskError::InvalidConfiguration(format!("invalid country code '{}'", s))
                })
            })
            .collect::<MaskResult<Vec<_>>>()
            .map(Some)
    }

    /// `output_path` with the `.nc` suffix enforced.
    pub fn output_file(&self) -> Option<PathBuf> {
        self.output_path.as_deref().map(with_nc_suffix)
    }

    /// Value for the `author` attribute.
    pub fn author_name(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Append `.nc` unless the path already ends with it.
pub fn with_nc_suffix(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("nc") {
        path.to_path_buf()
    } else {
        let mut os = path.as_os_str().to_owned();
        os.push(".nc");
        PathBuf::from(os)
    }
}

// ============================================================================
// Data locations
// ============================================================================

/// Locations of boundary layers and footprint files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root of the shared data tree.
    pub data_path: PathBuf,

    /// Root of the per-domain footprint directories.
    pub fp_directory: PathBuf,

    /// Land boundary layer (shapefile, or GeoJSON by extension).
    pub land_file: PathBuf,

    /// EEZ boundary layer (shapefile, or GeoJSON by extension).
    pub eez_file: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::under(PathBuf::from("data"))
    }
}

impl DataPaths {
    /// Standard layout below `data_path`.
    pub fn under(data_path: PathBuf) -> Self {
        let shapes = data_path.join("World_shape_databases");
        Self {
            fp_directory: data_path.join("LPDM").join("fp_NAME"),
            land_file: shapes
                .join("NaturalEarth")
                .join("ne_10m_admin_0_countries.shp"),
            eez_file: shapes
                .join("MarineRegions")
                .join("eez_v11.shp"),
            data_path,
        }
    }

    /// Load paths from environment variables.
    ///
    /// `COUNTRYMASK_DATA_PATH` sets the root; `COUNTRYMASK_FP_DIRECTORY`,
    /// `COUNTRYMASK_LAND_FILE` and `COUNTRYMASK_EEZ_FILE` override single
    /// locations.
    pub fn from_env() -> Self {
        let mut paths = match std::env::var_os("COUNTRYMASK_DATA_PATH") {
            Some(root) => Self::under(PathBuf::from(root)),
            None => Self::default(),
        };

        if let Some(val) = std::env::var_os("COUNTRYMASK_FP_DIRECTORY") {
            paths.fp_directory = PathBuf::from(val);
        }

        if let Some(val) = std::env::var_os("COUNTRYMASK_LAND_FILE") {
            paths.land_file = PathBuf::from(val);
        }

        if let Some(val) = std::env::var_os("COUNTRYMASK_EEZ_FILE") {
            paths.eez_file = PathBuf::from(val);
        }

        paths
    }
}
