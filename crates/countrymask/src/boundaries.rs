//! National land and EEZ boundary layers.
//!
//! Boundaries are read from ESRI shapefiles as distributed by Natural Earth
//! and Marine Regions, or from GeoJSON FeatureCollections. Both formats map
//! their attributes through a [`LayerSchema`].

use std::fmt;
use std::path::{Path, PathBuf};

use geo::{BoundingRect, Contains, Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use mask_common::{BoundingBox, CountryCode, CountryTable, MaskError, MaskResult};
use serde::{Deserialize, Serialize};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};
use tracing::{debug, info, warn};

use crate::config::{DataPaths, TerritoryPolicy};

/// The two boundary layers a mask is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryLayer {
    /// National land territories.
    Land,
    /// Exclusive economic zones.
    Ocean,
}

impl BoundaryLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Ocean => "ocean",
        }
    }
}

impl fmt::Display for BoundaryLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A country's (part) geometry from a boundary layer.
///
/// Several polygons may share a code, e.g. one per EEZ of a country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPolygon {
    pub code: CountryCode,
    pub name: String,
    pub sovereign_code: Option<CountryCode>,
    pub sovereign_name: Option<String>,
    /// Geometry in [-180, 180) longitudes
    pub geometry: MultiPolygon<f64>,
    bbox: Option<BoundingBox>,
}

impl CountryPolygon {
    pub fn new(code: CountryCode, name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        let bbox = bbox_of(&geometry);
        Self {
            code,
            name: name.into(),
            sovereign_code: None,
            sovereign_name: None,
            geometry,
            bbox,
        }
    }

    /// Single polygon from a closed exterior ring of `(lon, lat)` pairs.
    pub fn from_ring(code: CountryCode, name: impl Into<String>, ring: &[(f64, f64)]) -> Self {
        let exterior: LineString<f64> = ring.iter().map(|&(x, y)| Coord { x, y }).collect();
        Self::new(
            code,
            name,
            MultiPolygon::new(vec![Polygon::new(exterior, vec![])]),
        )
    }

    pub fn with_sovereign(mut self, code: CountryCode, name: impl Into<String>) -> Self {
        self.sovereign_code = Some(code);
        self.sovereign_name = Some(name.into());
        self
    }

    /// Bounding box of the geometry, `None` if it is empty.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }
}

fn bbox_of(geometry: &MultiPolygon<f64>) -> Option<BoundingBox> {
    geometry
        .bounding_rect()
        .map(|r| BoundingBox::new(r.min().x, r.min().y, r.max().x, r.max().y))
}

/// Attribute names of a boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSchema {
    pub code_field: String,
    pub name_field: String,
    #[serde(default)]
    pub sovereign_code_field: Option<String>,
    #[serde(default)]
    pub sovereign_name_field: Option<String>,
}

impl LayerSchema {
    /// Natural Earth admin-0 countries.
    pub fn natural_earth() -> Self {
        Self {
            code_field: "ADM0_A3".to_string(),
            name_field: "NAME".to_string(),
            sovereign_code_field: Some("SOV_A3".to_string()),
            sovereign_name_field: Some("SOVEREIGNT".to_string()),
        }
    }

    /// Marine Regions EEZ boundaries.
    pub fn marine_regions() -> Self {
        Self {
            code_field: "ISO_TER1".to_string(),
            name_field: "TERRITORY1".to_string(),
            sovereign_code_field: Some("ISO_SOV1".to_string()),
            sovereign_name_field: Some("SOVEREIGN1".to_string()),
        }
    }
}

/// Source of country polygons.
pub trait BoundarySource: Send + Sync {
    /// Load every polygon of `layer`.
    fn load(&self, layer: BoundaryLayer) -> MaskResult<Vec<CountryPolygon>>;

    /// Recorded in the `database` attribute of generated datasets.
    fn description(&self) -> String {
        "unspecified boundary database".to_string()
    }
}

// ============================================================================
// Layer files
// ============================================================================

/// Land and EEZ files with their attribute schemas.
#[derive(Debug, Clone)]
struct LayerFiles {
    land_file: PathBuf,
    eez_file: PathBuf,
    land_schema: LayerSchema,
    eez_schema: LayerSchema,
    data_root: Option<PathBuf>,
}

impl LayerFiles {
    fn new(land_file: PathBuf, eez_file: PathBuf) -> Self {
        Self {
            land_file,
            eez_file,
            land_schema: LayerSchema::natural_earth(),
            eez_schema: LayerSchema::marine_regions(),
            data_root: None,
        }
    }

    fn from_data_paths(paths: &DataPaths) -> Self {
        Self {
            data_root: Some(paths.data_path.clone()),
            ..Self::new(paths.land_file.clone(), paths.eez_file.clone())
        }
    }

    /// File and schema of `layer`, checking the file is there.
    fn layer(&self, layer: BoundaryLayer) -> MaskResult<(&Path, &LayerSchema)> {
        if let Some(root) = &self.data_root {
            if !root.is_dir() {
                return Err(MaskError::DataUnavailable(root.clone()));
            }
        }

        let (path, schema) = match layer {
            BoundaryLayer::Land => (&self.land_file, &self.land_schema),
            BoundaryLayer::Ocean => (&self.eez_file, &self.eez_schema),
        };
        if !path.is_file() {
            return Err(MaskError::MissingData(format!(
                "{} boundary file {}",
                layer,
                path.display()
            )));
        }
        Ok((path, schema))
    }

    fn description(&self) -> String {
        format!(
            "land: {}; eez: {}",
            file_label(&self.land_file),
            file_label(&self.eez_file)
        )
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// File-backed source for `paths`, picked by the land file's extension.
pub fn boundary_source(paths: &DataPaths) -> Box<dyn BoundarySource> {
    let is_geojson = matches!(
        paths
            .land_file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("geojson" | "json")
    );
    if is_geojson {
        Box::new(GeoJsonBoundaries::from_data_paths(paths))
    } else {
        Box::new(ShapefileBoundaries::from_data_paths(paths))
    }
}

// ============================================================================
// Shapefiles
// ============================================================================

/// Boundary layers stored as ESRI shapefiles (`.shp` with its `.dbf`).
#[derive(Debug, Clone)]
pub struct ShapefileBoundaries {
    files: LayerFiles,
}

impl ShapefileBoundaries {
    /// Natural Earth land and Marine Regions EEZ shapefiles.
    pub fn new(land_file: impl Into<PathBuf>, eez_file: impl Into<PathBuf>) -> Self {
        Self {
            files: LayerFiles::new(land_file.into(), eez_file.into()),
        }
    }

    /// Files at the standard locations of `paths`.
    pub fn from_data_paths(paths: &DataPaths) -> Self {
        Self {
            files: LayerFiles::from_data_paths(paths),
        }
    }

    pub fn with_schemas(mut self, land_schema: LayerSchema, eez_schema: LayerSchema) -> Self {
        self.files.land_schema = land_schema;
        self.files.eez_schema = eez_schema;
        self
    }
}

impl BoundarySource for ShapefileBoundaries {
    fn load(&self, layer: BoundaryLayer) -> MaskResult<Vec<CountryPolygon>> {
        let (path, schema) = self.files.layer(layer)?;
        let polygons = read_shapefile(path, schema)?;

        info!(
            layer = %layer,
            file = %path.display(),
            polygons = polygons.len(),
            "Loaded boundary layer"
        );
        Ok(polygons)
    }

    fn description(&self) -> String {
        self.files.description()
    }
}

/// Read the country polygons of a shapefile.
///
/// Records without a valid three-letter code or without polygon geometry
/// are skipped.
pub fn read_shapefile(path: &Path, schema: &LayerSchema) -> MaskResult<Vec<CountryPolygon>> {
    let shapefile_error =
        |e: shapefile::Error| MaskError::Boundary(format!("{}: {}", path.display(), e));

    let mut reader = shapefile::Reader::from_path(path).map_err(shapefile_error)?;
    let mut polygons = Vec::new();
    let mut total = 0usize;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(shapefile_error)?;
        total += 1;

        let Some(code) = record_text(&record, &schema.code_field).and_then(|s| CountryCode::parse(&s))
        else {
            debug!(
                field = %schema.code_field,
                value = ?record.get(&schema.code_field),
                "Record without usable country code"
            );
            continue;
        };
        let Some(geometry) = shape_to_multi_polygon(&shape) else {
            continue;
        };
        polygons.push(country_polygon(code, geometry, schema, |field| {
            record_text(&record, field)
        }));
    }

    let skipped = total - polygons.len();
    if skipped > 0 {
        warn!(skipped, total, "Skipped records without code or polygon geometry");
    }
    Ok(polygons)
}

fn record_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        FieldValue::Character(Some(s)) | FieldValue::Memo(s) if !s.trim().is_empty() => {
            Some(s.trim().to_string())
        }
        _ => None,
    }
}

fn shape_to_multi_polygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    let rings: Vec<(bool, LineString<f64>)> = match shape {
        Shape::Polygon(p) => p.rings().iter().map(|r| ring_of(r, |pt| (pt.x, pt.y))).collect(),
        Shape::PolygonM(p) => p.rings().iter().map(|r| ring_of(r, |pt| (pt.x, pt.y))).collect(),
        Shape::PolygonZ(p) => p.rings().iter().map(|r| ring_of(r, |pt| (pt.x, pt.y))).collect(),
        _ => return None,
    };
    assemble_rings(rings)
}

/// Ring coordinates, flagged `true` for outer rings.
fn ring_of<P>(ring: &PolygonRing<P>, xy: impl Fn(&P) -> (f64, f64)) -> (bool, LineString<f64>) {
    let coords: LineString<f64> = ring
        .points()
        .iter()
        .map(|p| {
            let (x, y) = xy(p);
            Coord { x, y }
        })
        .collect();
    (matches!(ring, PolygonRing::Outer(_)), coords)
}

/// Group shapefile rings into polygons.
///
/// Each inner ring becomes a hole of the latest outer ring containing its
/// first vertex, or of the latest outer ring when none does. Inner rings
/// before any outer ring are kept as polygons of their own.
fn assemble_rings(rings: Vec<(bool, LineString<f64>)>) -> Option<MultiPolygon<f64>> {
    let mut parts: Vec<Polygon<f64>> = Vec::new();

    for (outer, ring) in rings {
        if ring.0.is_empty() {
            continue;
        }
        if outer || parts.is_empty() {
            parts.push(Polygon::new(ring, vec![]));
            continue;
        }

        let first = ring.0[0];
        let host = parts
            .iter()
            .rposition(|p| p.contains(&first))
            .unwrap_or(parts.len() - 1);
        parts[host].interiors_push(ring);
    }

    (!parts.is_empty()).then(|| MultiPolygon::new(parts))
}

// ============================================================================
// GeoJSON files
// ============================================================================

/// Boundary layers stored as GeoJSON files.
#[derive(Debug, Clone)]
pub struct GeoJsonBoundaries {
    files: LayerFiles,
}

impl GeoJsonBoundaries {
    /// Natural Earth land and Marine Regions EEZ files.
    pub fn new(land_file: impl Into<PathBuf>, eez_file: impl Into<PathBuf>) -> Self {
        Self {
            files: LayerFiles::new(land_file.into(), eez_file.into()),
        }
    }

    /// Files at the standard locations of `paths`.
    pub fn from_data_paths(paths: &DataPaths) -> Self {
        Self {
            files: LayerFiles::from_data_paths(paths),
        }
    }

    pub fn with_schemas(mut self, land_schema: LayerSchema, eez_schema: LayerSchema) -> Self {
        self.files.land_schema = land_schema;
        self.files.eez_schema = eez_schema;
        self
    }
}

impl BoundarySource for GeoJsonBoundaries {
    fn load(&self, layer: BoundaryLayer) -> MaskResult<Vec<CountryPolygon>> {
        let (path, schema) = self.files.layer(layer)?;
        let text = std::fs::read_to_string(path)?;
        let polygons = parse_feature_collection(&text, schema)?;

        info!(
            layer = %layer,
            file = %path.display(),
            polygons = polygons.len(),
            "Loaded boundary layer"
        );
        Ok(polygons)
    }

    fn description(&self) -> String {
        self.files.description()
    }
}

/// Parse a GeoJSON FeatureCollection into country polygons.
///
/// Features without a valid three-letter code or without (multi)polygon
/// geometry are skipped.
pub fn parse_feature_collection(text: &str, schema: &LayerSchema) -> MaskResult<Vec<CountryPolygon>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let geojson =
        GeoJson::from_json_value(value).map_err(|e| MaskError::Boundary(e.to_string()))?;
    let collection =
        FeatureCollection::try_from(geojson).map_err(|e| MaskError::Boundary(e.to_string()))?;

    let total = collection.features.len();
    let mut polygons = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for feature in &collection.features {
        match feature_to_polygon(feature, schema)? {
            Some(polygon) => polygons.push(polygon),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, total, "Skipped features without code or polygon geometry");
    }
    Ok(polygons)
}

fn feature_to_polygon(feature: &Feature, schema: &LayerSchema) -> MaskResult<Option<CountryPolygon>> {
    let Some(code) = text_property(feature, &schema.code_field).and_then(|s| CountryCode::parse(&s))
    else {
        debug!(
            field = %schema.code_field,
            value = ?feature.property(&schema.code_field),
            "Feature without usable country code"
        );
        return Ok(None);
    };

    let Some(geometry) = &feature.geometry else {
        return Ok(None);
    };
    let geometry = geo::Geometry::<f64>::try_from(&geometry.value)
        .map_err(|e| MaskError::Boundary(format!("{}: {}", code, e)))?;
    let Some(multi) = into_multi_polygon(geometry) else {
        return Ok(None);
    };

    Ok(Some(country_polygon(code, multi, schema, |field| {
        text_property(feature, field)
    })))
}

/// Country polygon with name and sovereign taken from `text` lookups.
fn country_polygon(
    code: CountryCode,
    geometry: MultiPolygon<f64>,
    schema: &LayerSchema,
    text: impl Fn(&str) -> Option<String>,
) -> CountryPolygon {
    let name = text(&schema.name_field).unwrap_or_else(|| code.to_string());
    let mut polygon = CountryPolygon::new(code, name, geometry);

    let sovereign_code = schema
        .sovereign_code_field
        .as_deref()
        .and_then(&text)
        .and_then(|s| CountryCode::parse(&s));
    if let Some(sovereign_code) = sovereign_code {
        let sovereign_name = schema
            .sovereign_name_field
            .as_deref()
            .and_then(&text)
            .unwrap_or_else(|| sovereign_code.to_string());
        polygon = polygon.with_sovereign(sovereign_code, sovereign_name);
    }
    polygon
}

fn text_property(feature: &Feature, field: &str) -> Option<String> {
    match feature.property(field)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn into_multi_polygon(geometry: geo::Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        geo::Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p])),
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::GeometryCollection(collection) => {
            let parts: Vec<Polygon<f64>> = collection
                .into_iter()
                .filter_map(into_multi_polygon)
                .flat_map(|mp| mp.0)
                .collect();
            (!parts.is_empty()).then(|| MultiPolygon::new(parts))
        }
        _ => None,
    }
}

// ============================================================================
// In-memory layers
// ============================================================================

/// Boundary layers held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoundaries {
    land: Vec<CountryPolygon>,
    ocean: Vec<CountryPolygon>,
}

impl MemoryBoundaries {
    pub fn new(land: Vec<CountryPolygon>, ocean: Vec<CountryPolygon>) -> Self {
        Self { land, ocean }
    }
}

impl BoundarySource for MemoryBoundaries {
    fn load(&self, layer: BoundaryLayer) -> MaskResult<Vec<CountryPolygon>> {
        Ok(match layer {
            BoundaryLayer::Land => self.land.clone(),
            BoundaryLayer::Ocean => self.ocean.clone(),
        })
    }

    fn description(&self) -> String {
        "in-memory boundary layers".to_string()
    }
}

// ============================================================================
// Layer preparation
// ============================================================================

/// Reference table over every code of both layers, sorted by code.
pub fn reference_table(land: &[CountryPolygon], ocean: &[CountryPolygon]) -> CountryTable {
    CountryTable::reference(
        land.iter()
            .chain(ocean)
            .map(|p| (p.code.clone(), p.name.clone())),
    )
}

/// Reassign territory polygons according to `policy`.
pub fn apply_territory_policy(
    polygons: Vec<CountryPolygon>,
    policy: TerritoryPolicy,
) -> Vec<CountryPolygon> {
    match policy {
        TerritoryPolicy::Territory => polygons,
        TerritoryPolicy::Sovereign => polygons
            .into_iter()
            .map(|mut p| {
                if let Some(sovereign) = p.sovereign_code.clone() {
                    if sovereign != p.code {
                        p.code = sovereign;
                        if let Some(name) = &p.sovereign_name {
                            p.name = name.clone();
                        }
                    }
                }
                p
            })
            .collect(),
    }
}

/// Keep only polygons whose code is in `codes`.
///
/// Every code must exist in `reference`.
pub fn filter_countries(
    polygons: Vec<CountryPolygon>,
    codes: &[CountryCode],
    reference: &CountryTable,
) -> MaskResult<Vec<CountryPolygon>> {
    if let Some(unknown) = codes.iter().find(|c| !reference.contains_code(c)) {
        return Err(MaskError::InvalidConfiguration(format!(
            "country {} is not in the boundary layers",
            unknown
        )));
    }
    Ok(polygons
        .into_iter()
        .filter(|p| codes.contains(&p.code))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "properties": {"ADM0_A3": "FRO", "NAME": "Faroe Islands", "SOV_A3": "DNK", "SOVEREIGNT": "Denmark"},
             "geometry": {"type": "Polygon", "coordinates": [[[-8, 61], [-6, 61], [-6, 63], [-8, 63], [-8, 61]]]}},
            {"type": "Feature",
             "properties": {"ADM0_A3": "-99", "NAME": "Disputed"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature",
             "properties": {"ADM0_A3": "GBR", "NAME": "United Kingdom"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[-6, 50], [2, 50], [2, 59], [-6, 59], [-6, 50]]],
                [[[-8, 54], [-5, 54], [-5, 55], [-8, 55], [-8, 54]]]]}},
            {"type": "Feature",
             "properties": {"ADM0_A3": "ESP", "NAME": "Spain"},
             "geometry": {"type": "Point", "coordinates": [-3, 40]}}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let polygons = parse_feature_collection(SAMPLE, &LayerSchema::natural_earth()).unwrap();
        assert_eq!(polygons.len(), 2);

        let faroe = &polygons[0];
        assert_eq!(faroe.code.as_str(), "FRO");
        assert_eq!(faroe.sovereign_code.as_ref().unwrap().as_str(), "DNK");
        assert_eq!(faroe.bbox(), Some(BoundingBox::new(-8.0, 61.0, -6.0, 63.0)));

        let uk = &polygons[1];
        assert_eq!(uk.geometry.0.len(), 2);
        assert!(uk.sovereign_code.is_none());
    }

    #[test]
    fn test_parse_rejects_non_geojson() {
        let result = parse_feature_collection("not json", &LayerSchema::natural_earth());
        assert!(matches!(result, Err(MaskError::Boundary(_))));
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> LineString<f64> {
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])
    }

    #[test]
    fn test_assemble_rings_assigns_holes() {
        let multi = assemble_rings(vec![
            (true, square(0.0, 0.0, 10.0, 10.0)),
            (true, square(20.0, 0.0, 30.0, 10.0)),
            // Inside the first outer ring although the second came last
            (false, square(2.0, 2.0, 4.0, 4.0)),
            (false, square(22.0, 2.0, 24.0, 4.0)),
        ])
        .unwrap();

        assert_eq!(multi.0.len(), 2);
        assert_eq!(multi.0[0].interiors().len(), 1);
        assert_eq!(multi.0[1].interiors().len(), 1);
        assert!(!multi.contains(&geo::Point::new(3.0, 3.0)));
        assert!(multi.contains(&geo::Point::new(5.0, 5.0)));
        assert!(!multi.contains(&geo::Point::new(23.0, 3.0)));
    }

    #[test]
    fn test_assemble_rings_without_outer() {
        let multi = assemble_rings(vec![(false, square(0.0, 0.0, 1.0, 1.0))]).unwrap();
        assert_eq!(multi.0.len(), 1);
        assert!(assemble_rings(vec![]).is_none());
    }

    #[test]
    fn test_record_text() {
        let mut record = Record::default();
        record.insert(
            "ADM0_A3".to_string(),
            FieldValue::Character(Some(" GBR ".to_string())),
        );
        record.insert("NAME".to_string(), FieldValue::Character(None));
        record.insert("POP".to_string(), FieldValue::Numeric(Some(6.7e7)));

        assert_eq!(record_text(&record, "ADM0_A3").as_deref(), Some("GBR"));
        assert_eq!(record_text(&record, "NAME"), None);
        assert_eq!(record_text(&record, "POP"), None);
        assert_eq!(record_text(&record, "MISSING"), None);
    }

    #[test]
    fn test_boundary_source_follows_extension() {
        let mut paths = DataPaths::under(PathBuf::from("/nonexistent"));
        assert_eq!(
            boundary_source(&paths).description(),
            "land: ne_10m_admin_0_countries.shp; eez: eez_v11.shp"
        );

        paths.land_file = PathBuf::from("/tmp/land.geojson");
        paths.eez_file = PathBuf::from("/tmp/eez.geojson");
        let source = boundary_source(&paths);
        assert_eq!(source.description(), "land: land.geojson; eez: eez.geojson");
        assert!(matches!(
            source.load(BoundaryLayer::Land),
            Err(MaskError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_sovereign_policy() {
        let ring = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)];
        let polygons = vec![
            CountryPolygon::from_ring(code("FRO"), "Faroe Islands", &ring)
                .with_sovereign(code("DNK"), "Denmark"),
            CountryPolygon::from_ring(code("GBR"), "United Kingdom", &ring),
        ];

        let kept = apply_territory_policy(polygons.clone(), TerritoryPolicy::Territory);
        assert_eq!(kept, polygons);

        let merged = apply_territory_policy(polygons, TerritoryPolicy::Sovereign);
        assert_eq!(merged[0].code.as_str(), "DNK");
        assert_eq!(merged[0].name, "Denmark");
        assert_eq!(merged[1].code.as_str(), "GBR");
    }

    #[test]
    fn test_reference_table_spans_both_layers() {
        let ring = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)];
        let land = vec![CountryPolygon::from_ring(code("NOR"), "Norway", &ring)];
        let ocean = vec![
            CountryPolygon::from_ring(code("ESP"), "Spain", &ring),
            CountryPolygon::from_ring(code("NOR"), "Norway", &ring),
        ];

        let table = reference_table(&land, &ocean);
        assert_eq!(table.codes(), vec!["ESP", "NOR"]);

        let filtered = filter_countries(ocean.clone(), &[code("NOR")], &table).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(matches!(
            filter_countries(ocean, &[code("CHN")], &table),
            Err(MaskError::InvalidConfiguration(_))
        ));
    }
}
