//! Model domains and their coordinate volumes.
//!
//! A domain is a named lat/lon grid. Its coordinates are not stored here:
//! they are read from the footprint files kept under
//! `<fp_directory>/<DOMAIN>/*.nc`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use mask_common::{convert_lons_0360, DomainVolume, LongitudeConvention, MaskError, MaskResult};
use netcdf_parser::read_footprint_axes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DataPaths;

/// A validated, upper-case domain identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Parse a domain name.
    ///
    /// Names must start with a letter and contain only ASCII letters,
    /// digits and underscores. Case is ignored.
    pub fn parse(s: &str) -> MaskResult<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let valid_start = chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_start || !valid_rest {
            return Err(MaskError::InvalidDomain(format!(
                "'{}' is not a valid domain name",
                s
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub name: String,
    /// Longitude range the domain's grid is expressed in
    #[serde(default)]
    pub convention: LongitudeConvention,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YamlDomainFile {
    domains: Vec<DomainSpec>,
}

/// Known domains.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    domains: BTreeMap<String, DomainSpec>,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DomainRegistry {
    /// Registry with no domains.
    pub fn empty() -> Self {
        Self {
            domains: BTreeMap::new(),
        }
    }

    /// The standard NAME model domains.
    ///
    /// Domains spanning the antimeridian use 0-360 longitudes.
    pub fn builtin() -> Self {
        use LongitudeConvention::{Signed180, Unsigned360};

        let mut registry = Self::empty();
        for (name, convention, description) in [
            ("EUROPE", Signed180, "Europe and the North Atlantic"),
            ("ARCTIC", Unsigned360, "Arctic, all longitudes north of 40N"),
            ("PACIFIC", Unsigned360, "Tropical Pacific"),
            ("EASTASIA", Signed180, "East Asia"),
            ("SOUTHASIA", Signed180, "Indian subcontinent"),
            ("AFRICA", Signed180, "Africa"),
            ("SAHEL", Signed180, "Sahel region"),
            ("NAMERICA", Signed180, "North America"),
            ("USA", Signed180, "Contiguous United States"),
            ("CARIBBEAN", Signed180, "Caribbean"),
            ("SOUTHAMERICA", Signed180, "South America"),
            ("AUSTRALIA", Signed180, "Australia"),
        ] {
            registry.register(DomainSpec {
                name: name.to_string(),
                convention,
                description: Some(description.to_string()),
            });
        }
        registry
    }

    /// Add or replace a domain.
    pub fn register(&mut self, mut spec: DomainSpec) {
        spec.name = spec.name.trim().to_ascii_uppercase();
        self.domains.insert(spec.name.clone(), spec);
    }

    /// Add the domains listed in a YAML file.
    ///
    /// ```yaml
    /// domains:
    ///   - name: GLOBAL_PACIFIC
    ///     convention: unsigned_360
    /// ```
    pub fn load_yaml_file<P: AsRef<Path>>(mut self, path: P) -> MaskResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let file: YamlDomainFile = serde_yaml::from_str(&contents).map_err(|e| {
            MaskError::InvalidConfiguration(format!(
                "invalid domain file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        for spec in file.domains {
            DomainName::parse(&spec.name)?;
            self.register(spec);
        }

        debug!(
            count = self.domains.len(),
            domains = ?self.domains.keys().collect::<Vec<_>>(),
            "Loaded domain registry"
        );
        Ok(self)
    }

    pub fn names(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }

    /// Look up a domain, validating the name first.
    pub fn get(&self, domain: &str) -> MaskResult<&DomainSpec> {
        let name = DomainName::parse(domain)?;
        self.domains
            .get(name.as_str())
            .ok_or_else(|| MaskError::InvalidDomain(format!("unknown domain '{}'", name)))
    }

    /// Read the coordinate volume of `domain`.
    ///
    /// `fp_directory` defaults to [`DataPaths::from_env`].
    pub fn resolve(&self, domain: &str, fp_directory: Option<&Path>) -> MaskResult<DomainVolume> {
        let spec = self.get(domain)?;

        let root = match fp_directory {
            Some(dir) => dir.to_path_buf(),
            None => DataPaths::from_env().fp_directory,
        };
        let file = footprint_file(&root, &spec.name)?;
        let axes = read_footprint_axes(&file)?;

        let lon = match spec.convention {
            LongitudeConvention::Unsigned360 => convert_lons_0360(&axes.lon),
            LongitudeConvention::Signed180 => axes.lon,
        };

        let volume = DomainVolume::new(&spec.name, axes.lat, lon, axes.height, spec.convention)?;

        info!(
            domain = %spec.name,
            file = %file.display(),
            n_lat = volume.lat.len(),
            n_lon = volume.lon.len(),
            n_height = volume.height.len(),
            convention = %spec.convention,
            "Resolved domain volume"
        );
        Ok(volume)
    }
}

/// Read the coordinate volume of a built-in domain.
///
/// Errors:
/// - [`MaskError::InvalidDomain`] for malformed or unknown names
/// - [`MaskError::DataUnavailable`] when `fp_directory` does not exist
/// - [`MaskError::MissingData`] when the domain has no footprint file
pub fn domain_volume(domain: &str, fp_directory: Option<&Path>) -> MaskResult<DomainVolume> {
    DomainRegistry::builtin().resolve(domain, fp_directory)
}

/// First footprint file (lexical order) for `domain` below `fp_directory`.
pub fn footprint_file(fp_directory: &Path, domain: &str) -> MaskResult<PathBuf> {
    if !fp_directory.is_dir() {
        return Err(MaskError::DataUnavailable(fp_directory.to_path_buf()));
    }

    let domain_dir = fp_directory.join(domain);
    if !domain_dir.is_dir() {
        return Err(MaskError::MissingData(format!(
            "no footprint directory for {} in {}",
            domain,
            fp_directory.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&domain_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("nc"))
        .collect();
    files.sort();

    files.into_iter().next().ok_or_else(|| {
        MaskError::MissingData(format!(
            "no footprint files in {}",
            domain_dir.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_name_parse() {
        assert_eq!(DomainName::parse(" europe ").unwrap().as_str(), "EUROPE");
        assert!(DomainName::parse("SOUTH_AMERICA2").is_ok());
        for bad in ["", "   ", "1", "12EUROPE", "EUR OPE", "EU-ROPE", "../EUROPE"] {
            assert!(
                matches!(DomainName::parse(bad), Err(MaskError::InvalidDomain(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = DomainRegistry::builtin();
        assert_eq!(
            registry.get("arctic").unwrap().convention,
            LongitudeConvention::Unsigned360
        );
        assert_eq!(
            registry.get("EUROPE").unwrap().convention,
            LongitudeConvention::Signed180
        );
        assert!(matches!(
            registry.get("MMM"),
            Err(MaskError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_missing_root_is_data_unavailable() {
        let err = footprint_file(Path::new("/nonexistent/fp_NAME"), "EUROPE").unwrap_err();
        assert!(err.is_data_unavailable());
    }
}
