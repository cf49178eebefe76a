//! Country codes and index lookup tables.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};
use crate::grid::{CountryIndex, NO_COUNTRY};

/// A three-letter, upper-case country code (e.g. "GBR").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a code, accepting any case and surrounding whitespace.
    ///
    /// Returns `None` for placeholders such as "-99" or empty strings.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(trimmed.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = MaskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CountryCode::parse(&value)
            .ok_or_else(|| MaskError::Boundary(format!("invalid country code '{}'", value)))
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// One entry of a country lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub index: CountryIndex,
    pub code: CountryCode,
    pub name: String,
}

/// Mapping from country index to code and name.
///
/// Records are kept sorted by index. Indices and codes are unique and
/// index 0 is reserved for "no country".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTable {
    records: Vec<CountryRecord>,
}

impl CountryTable {
    /// Build a reference table: one record per distinct code, sorted by
    /// code and numbered contiguously from 1.
    ///
    /// When a code appears more than once, the first name seen wins.
    pub fn reference<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CountryCode, String)>,
    {
        let mut by_code: BTreeMap<CountryCode, String> = BTreeMap::new();
        for (code, name) in entries {
            by_code.entry(code).or_insert(name);
        }

        let records = by_code
            .into_iter()
            .zip(1..)
            .map(|((code, name), index)| CountryRecord { index, code, name })
            .collect();

        Self { records }
    }

    /// Build a table from explicit records.
    pub fn from_records(mut records: Vec<CountryRecord>) -> MaskResult<Self> {
        records.sort_by_key(|r| r.index);

        let mut codes = BTreeSet::new();
        for pair in records.windows(2) {
            if pair[0].index == pair[1].index {
                return Err(MaskError::InvalidConfiguration(format!(
                    "duplicate country index {}",
                    pair[0].index
                )));
            }
        }
        for record in &records {
            if record.index == NO_COUNTRY {
                return Err(MaskError::InvalidConfiguration(format!(
                    "country {} uses the reserved index {}",
                    record.code, NO_COUNTRY
                )));
            }
            if !codes.insert(record.code.clone()) {
                return Err(MaskError::InvalidConfiguration(format!(
                    "duplicate country code {}",
                    record.code
                )));
            }
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.records.iter()
    }

    /// Record for `index`.
    pub fn get(&self, index: CountryIndex) -> Option<&CountryRecord> {
        self.records
            .binary_search_by_key(&index, |r| r.index)
            .ok()
            .map(|pos| &self.records[pos])
    }

    /// Index assigned to `code`.
    pub fn index_of(&self, code: &CountryCode) -> Option<CountryIndex> {
        self.records.iter().find(|r| &r.code == code).map(|r| r.index)
    }

    pub fn contains_code(&self, code: &CountryCode) -> bool {
        self.index_of(code).is_some()
    }

    pub fn indices(&self) -> Vec<CountryIndex> {
        self.records.iter().map(|r| r.index).collect()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.code.as_str()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Largest index in the table, `NO_COUNTRY` when empty.
    pub fn max_index(&self) -> CountryIndex {
        self.records.last().map(|r| r.index).unwrap_or(NO_COUNTRY)
    }

    /// Records whose index is in `indices`, keeping their indices.
    pub fn subset(&self, indices: &BTreeSet<CountryIndex>) -> CountryTable {
        CountryTable {
            records: self
                .records
                .iter()
                .filter(|r| indices.contains(&r.index))
                .cloned()
                .collect(),
        }
    }

    /// Renumber records contiguously from 1 in index order.
    ///
    /// Returns the new table and the old → new index mapping.
    pub fn renumbered(&self) -> (CountryTable, BTreeMap<CountryIndex, CountryIndex>) {
        let mut mapping = BTreeMap::new();
        let records = self
            .records
            .iter()
            .zip(1..)
            .map(|(r, new_index)| {
                mapping.insert(r.index, new_index);
                CountryRecord {
                    index: new_index,
                    ..r.clone()
                }
            })
            .collect();

        (CountryTable { records }, mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    #[test]
    fn test_parse_country_code() {
        assert_eq!(code(" gbr ").as_str(), "GBR");
        assert!(CountryCode::parse("-99").is_none());
        assert!(CountryCode::parse("").is_none());
        assert!(CountryCode::parse("GB").is_none());
        assert!(CountryCode::parse("GBRR").is_none());
    }

    #[test]
    fn test_reference_table_sorted_by_code() {
        let table = CountryTable::reference(vec![
            (code("NOR"), "Norway".to_string()),
            (code("ESP"), "Spain".to_string()),
            (code("GBR"), "United Kingdom".to_string()),
            (code("NOR"), "Norway (duplicate)".to_string()),
        ]);

        assert_eq!(table.codes(), vec!["ESP", "GBR", "NOR"]);
        assert_eq!(table.indices(), vec![1, 2, 3]);
        assert_eq!(table.get(3).unwrap().name, "Norway");
        assert_eq!(table.index_of(&code("GBR")), Some(2));
        assert_eq!(table.index_of(&code("FRA")), None);
    }

    #[test]
    fn test_from_records_validation() {
        let ok = CountryTable::from_records(vec![
            CountryRecord { index: 7, code: code("FRA"), name: "France".into() },
            CountryRecord { index: 2, code: code("DEU"), name: "Germany".into() },
        ])
        .unwrap();
        assert_eq!(ok.indices(), vec![2, 7]);

        let reserved = CountryTable::from_records(vec![CountryRecord {
            index: NO_COUNTRY,
            code: code("FRA"),
            name: "France".into(),
        }]);
        assert!(reserved.is_err());

        let dup_code = CountryTable::from_records(vec![
            CountryRecord { index: 1, code: code("FRA"), name: "France".into() },
            CountryRecord { index: 2, code: code("FRA"), name: "France".into() },
        ]);
        assert!(dup_code.is_err());
    }

    #[test]
    fn test_subset_and_renumber() {
        let table = CountryTable::reference(vec![
            (code("AAA"), "A".to_string()),
            (code("BBB"), "B".to_string()),
            (code("CCC"), "C".to_string()),
            (code("DDD"), "D".to_string()),
        ]);

        let subset = table.subset(&[2, 4].into_iter().collect());
        assert_eq!(subset.indices(), vec![2, 4]);
        assert_eq!(subset.max_index(), 4);

        let (renumbered, mapping) = subset.renumbered();
        assert_eq!(renumbered.indices(), vec![1, 2]);
        assert_eq!(renumbered.codes(), vec!["BBB", "DDD"]);
        assert_eq!(mapping.get(&4), Some(&2));
    }
}
