use crate::core::country::canonical_country;
use crate::models::SchoolProfile;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../../data/schools.toml");

/// Errors that can occur while loading the school catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate school id: {0}")]
    DuplicateId(u32),

    #[error("Invalid school {id}: {reason}")]
    InvalidSchool { id: u32, reason: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    schools: Vec<SchoolProfile>,
}

/// Immutable reference list of schools
#[derive(Debug, Clone)]
pub struct Catalog {
    schools: Vec<SchoolProfile>,
}

impl Catalog {
    /// Build a catalog from already-validated schools
    pub fn new(schools: Vec<SchoolProfile>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut schools = schools;

        for school in &mut schools {
            if !seen.insert(school.id) {
                return Err(CatalogError::DuplicateId(school.id));
            }
            validate_school(school)?;
            school.country = canonical_country(&school.country);
        }

        Ok(Self { schools })
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_toml_str(EMBEDDED_CATALOG)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::new(file.schools)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Load from `path` when given, otherwise use the embedded catalog
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                tracing::info!("Loading school catalog from {}", path.display());
                Self::from_path(path)
            }
            None => Self::embedded(),
        }
    }

    pub fn schools(&self) -> &[SchoolProfile] {
        &self.schools
    }

    pub fn get(&self, id: u32) -> Option<&SchoolProfile> {
        self.schools.iter().find(|school| school.id == id)
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    /// Schools located in any of `countries`; every school when the set is empty
    pub fn in_countries<'a>(
        &'a self,
        countries: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a SchoolProfile> + 'a {
        self.schools
            .iter()
            .filter(move |school| countries.is_empty() || countries.contains(&school.country))
    }
}

fn validate_school(school: &SchoolProfile) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidSchool {
        id: school.id,
        reason: reason.to_string(),
    };

    if !(0.0..=100.0).contains(&school.admission_rate) {
        return Err(invalid("admissionRate must be within 0-100"));
    }
    if !(school.average_gpa > 0.0) {
        return Err(invalid("averageGpa must be positive"));
    }
    if school.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }

    Ok(())
}
