//! Curriculum catalog and template resolver
//!
//! The catalog is a static lookup table mapping (program, track, year, term,
//! specialization) to an ordered list of subject templates. Resolution probes
//! an explicit ordered list of fallback keys so that fine-grained entries only
//! need to exist where they are genuinely distinct, while every (program,
//! year, term) combination still resolves to something whenever at least a
//! program-level default exists.

use crate::core::models::{Subject, Term};
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Sentinel used in storage keys when no track/specialization is set
pub const DEFAULT_SEGMENT: &str = "default";

/// Tagged lookup key for a curriculum template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    /// Study program (e.g., "Datateknologi")
    pub program: String,
    /// Technical track; `None` when the student picked "no track"
    pub track: Option<String>,
    /// Specialization; `None` when the student picked "no specialization"
    pub specialization: Option<String>,
    /// Study year (1-5)
    pub year: u8,
    /// Exchange term
    pub term: Term,
}

impl CatalogKey {
    /// Create a key with explicit optional segments
    #[must_use]
    pub const fn new(
        program: String,
        track: Option<String>,
        specialization: Option<String>,
        year: u8,
        term: Term,
    ) -> Self {
        Self {
            program,
            track,
            specialization,
            year,
            term,
        }
    }

    /// Deterministic storage form: `program|track|year|term|specialization`,
    /// with `"default"` substituted for absent optional segments
    #[must_use]
    pub fn storage_key(&self) -> String {
        format_storage_key(
            &self.program,
            self.track.as_deref(),
            self.year,
            self.term,
            self.specialization.as_deref(),
        )
    }

    /// The ordered fallback keys to probe: exact, then track-level default,
    /// then program-level default
    #[must_use]
    pub fn probe_keys(&self) -> Vec<String> {
        let mut keys = vec![self.storage_key()];

        let track_default = format_storage_key(
            &self.program,
            self.track.as_deref(),
            self.year,
            self.term,
            None,
        );
        if !keys.contains(&track_default) {
            keys.push(track_default);
        }

        let program_default =
            format_storage_key(&self.program, None, self.year, self.term, None);
        if !keys.contains(&program_default) {
            keys.push(program_default);
        }

        keys
    }
}

fn format_storage_key(
    program: &str,
    track: Option<&str>,
    year: u8,
    term: Term,
    specialization: Option<&str>,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        program.trim(),
        segment_or_default(track),
        year,
        term.key_token(),
        segment_or_default(specialization),
    )
}

/// Normalize an optional key segment: empty or absent maps to `"default"`
fn segment_or_default(segment: Option<&str>) -> &str {
    match segment {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => DEFAULT_SEGMENT,
    }
}

/// Immutable curriculum catalog, indexed by storage key
#[derive(Debug, Clone, Default)]
pub struct CurriculumCatalog {
    entries: HashMap<String, Vec<Subject>>,
}

/// One catalog entry as declared in the TOML catalog file
#[derive(Debug, Deserialize)]
struct CatalogEntryDef {
    program: String,
    #[serde(default)]
    track: Option<String>,
    #[serde(default)]
    specialization: Option<String>,
    year: u8,
    term: String,
    #[serde(default)]
    subjects: Vec<SubjectDef>,
}

/// One subject template as declared in the TOML catalog file
#[derive(Debug, Deserialize)]
struct SubjectDef {
    code: String,
    name: String,
    credits: f32,
    #[serde(default)]
    elective: bool,
    #[serde(default)]
    group: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entry: Vec<CatalogEntryDef>,
}

impl CurriculumCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert a template under a key, replacing any previous entry
    pub fn insert(&mut self, key: &CatalogKey, subjects: Vec<Subject>) {
        self.entries.insert(key.storage_key(), subjects);
    }

    /// Direct lookup by exact key, without fallback
    #[must_use]
    pub fn lookup(&self, key: &CatalogKey) -> Option<&[Subject]> {
        self.entries.get(&key.storage_key()).map(Vec::as_slice)
    }

    /// Resolve the best-matching template for a key.
    ///
    /// Probes the exact key, then the track-level default, then the
    /// program-level default. A miss at every tier returns an empty list -
    /// that is the valid, user-visible "add your own subjects" state, not an
    /// error.
    #[must_use]
    pub fn resolve(&self, key: &CatalogKey) -> Vec<Subject> {
        for probe in key.probe_keys() {
            if let Some(subjects) = self.entries.get(&probe) {
                return subjects.clone();
            }
        }
        Vec::new()
    }

    /// Number of catalog entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a catalog from a TOML string
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or a term token is unknown
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let file: CatalogFile = toml::from_str(toml_str)?;
        let mut catalog = Self::new();

        for def in file.entry {
            let term: Term = def.term.parse()?;
            let key = CatalogKey::new(
                def.program,
                def.track,
                def.specialization,
                def.year,
                term,
            );

            let subjects = def
                .subjects
                .into_iter()
                .map(|s| {
                    if s.elective {
                        let group = s.group.unwrap_or_else(|| "Valgbart emne".to_string());
                        Subject::elective(s.code.clone(), s.code, s.name, s.credits, group)
                    } else {
                        Subject::new(s.code.clone(), s.code, s.name, s.credits)
                    }
                })
                .collect();

            catalog.insert(&key, subjects);
        }

        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
