//! Match engine: binds abroad-course records to home subjects
//!
//! Covers code-equivalence aliasing, duplicate prevention across subjects,
//! compatible-first candidate ranking, and manual match authoring gated by
//! the shared pairing registry.

use crate::core::models::{AbroadCourse, ExchangePlan};
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Static, symmetric table of mutually interchangeable home course codes
#[derive(Debug, Clone, Default)]
pub struct EquivalenceTable {
    pairs: HashSet<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct EquivalenceFile {
    #[serde(default)]
    pairs: Vec<(String, String)>,
}

impl EquivalenceTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            pairs: HashSet::new(),
        }
    }

    /// Table pre-seeded with the known interchangeable code pairs
    /// (parallel statistics and physics variants)
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.add_pair("TMA4240", "TMA4245");
        table.add_pair("TFY4104", "TFY4106");
        table.add_pair("TFY4115", "TFY4106");
        table
    }

    /// Register a pair of interchangeable codes (symmetric by construction)
    pub fn add_pair(&mut self, a: &str, b: &str) {
        self.pairs.insert((a.to_string(), b.to_string()));
    }

    /// Whether two home codes are interchangeable: exact equality, or
    /// table membership checked in both directions
    #[must_use]
    pub fn is_compatible(&self, home_code: &str, other_code: &str) -> bool {
        home_code == other_code
            || self
                .pairs
                .contains(&(home_code.to_string(), other_code.to_string()))
            || self
                .pairs
                .contains(&(other_code.to_string(), home_code.to_string()))
    }

    /// Codes interchangeable with the given one, sorted, the code itself
    /// excluded
    #[must_use]
    pub fn equivalents_of(&self, code: &str) -> Vec<String> {
        let mut codes: Vec<String> = self
            .pairs
            .iter()
            .filter_map(|(a, b)| {
                if a == code {
                    Some(b.clone())
                } else if b == code {
                    Some(a.clone())
                } else {
                    None
                }
            })
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }

    /// Parse additional pairs from a TOML string
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let file: EquivalenceFile = toml::from_str(toml_str)?;
        let mut table = Self::with_defaults();
        for (a, b) in file.pairs {
            table.add_pair(&a, &b);
        }
        Ok(table)
    }

    /// Load a table from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// A pool entry offered to the student: the abroad course plus the home
/// code it is advertised to satisfy, when the pool knows one
#[derive(Debug, Clone, PartialEq)]
pub struct AbroadCandidate {
    /// The abroad course record
    pub course: AbroadCourse,
    /// Home subject code this candidate is known to satisfy
    pub matches_home_code: Option<String>,
}

/// Candidate pool collaborator: supplies approved abroad courses for
/// an institution. Fuzzy institution-name normalization is the
/// collaborator's responsibility, not this engine's.
pub trait CoursePool {
    /// Fetch the approved course pool for a partner institution
    ///
    /// # Errors
    /// Returns an error when the pool cannot be reached or read
    fn fetch_approved_courses(
        &self,
        institution: &str,
    ) -> Result<Vec<AbroadCandidate>, Box<dyn Error>>;
}

/// A (home course, abroad course, institution) pairing as shared through
/// the course bank
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    /// Home course code
    pub home_code: String,
    /// Abroad course code
    pub abroad_code: String,
    /// Abroad course name
    pub abroad_name: String,
    /// String-encoded ECTS, when known
    pub ects: Option<String>,
    /// Partner institution
    pub institution: String,
}

/// Shared-catalog collaborator: existence check before accepting a
/// manual match, and the opt-in contribution side channel
pub trait PairingRegistry {
    /// Whether this exact (home, abroad, institution) triple already exists
    fn pairing_exists(&self, home_code: &str, abroad_code: &str, institution: &str) -> bool;

    /// Contribute a pairing back to the shared catalog (fire-and-forget)
    ///
    /// # Errors
    /// Returns an error when the registry rejects or cannot store the pairing
    fn submit_pairing(&self, pairing: &Pairing) -> Result<(), Box<dyn Error>>;
}

/// Hand-entered match input for an abroad course not present in the pool
#[derive(Debug, Clone, Default)]
pub struct ManualMatch {
    /// Home subject code the match targets
    pub home_code: String,
    /// Abroad course code
    pub abroad_code: String,
    /// Abroad course name
    pub abroad_name: String,
    /// String-encoded ECTS, when known
    pub ects: Option<String>,
}

impl ManualMatch {
    /// Validate the input locally, before any collaborator call
    ///
    /// # Errors
    /// Returns one message per missing required field
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.home_code.trim().is_empty() {
            errors.push("Missing home course code".to_string());
        }
        if self.abroad_code.trim().is_empty() {
            errors.push("Missing abroad course code".to_string());
        }
        if self.abroad_name.trim().is_empty() {
            errors.push("Missing abroad course name".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Result of authoring a manual match
#[derive(Debug, Clone)]
pub struct ManualMatchOutcome {
    /// The course record appended to the subject
    pub course: AbroadCourse,
    /// True when the pairing is absent from the shared catalog, so the
    /// caller may offer to contribute it
    pub offer_contribution: bool,
}

/// Append an abroad course to a subject's match list.
///
/// Multiple matches per subject are allowed; the one-slot-until-opt-in rule
/// is a presentation policy layered on top and never enforced here.
///
/// # Returns
/// `false` when the subject id is unknown
pub fn add_match(plan: &mut ExchangePlan, subject_id: &str, course: AbroadCourse) -> bool {
    plan.subject_mut(subject_id).is_some_and(|subject| {
        subject.matched_with.push(course);
        true
    })
}

/// Remove a matched abroad course from a subject.
/// The subject becomes uncovered when its list empties.
///
/// # Returns
/// `false` when the subject or the match is unknown
pub fn remove_match(plan: &mut ExchangePlan, subject_id: &str, course_id: &str) -> bool {
    plan.subject_mut(subject_id).is_some_and(|subject| {
        if let Some(pos) = subject.matched_with.iter().position(|c| c.id == course_id) {
            subject.matched_with.remove(pos);
            true
        } else {
            false
        }
    })
}

/// Whether an abroad course is already matched against any subject of the plan
#[must_use]
pub fn is_matched_anywhere(plan: &ExchangePlan, course_id: &str) -> bool {
    plan.subjects
        .iter()
        .any(|s| s.matched_with.iter().any(|c| c.id == course_id))
}

/// The match engine proper: compatibility, ranking, and manual authoring
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    equivalences: EquivalenceTable,
}

impl MatchEngine {
    /// Create an engine over an equivalence table
    #[must_use]
    pub const fn new(equivalences: EquivalenceTable) -> Self {
        Self { equivalences }
    }

    /// Whether two home codes are interchangeable (symmetric)
    #[must_use]
    pub fn is_compatible(&self, home_code: &str, other_code: &str) -> bool {
        self.equivalences.is_compatible(home_code, other_code)
    }

    /// Whether a candidate can satisfy some effective subject of the plan
    #[must_use]
    pub fn is_candidate_compatible(&self, plan: &ExchangePlan, candidate: &AbroadCandidate) -> bool {
        candidate.matches_home_code.as_deref().is_some_and(|code| {
            plan.effective_subjects()
                .iter()
                .any(|s| self.is_compatible(&s.code, code))
        })
    }

    /// Filter and rank the candidate pool for display.
    ///
    /// Courses already matched anywhere in the plan are excluded (prevents
    /// one abroad course satisfying two home subjects by accident).
    /// Compatible candidates always come before incompatible ones; ties
    /// break by course name, ascending.
    #[must_use]
    pub fn available_candidates(
        &self,
        plan: &ExchangePlan,
        pool: Vec<AbroadCandidate>,
    ) -> Vec<AbroadCandidate> {
        let mut candidates: Vec<AbroadCandidate> = pool
            .into_iter()
            .filter(|c| !is_matched_anywhere(plan, &c.course.id))
            .collect();

        candidates.sort_by(|a, b| {
            let a_compat = self.is_candidate_compatible(plan, a);
            let b_compat = self.is_candidate_compatible(plan, b);
            b_compat
                .cmp(&a_compat)
                .then_with(|| a.course.name.to_lowercase().cmp(&b.course.name.to_lowercase()))
        });

        candidates
    }

    /// Record a hand-entered match after local validation and the shared
    /// catalog existence check.
    ///
    /// The match is recorded locally either way; `offer_contribution` tells
    /// the caller whether to offer contributing the pairing back (the
    /// contribution itself is a side effect outside this engine).
    ///
    /// # Errors
    /// Returns validation messages for malformed input, or a single message
    /// when the subject id is unknown
    pub fn author_manual_match(
        &self,
        plan: &mut ExchangePlan,
        subject_id: &str,
        input: &ManualMatch,
        registry: &dyn PairingRegistry,
    ) -> Result<ManualMatchOutcome, Vec<String>> {
        input.validate()?;

        if plan.subject(subject_id).is_none() {
            return Err(vec![format!("Unknown subject id: '{subject_id}'")]);
        }

        let (country, institution) = split_exchange_university(&plan.exchange_university);
        let known = registry.pairing_exists(&input.home_code, &input.abroad_code, institution);

        let mut course = AbroadCourse::new(
            format!("manual-{}", Uuid::new_v4()),
            input.abroad_code.trim().to_string(),
            input.abroad_name.trim().to_string(),
            institution.to_string(),
            country.to_string(),
            input.ects.clone(),
        );
        course.is_verified = false;

        add_match(plan, subject_id, course.clone());

        Ok(ManualMatchOutcome {
            course,
            offer_contribution: !known,
        })
    }
}

/// Split the "Country - Institution" composite into its parts.
/// A composite without the separator is treated as an institution name only.
#[must_use]
pub fn split_exchange_university(composite: &str) -> (&str, &str) {
    composite
        .split_once(" - ")
        .map_or(("", composite.trim()), |(country, institution)| {
            (country.trim(), institution.trim())
        })
}
