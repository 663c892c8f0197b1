//! Exchange plan model (aggregate root)

use super::{Subject, Term};
use crate::core::engine::selection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for temporary client-side identifiers, swapped for a durable
/// id once the backing store responds
pub const TEMP_ID_PREFIX: &str = "tmp-";

/// A student's plan for one exchange semester: which home subjects are
/// required and which abroad courses satisfy them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangePlan {
    /// Plan identifier; temporary (`tmp-<uuid>`) until persisted
    pub id: String,

    /// Optional human-readable plan name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,

    /// Home institution (constant for a deployment)
    pub university: String,

    /// Partner institution as a "Country - Institution" composite string
    pub exchange_university: String,

    /// Study program (e.g., "Datateknologi")
    pub program: String,

    /// Technical track, when the program has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_direction: Option<String>,

    /// Specialization, when chosen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,

    /// Study year (1-5)
    pub study_year: u8,

    /// Which term the exchange covers
    pub semester: Term,

    /// Home subjects in display order
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl ExchangePlan {
    /// Create a new in-memory plan with a temporary id
    #[must_use]
    pub fn new(
        university: String,
        exchange_university: String,
        program: String,
        study_year: u8,
        semester: Term,
    ) -> Self {
        Self {
            id: temp_id(),
            plan_name: None,
            university,
            exchange_university,
            program,
            technology_direction: None,
            specialization: None,
            study_year,
            semester,
            subjects: Vec::new(),
        }
    }

    /// Whether this plan still carries a temporary client-side id
    #[must_use]
    pub fn has_temp_id(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }

    /// Replace the temporary id with the durable id assigned by the store
    pub fn assign_durable_id(&mut self, id: String) {
        self.id = id;
    }

    /// Look up a subject by id
    #[must_use]
    pub fn subject(&self, subject_id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == subject_id)
    }

    /// Look up a subject by id, mutably
    pub fn subject_mut(&mut self, subject_id: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.id == subject_id)
    }

    /// Append a subject to the plan
    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// Remove a subject by id
    ///
    /// # Returns
    /// `true` if the subject was removed, `false` if it wasn't in the plan
    pub fn remove_subject(&mut self, subject_id: &str) -> bool {
        if let Some(pos) = self.subjects.iter().position(|s| s.id == subject_id) {
            self.subjects.remove(pos);
            true
        } else {
            false
        }
    }

    /// Flip the selection of an elective subject.
    /// No-op (returns `false`) for non-electives and unknown ids.
    pub fn toggle_selection(&mut self, subject_id: &str) -> bool {
        selection::toggle_selection(&mut self.subjects, subject_id)
    }

    /// Subjects that count toward the plan: mandatory or selected electives
    #[must_use]
    pub fn effective_subjects(&self) -> Vec<&Subject> {
        selection::effective_subjects(&self.subjects)
    }

    /// Home-credit total over the effective subjects
    #[must_use]
    pub fn total_credits(&self) -> f32 {
        selection::total_credits(&self.subjects)
    }
}

/// Mint a fresh temporary plan id
#[must_use]
pub fn temp_id() -> String {
    format!("{TEMP_ID_PREFIX}{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ExchangePlan {
        ExchangePlan::new(
            "NTNU".to_string(),
            "Netherlands - TU Delft".to_string(),
            "Datateknologi".to_string(),
            3,
            Term::Autumn,
        )
    }

    #[test]
    fn test_plan_creation() {
        let plan = plan();

        assert!(plan.has_temp_id());
        assert_eq!(plan.program, "Datateknologi");
        assert_eq!(plan.study_year, 3);
        assert_eq!(plan.semester, Term::Autumn);
        assert!(plan.subjects.is_empty());
        assert!(plan.plan_name.is_none());
    }

    #[test]
    fn test_temp_ids_are_unique() {
        assert_ne!(temp_id(), temp_id());
    }

    #[test]
    fn test_assign_durable_id() {
        let mut plan = plan();
        plan.assign_durable_id("plan-42".to_string());

        assert!(!plan.has_temp_id());
        assert_eq!(plan.id, "plan-42");
    }

    #[test]
    fn test_add_remove_subject() {
        let mut plan = plan();
        plan.add_subject(Subject::new(
            "s1".to_string(),
            "TMA4100".to_string(),
            "Matematikk 1".to_string(),
            7.5,
        ));

        assert!(plan.subject("s1").is_some());
        assert!(plan.remove_subject("s1"));
        assert!(plan.subject("s1").is_none());
        assert!(!plan.remove_subject("s1"));
    }

    #[test]
    fn test_subject_mut() {
        let mut plan = plan();
        plan.add_subject(Subject::new(
            "s1".to_string(),
            "TMA4100".to_string(),
            "Matematikk 1".to_string(),
            7.5,
        ));

        plan.subject_mut("s1").unwrap().name = "Matematikk 1 GK".to_string();
        assert_eq!(plan.subject("s1").unwrap().name, "Matematikk 1 GK");
    }
}
