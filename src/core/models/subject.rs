//! Subject model

use super::AbroadCourse;
use crate::core::engine::completeness::parse_ects;
use serde::{Deserialize, Serialize};

/// A home-institution course requirement within an exchange plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Opaque identifier, stable within a plan
    pub id: String,

    /// Course code (e.g., "TMA4100", "TDT4120")
    pub code: String,

    /// Course name (e.g., "Matematikk 1")
    pub name: String,

    /// Credit value in ECTS (typically 7.5 or 15.0; 0.0 for milestone courses)
    pub credits: f32,

    /// Whether this subject is an elective
    pub is_elective: bool,

    /// Elective group name; present only for electives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elective_group: Option<String>,

    /// Whether the student opted into this elective (meaningful only when elective)
    #[serde(default)]
    pub is_selected: bool,

    /// Abroad courses matched against this subject, in match order
    #[serde(default)]
    pub matched_with: Vec<AbroadCourse>,
}

impl Subject {
    /// Create a new mandatory subject
    ///
    /// # Arguments
    /// * `id` - Stable identifier within the plan
    /// * `code` - Course code
    /// * `name` - Full course name
    /// * `credits` - ECTS credit value
    #[must_use]
    pub const fn new(id: String, code: String, name: String, credits: f32) -> Self {
        Self {
            id,
            code,
            name,
            credits,
            is_elective: false,
            elective_group: None,
            is_selected: false,
            matched_with: Vec::new(),
        }
    }

    /// Create a new elective subject belonging to an elective group.
    /// Electives start unselected until the student opts in.
    #[must_use]
    pub const fn elective(
        id: String,
        code: String,
        name: String,
        credits: f32,
        group: String,
    ) -> Self {
        Self {
            id,
            code,
            name,
            credits,
            is_elective: true,
            elective_group: Some(group),
            is_selected: false,
            matched_with: Vec::new(),
        }
    }

    /// Whether this subject counts toward the plan totals
    /// (mandatory, or an elective the student selected)
    #[must_use]
    pub const fn is_effective(&self) -> bool {
        !self.is_elective || self.is_selected
    }

    /// Whether at least one abroad course is matched against this subject
    #[must_use]
    pub const fn is_covered(&self) -> bool {
        !self.matched_with.is_empty()
    }

    /// Sum of the matched abroad courses' ECTS values.
    ///
    /// May exceed, equal, or fall short of `credits`; mismatches are
    /// reported, never forbidden.
    #[must_use]
    pub fn matched_ects(&self) -> f32 {
        self.matched_with
            .iter()
            .map(|course| course.ects.as_deref().map_or(0.0, parse_ects))
            .sum()
    }

    /// Matched ECTS minus the subject's own credit value
    #[must_use]
    pub fn credit_gap(&self) -> f32 {
        self.matched_ects() - self.credits
    }
}
