//! Abroad course model

use crate::core::engine::completeness::parse_ects;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How many years an approval stays fresh before the record is flagged
pub const APPROVAL_FRESHNESS_YEARS: i32 = 5;

/// A course offered by a partner institution that can satisfy a home subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbroadCourse {
    /// Opaque identifier
    pub id: String,

    /// Course code at the host institution (e.g., "MATH101")
    pub code: String,

    /// Course name
    pub name: String,

    /// Host institution name
    pub university: String,

    /// Host country
    pub country: String,

    /// ECTS value, string-encoded decimal as supplied by the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ects: Option<String>,

    /// Whether the record came from the shared catalog (vs. user-submitted)
    #[serde(default)]
    pub is_verified: bool,

    /// Term the course runs in, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,

    /// Attribution for unverified, user-submitted records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,

    /// Date the pairing was approved; used to flag stale records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<NaiveDate>,
}

impl AbroadCourse {
    /// Create a new abroad course
    ///
    /// # Arguments
    /// * `id` - Opaque identifier
    /// * `code` - Host course code
    /// * `name` - Course name
    /// * `university` - Host institution
    /// * `country` - Host country
    /// * `ects` - Optional string-encoded ECTS value
    #[must_use]
    pub const fn new(
        id: String,
        code: String,
        name: String,
        university: String,
        country: String,
        ects: Option<String>,
    ) -> Self {
        Self {
            id,
            code,
            name,
            university,
            country,
            ects,
            is_verified: false,
            semester: None,
            added_by: None,
            approved_at: None,
        }
    }

    /// Parsed ECTS value; 0.0 when missing or unparseable
    #[must_use]
    pub fn ects_value(&self) -> f32 {
        self.ects.as_deref().map_or(0.0, parse_ects)
    }

    /// Whether the approval is older than [`APPROVAL_FRESHNESS_YEARS`].
    /// Courses without an approval date are never flagged.
    #[must_use]
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.approved_at.is_some_and(|approved| {
            let target_year = approved.year() + APPROVAL_FRESHNESS_YEARS;
            // Feb 29 approvals roll to Mar 1 when the target year has no leap day
            let cutoff = approved
                .with_year(target_year)
                .or_else(|| NaiveDate::from_ymd_opt(target_year, 3, 1))
                .unwrap_or(approved);
            today > cutoff
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> AbroadCourse {
        AbroadCourse::new(
            "a1".to_string(),
            "MATH101".to_string(),
            "Calculus I".to_string(),
            "TU Delft".to_string(),
            "Netherlands".to_string(),
            Some("7.5".to_string()),
        )
    }

    #[test]
    fn test_course_creation() {
        let course = sample();

        assert_eq!(course.code, "MATH101");
        assert_eq!(course.university, "TU Delft");
        assert!(!course.is_verified);
        assert!(course.semester.is_none());
        assert!(course.added_by.is_none());
        assert!(course.approved_at.is_none());
    }

    #[test]
    fn test_ects_value() {
        let course = sample();
        assert!((course.ects_value() - 7.5).abs() < f32::EPSILON);

        let mut missing = sample();
        missing.ects = None;
        assert!(missing.ects_value().abs() < f32::EPSILON);

        let mut garbage = sample();
        garbage.ects = Some("n/a".to_string());
        assert!(garbage.ects_value().abs() < f32::EPSILON);
    }

    #[test]
    fn test_staleness_boundary() {
        let mut course = sample();
        course.approved_at = Some(date(2020, 6, 1));

        // Exactly five years later is still fresh; one day past is stale
        assert!(!course.is_stale(date(2025, 6, 1)));
        assert!(course.is_stale(date(2025, 6, 2)));
    }

    #[test]
    fn test_leap_day_approval_rolls_to_march() {
        let mut course = sample();
        course.approved_at = Some(date(2024, 2, 29));

        // 2029 has no Feb 29; the cutoff becomes 2029-03-01
        assert!(!course.is_stale(date(2024, 3, 1)));
        assert!(!course.is_stale(date(2029, 3, 1)));
        assert!(course.is_stale(date(2029, 3, 2)));
    }

    #[test]
    fn test_no_approval_date_never_stale() {
        let course = sample();
        assert!(!course.is_stale(date(2099, 1, 1)));
    }
}
