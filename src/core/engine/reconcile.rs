//! Plan reconciliation: merging a persisted plan back onto the current
//! curriculum template when the plan is reopened for editing
//!
//! Curricula and saved plans drift apart - the template may have changed
//! since the save, or the student may have removed a subject the template
//! still requires. The merge below is template-complete (nothing mandatory
//! silently vanishes), plan-faithful (nothing the student chose is lost),
//! and forward-compatible with curriculum edits.

use crate::core::models::Subject;
use std::collections::HashMap;

/// Result of reconciling a saved plan against the current template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// The active subject list: merged template subjects in template order,
    /// followed by saved subjects the template no longer contains
    pub subjects: Vec<Subject>,

    /// Template subjects the student had removed from the saved plan.
    /// Kept out of the active list so they can be explicitly re-added or
    /// permanently ignored instead of silently resurrecting.
    pub recovered: Vec<Subject>,
}

/// Merge a saved plan's subjects onto the current template.
///
/// Walks the template in order. A template subject whose code exists in the
/// saved plan is emitted with the template's metadata (name and credits may
/// have been corrected upstream) but the saved matches, and is forced
/// selected - it was explicitly part of the saved plan. Template subjects
/// missing from the save go to `recovered` (electives unselected, mandatory
/// subjects always re-offered). Saved subjects absent from the template
/// (ad-hoc and filler courses) are appended as-is with matches preserved.
#[must_use]
pub fn reconcile(saved: &[Subject], template: &[Subject]) -> Reconciliation {
    // Index saved subjects by code; consumed as template entries claim them
    let mut saved_by_code: HashMap<&str, &Subject> =
        saved.iter().map(|s| (s.code.as_str(), s)).collect();
    let saved_order: Vec<&str> = saved.iter().map(|s| s.code.as_str()).collect();

    let mut result = Reconciliation::default();

    for tmpl in template {
        if let Some(kept) = saved_by_code.remove(tmpl.code.as_str()) {
            let mut merged = tmpl.clone();
            merged.matched_with = kept.matched_with.clone();
            // Saved choices are authoritative: found-in-save means selected
            merged.is_selected = true;
            result.subjects.push(merged);
        } else {
            result.recovered.push(tmpl.clone());
        }
    }

    // Remaining saved subjects in their original order
    for code in saved_order {
        if let Some(extra) = saved_by_code.remove(code) {
            result.subjects.push(extra.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::AbroadCourse;

    fn mandatory(code: &str) -> Subject {
        Subject::new(code.to_string(), code.to_string(), format!("Emne {code}"), 7.5)
    }

    fn elective(code: &str) -> Subject {
        Subject::elective(
            code.to_string(),
            code.to_string(),
            format!("Emne {code}"),
            7.5,
            "G1".to_string(),
        )
    }

    fn course(id: &str) -> AbroadCourse {
        AbroadCourse::new(
            id.to_string(),
            id.to_string(),
            format!("Course {id}"),
            "TU Delft".to_string(),
            "Netherlands".to_string(),
            Some("7.5".to_string()),
        )
    }

    #[test]
    fn test_matches_survive_reconciliation() {
        // Saved TMA4100 matched to MATH101; template still has TMA4100
        let mut saved_subject = mandatory("TMA4100");
        saved_subject.matched_with.push(course("MATH101"));

        let result = reconcile(&[saved_subject], &[mandatory("TMA4100")]);

        assert_eq!(result.subjects.len(), 1);
        let merged = &result.subjects[0];
        assert_eq!(merged.code, "TMA4100");
        assert_eq!(merged.matched_with.len(), 1);
        assert_eq!(merged.matched_with[0].id, "MATH101");
        assert!(merged.is_selected);
    }

    #[test]
    fn test_template_metadata_wins() {
        let mut saved_subject = mandatory("TMA4100");
        saved_subject.name = "Old Name".to_string();
        saved_subject.credits = 10.0;
        saved_subject.matched_with.push(course("MATH101"));

        let mut tmpl = mandatory("TMA4100");
        tmpl.name = "Matematikk 1".to_string();

        let result = reconcile(&[saved_subject], &[tmpl]);
        let merged = &result.subjects[0];

        assert_eq!(merged.name, "Matematikk 1");
        assert!((merged.credits - 7.5).abs() < f32::EPSILON);
        assert_eq!(merged.matched_with.len(), 1);
    }

    #[test]
    fn test_removed_mandatory_subject_is_recovered() {
        // Template requires TDT4120 but the saved plan lacks it
        let result = reconcile(&[mandatory("TMA4100")], &[
            mandatory("TMA4100"),
            mandatory("TDT4120"),
        ]);

        assert_eq!(result.subjects.len(), 1);
        assert_eq!(result.recovered.len(), 1);
        assert_eq!(result.recovered[0].code, "TDT4120");
        assert!(!result.recovered[0].is_covered());
    }

    #[test]
    fn test_recovered_elective_defaults_unselected() {
        let result = reconcile(&[], &[elective("TDT4136")]);

        assert!(result.subjects.is_empty());
        assert_eq!(result.recovered.len(), 1);
        assert!(!result.recovered[0].is_selected);
    }

    #[test]
    fn test_selection_asymmetry() {
        // Fresh-from-catalog electives are unselected; reconciled-found
        // electives are forced selected. Saved choices are authoritative.
        let saved_elective = elective("TDT4136"); // is_selected = false in the save
        let result = reconcile(&[saved_elective], &[elective("TDT4136")]);

        assert!(result.subjects[0].is_selected);
    }

    #[test]
    fn test_adhoc_saved_subjects_appended() {
        let mut filler = mandatory("FYLL01");
        filler.matched_with.push(course("X1"));

        let result = reconcile(
            &[mandatory("TMA4100"), filler],
            &[mandatory("TMA4100")],
        );

        assert_eq!(result.subjects.len(), 2);
        assert_eq!(result.subjects[1].code, "FYLL01");
        assert_eq!(result.subjects[1].matched_with.len(), 1);
        assert!(result.recovered.is_empty());
    }

    #[test]
    fn test_template_order_preserved() {
        let result = reconcile(
            &[mandatory("B"), mandatory("A"), mandatory("Z")],
            &[mandatory("A"), mandatory("B")],
        );

        let codes: Vec<&str> = result.subjects.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B", "Z"]);
    }

    #[test]
    fn test_empty_template_keeps_saved_plan() {
        let result = reconcile(&[mandatory("TMA4100")], &[]);

        assert_eq!(result.subjects.len(), 1);
        assert!(result.recovered.is_empty());
    }
}
