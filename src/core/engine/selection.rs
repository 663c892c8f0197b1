//! Elective selection model
//!
//! All state lives on the owning plan's subject array - there is no hidden
//! global state, so undo is a matter of snapshotting the array.

use crate::core::models::Subject;

/// A display cluster of subjects: one elective group, or a single
/// mandatory/group-less subject
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGroup {
    /// Elective group name; `None` for an individually rendered subject
    pub name: Option<String>,
    /// Ids of the member subjects, in plan order
    pub subject_ids: Vec<String>,
}

/// Flip `is_selected` for an elective subject.
///
/// Non-electives and unknown ids are a no-op; callers treating that as a
/// programmer error can check the returned flag.
pub fn toggle_selection(subjects: &mut [Subject], subject_id: &str) -> bool {
    match subjects.iter_mut().find(|s| s.id == subject_id) {
        Some(subject) if subject.is_elective => {
            subject.is_selected = !subject.is_selected;
            true
        }
        _ => false,
    }
}

/// Subjects that count toward the plan: `!is_elective || is_selected`
#[must_use]
pub fn effective_subjects(subjects: &[Subject]) -> Vec<&Subject> {
    subjects.iter().filter(|s| s.is_effective()).collect()
}

/// Sum of home credits over the effective subjects
#[must_use]
pub fn total_credits(subjects: &[Subject]) -> f32 {
    effective_subjects(subjects).iter().map(|s| s.credits).sum()
}

/// Partition subjects for display: electives clustered by group in
/// first-appearance order, everything else rendered individually
#[must_use]
pub fn group_subjects(subjects: &[Subject]) -> Vec<SubjectGroup> {
    let mut groups: Vec<SubjectGroup> = Vec::new();

    for subject in subjects {
        let group_name = if subject.is_elective {
            subject.elective_group.clone()
        } else {
            None
        };

        match group_name {
            Some(name) => {
                if let Some(group) = groups
                    .iter_mut()
                    .find(|g| g.name.as_deref() == Some(name.as_str()))
                {
                    group.subject_ids.push(subject.id.clone());
                } else {
                    groups.push(SubjectGroup {
                        name: Some(name),
                        subject_ids: vec![subject.id.clone()],
                    });
                }
            }
            None => groups.push(SubjectGroup {
                name: None,
                subject_ids: vec![subject.id.clone()],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mandatory(id: &str, credits: f32) -> Subject {
        Subject::new(id.to_string(), id.to_string(), format!("Emne {id}"), credits)
    }

    fn elective(id: &str, group: &str) -> Subject {
        Subject::elective(
            id.to_string(),
            id.to_string(),
            format!("Emne {id}"),
            7.5,
            group.to_string(),
        )
    }

    #[test]
    fn test_toggle_flips_electives_only() {
        let mut subjects = vec![mandatory("s1", 7.5), elective("s2", "G1")];

        assert!(!toggle_selection(&mut subjects, "s1"));
        assert!(!subjects[0].is_selected);

        assert!(toggle_selection(&mut subjects, "s2"));
        assert!(subjects[1].is_selected);
        assert!(toggle_selection(&mut subjects, "s2"));
        assert!(!subjects[1].is_selected);

        assert!(!toggle_selection(&mut subjects, "nope"));
    }

    #[test]
    fn test_total_credits_follows_selection() {
        // 3 mandatory subjects of 7.5 plus 1 of 2 selected electives
        // from a 3-member group yields 30.0
        let mut subjects = vec![
            mandatory("s1", 7.5),
            mandatory("s2", 7.5),
            mandatory("s3", 7.5),
            elective("e1", "G1"),
            elective("e2", "G1"),
            elective("e3", "G1"),
        ];

        assert!((total_credits(&subjects) - 22.5).abs() < f32::EPSILON);

        toggle_selection(&mut subjects, "e1");
        assert!((total_credits(&subjects) - 30.0).abs() < f32::EPSILON);

        // Selecting a second and deselecting it again lands back on 30.0
        toggle_selection(&mut subjects, "e2");
        assert!((total_credits(&subjects) - 37.5).abs() < f32::EPSILON);
        toggle_selection(&mut subjects, "e2");
        assert!((total_credits(&subjects) - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_effective_subjects_filter() {
        let mut subjects = vec![mandatory("s1", 7.5), elective("e1", "G1")];
        assert_eq!(effective_subjects(&subjects).len(), 1);

        toggle_selection(&mut subjects, "e1");
        assert_eq!(effective_subjects(&subjects).len(), 2);
    }

    #[test]
    fn test_group_partition() {
        let subjects = vec![
            mandatory("s1", 7.5),
            elective("e1", "G1"),
            mandatory("s2", 7.5),
            elective("e2", "G1"),
            elective("e3", "G2"),
        ];

        let groups = group_subjects(&subjects);
        assert_eq!(groups.len(), 4);

        assert_eq!(groups[0].name, None);
        assert_eq!(groups[0].subject_ids, vec!["s1".to_string()]);

        assert_eq!(groups[1].name.as_deref(), Some("G1"));
        assert_eq!(groups[1].subject_ids, vec!["e1".to_string(), "e2".to_string()]);

        assert_eq!(groups[2].name, None);
        assert_eq!(groups[3].name.as_deref(), Some("G2"));
    }

    #[test]
    fn test_groupless_elective_renders_individually() {
        let mut subject = elective("e1", "G1");
        subject.elective_group = None;

        let groups = group_subjects(&[subject]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, None);
    }
}
