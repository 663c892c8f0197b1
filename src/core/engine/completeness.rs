//! Completeness predicate and ECTS aggregation

use crate::core::models::{ExchangePlan, Subject};
use uuid::Uuid;

/// Target abroad ECTS for one exchange semester
pub const TARGET_SEMESTER_ECTS: f32 = 30.0;

/// Default credit value for a synthesized filler subject
pub const FILLER_CREDITS: f32 = 7.5;

/// Parse a string-encoded ECTS decimal.
///
/// Accepts both dot and comma decimal separators ("7.5" and "7,5");
/// missing or unparseable input counts as 0.0.
#[must_use]
pub fn parse_ects(raw: &str) -> f32 {
    raw.trim().replace(',', ".").parse::<f32>().unwrap_or(0.0)
}

/// Whether every effective subject has at least one match.
///
/// This is the gate for the "proceed to export" action; an incomplete plan
/// is a progress state, not an error.
#[must_use]
pub fn is_complete(plan: &ExchangePlan) -> bool {
    plan.effective_subjects().iter().all(|s| s.is_covered())
}

/// Sum of matched abroad ECTS over the effective subjects
#[must_use]
pub fn total_matched_ects(plan: &ExchangePlan) -> f32 {
    plan.effective_subjects()
        .iter()
        .map(|s| s.matched_ects())
        .sum()
}

/// How far the matched ECTS fall short of [`TARGET_SEMESTER_ECTS`],
/// clamped at zero
#[must_use]
pub fn ects_shortfall(plan: &ExchangePlan) -> f32 {
    (TARGET_SEMESTER_ECTS - total_matched_ects(plan)).max(0.0)
}

/// Synthesize a pre-selected filler subject.
///
/// Used when the student is fully matched but short of the credit target,
/// modelling a credit-only placeholder without fabricating a fictitious match.
#[must_use]
pub fn filler_subject(code: String, name: String) -> Subject {
    let mut subject = Subject::elective(
        format!("filler-{}", Uuid::new_v4()),
        code,
        name,
        FILLER_CREDITS,
        "Fyllemne".to_string(),
    );
    subject.is_selected = true;
    subject
}
