//! Export module: serialization of a finished plan into a document
//!
//! Export is pure serialization with no additional business rules - the
//! completeness gate lives in the engine, and pagination is the sink's
//! formatting concern, not a domain invariant.

pub mod formats;

use crate::core::engine::completeness::{
    ects_shortfall, is_complete, total_matched_ects, TARGET_SEMESTER_ECTS,
};
use crate::core::models::{ExchangePlan, Subject};
use std::error::Error;
use std::path::Path;

pub use formats::{ExportFormat, MarkdownRenderer, TextRenderer};

/// Data context for document rendering
///
/// Aggregates the plan and its computed totals so templates have a single
/// source of truth.
#[derive(Debug, Clone)]
pub struct ExportContext<'a> {
    /// The plan being exported
    pub plan: &'a ExchangePlan,
}

impl<'a> ExportContext<'a> {
    /// Create a new export context
    #[must_use]
    pub const fn new(plan: &'a ExchangePlan) -> Self {
        Self { plan }
    }

    /// The subjects that appear in the document
    #[must_use]
    pub fn effective_subjects(&self) -> Vec<&Subject> {
        self.plan.effective_subjects()
    }

    /// Home-credit total over the effective subjects
    #[must_use]
    pub fn total_credits(&self) -> f32 {
        self.plan.total_credits()
    }

    /// Matched abroad ECTS total
    #[must_use]
    pub fn total_matched_ects(&self) -> f32 {
        total_matched_ects(self.plan)
    }

    /// Remaining ECTS toward the semester target
    #[must_use]
    pub fn ects_shortfall(&self) -> f32 {
        ects_shortfall(self.plan)
    }

    /// The semester ECTS target
    #[must_use]
    pub const fn target_ects(&self) -> f32 {
        TARGET_SEMESTER_ECTS
    }

    /// Whether every effective subject is covered
    #[must_use]
    pub fn is_complete(&self) -> bool {
        is_complete(self.plan)
    }

    /// Display name: the explicit plan name, or a derived one
    #[must_use]
    pub fn display_name(&self) -> String {
        self.plan.plan_name.clone().unwrap_or_else(|| {
            format!(
                "{} {} - år {}",
                self.plan.program, self.plan.semester, self.plan.study_year
            )
        })
    }
}

/// Trait for document renderers
pub trait DocumentRenderer {
    /// Render the document to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, ctx: &ExportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Render the document content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &ExportContext) -> Result<String, Box<dyn Error>>;
}
