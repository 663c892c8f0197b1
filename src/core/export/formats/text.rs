//! Plain-text document renderer
//!
//! Same content as the Markdown document, printable as-is. Pagination is
//! the receiving sink's concern.

use crate::core::export::{DocumentRenderer, ExportContext};
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded plain-text document template
const TEXT_TEMPLATE: &str = include_str!("../templates/plan.txt");

/// Plain-text document renderer
pub struct TextRenderer;

impl TextRenderer {
    /// Create a new text renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ExportContext) -> String {
        let mut output = TEXT_TEMPLATE.to_string();

        output = output.replace("{{plan_name}}", &ctx.display_name());
        output = output.replace("{{university}}", &ctx.plan.university);
        output = output.replace("{{exchange_university}}", &ctx.plan.exchange_university);
        output = output.replace("{{program}}", &ctx.plan.program);
        output = output.replace(
            "{{technology_direction}}",
            ctx.plan.technology_direction.as_deref().unwrap_or("-"),
        );
        output = output.replace(
            "{{specialization}}",
            ctx.plan.specialization.as_deref().unwrap_or("-"),
        );
        output = output.replace("{{study_year}}", &ctx.plan.study_year.to_string());
        output = output.replace("{{semester}}", &ctx.plan.semester.to_string());

        output = output.replace("{{total_credits}}", &format!("{:.1}", ctx.total_credits()));
        output = output.replace(
            "{{total_matched_ects}}",
            &format!("{:.1}", ctx.total_matched_ects()),
        );
        output = output.replace("{{target_ects}}", &format!("{:.1}", ctx.target_ects()));
        output = output.replace("{{ects_shortfall}}", &format!("{:.1}", ctx.ects_shortfall()));
        output = output.replace(
            "{{status}}",
            if ctx.is_complete() {
                "COMPLETE"
            } else {
                "INCOMPLETE"
            },
        );

        output = output.replace("{{subject_blocks}}", &Self::generate_subject_blocks(ctx));

        output
    }

    fn generate_subject_blocks(ctx: &ExportContext) -> String {
        let mut blocks = String::new();

        for subject in ctx.effective_subjects() {
            let _ = writeln!(
                blocks,
                "{} - {} ({:.1} credits)",
                subject.code, subject.name, subject.credits
            );

            if subject.matched_with.is_empty() {
                blocks.push_str("    !! NOT COVERED - no abroad course matched\n\n");
                continue;
            }

            for course in &subject.matched_with {
                let _ = writeln!(
                    blocks,
                    "    {} {} @ {} ({:.1} ECTS, {})",
                    course.code,
                    course.name,
                    course.university,
                    course.ects_value(),
                    course.semester.as_deref().unwrap_or("-")
                );
            }
            blocks.push('\n');
        }

        blocks
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for TextRenderer {
    fn generate(&self, ctx: &ExportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render(&self, ctx: &ExportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}
