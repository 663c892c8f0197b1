//! Status command handler

use std::path::Path;

use chrono::{Local, NaiveDate};
use exchange_planner::config::Config;
use exchange_planner::core::catalog::{CatalogKey, CurriculumCatalog};
use exchange_planner::core::engine::completeness::TARGET_SEMESTER_ECTS;
use exchange_planner::core::engine::{
    ects_shortfall, is_complete, reconcile, total_matched_ects, EquivalenceTable,
};
use exchange_planner::core::models::{AbroadCourse, ExchangePlan, Subject};
use exchange_planner::core::persistence::read_plan_file;
use exchange_planner::{error, info, warn};

/// Run the status command: print a saved plan's coverage and credit totals.
///
/// The saved subject list is reconciled against the current catalog template
/// when a catalog is configured, so the report reflects curriculum changes
/// made since the plan was saved. Matches with an approval older than five
/// years are flagged, and uncovered subjects list their interchangeable
/// codes from the configured equivalence table.
pub fn run(plan_file: &Path, config: &Config) {
    if let Err(err) = show_status(plan_file, config) {
        error!("Status failed for {}: {err}", plan_file.display());
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn show_status(plan_file: &Path, config: &Config) -> Result<(), String> {
    let mut plan = read_plan_file(plan_file).map_err(|e| format!("✗ {e}"))?;
    info!("Plan loaded: {}", plan_file.display());

    let recovered = refresh_against_catalog(&mut plan, config);
    let equivalences = load_equivalences(config);
    let today = Local::now().date_naive();

    println!("\n=== {} ===\n", display_name(&plan));
    println!("  Program:       {}", plan.program);
    if let Some(track) = &plan.technology_direction {
        println!("  Track:         {track}");
    }
    if let Some(specialization) = &plan.specialization {
        println!("  Specialization: {specialization}");
    }
    println!("  Exchange:      {}", plan.exchange_university);
    println!("  Term:          {} (år {})\n", plan.semester, plan.study_year);

    for subject in plan.effective_subjects() {
        let flag = if subject.is_covered() { "✓" } else { "✗" };
        println!(
            "  {flag} {:<10} {:<45} {:>5.1} hjemme / {:>5.1} ECTS",
            subject.code,
            subject.name,
            subject.credits,
            subject.matched_ects()
        );
        for course in &subject.matched_with {
            println!(
                "      ↳ {} {} ({}){}",
                course.code,
                course.name,
                course.university,
                approval_note(course, today)
            );
        }
        if !subject.is_covered() {
            if let Some(hint) = equivalence_hint(&equivalences, &subject.code) {
                println!("      {hint}");
            }
        }
    }

    println!(
        "\n  Home credits:  {:.1}\n  Matched ECTS:  {:.1} / {:.1}",
        plan.total_credits(),
        total_matched_ects(&plan),
        TARGET_SEMESTER_ECTS
    );

    if is_complete(&plan) {
        println!("  Status:        ✓ Complete");
    } else {
        println!(
            "  Status:        ✗ Incomplete ({:.1} ECTS short)",
            ects_shortfall(&plan)
        );
    }

    if !recovered.is_empty() {
        println!("\n  Subjects in the current curriculum but not in this plan:");
        for subject in &recovered {
            println!("    - {} {}", subject.code, subject.name);
        }
    }

    Ok(())
}

/// Reconcile the saved subject list against the current catalog template.
///
/// Returns the template subjects missing from the saved plan. On any catalog
/// problem the plan is shown as saved.
fn refresh_against_catalog(plan: &mut ExchangePlan, config: &Config) -> Vec<Subject> {
    let catalog_path = &config.paths.catalog_file;
    if catalog_path.is_empty() {
        return Vec::new();
    }

    let catalog = match CurriculumCatalog::from_file(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Skipping catalog reconciliation, could not load '{catalog_path}': {e}");
            return Vec::new();
        }
    };

    let key = CatalogKey::new(
        plan.program.clone(),
        plan.technology_direction.clone(),
        plan.specialization.clone(),
        plan.study_year,
        plan.semester,
    );
    let template = catalog.resolve(&key);
    if template.is_empty() {
        return Vec::new();
    }

    let merged = reconcile(&plan.subjects, &template);
    plan.subjects = merged.subjects;
    merged.recovered
}

/// The configured equivalence table, or the built-in pairs when no file is
/// set or the file cannot be read
fn load_equivalences(config: &Config) -> EquivalenceTable {
    let path = &config.paths.equivalences_file;
    if path.is_empty() {
        return EquivalenceTable::with_defaults();
    }

    match EquivalenceTable::from_file(path) {
        Ok(table) => table,
        Err(e) => {
            warn!("Falling back to built-in equivalences, could not load '{path}': {e}");
            EquivalenceTable::with_defaults()
        }
    }
}

/// Note appended to a match line when its approval has gone stale
fn approval_note(course: &AbroadCourse, today: NaiveDate) -> &'static str {
    if course.is_stale(today) {
        " ⚠ approval older than five years"
    } else {
        ""
    }
}

/// Hint line for an uncovered subject whose code has registered equivalents
fn equivalence_hint(table: &EquivalenceTable, code: &str) -> Option<String> {
    let equivalents = table.equivalents_of(code);
    if equivalents.is_empty() {
        None
    } else {
        Some(format!("also satisfiable as {}", equivalents.join(", ")))
    }
}

fn display_name(plan: &ExchangePlan) -> String {
    plan.plan_name
        .clone()
        .unwrap_or_else(|| format!("{} {} - år {}", plan.program, plan.semester, plan.study_year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn course() -> AbroadCourse {
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
    fn test_approval_note_flags_old_approvals() {
        let mut course = course();
        assert_eq!(approval_note(&course, date(2030, 1, 1)), "");

        course.approved_at = Some(date(2020, 6, 1));
        assert_eq!(approval_note(&course, date(2025, 6, 1)), "");
        assert!(approval_note(&course, date(2025, 6, 2)).contains("older than five years"));
    }

    #[test]
    fn test_equivalence_hint() {
        let table = EquivalenceTable::with_defaults();

        let hint = equivalence_hint(&table, "TMA4240").unwrap();
        assert!(hint.contains("TMA4245"));
        assert!(equivalence_hint(&table, "TDT4120").is_none());
    }

    #[test]
    fn test_load_equivalences_merges_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equivalences.toml");
        std::fs::write(&path, "pairs = [[\"TDT4100\", \"TDT4102\"]]\n").unwrap();

        let mut config = Config::from_defaults();
        config.paths.equivalences_file = path.to_string_lossy().to_string();

        let table = load_equivalences(&config);
        assert!(table.is_compatible("TDT4100", "TDT4102"));
        // Built-in pairs survive the file load
        assert!(table.is_compatible("TMA4240", "TMA4245"));

        // Unreadable file falls back to the built-ins
        config.paths.equivalences_file = dir
            .path()
            .join("missing.toml")
            .to_string_lossy()
            .to_string();
        let fallback = load_equivalences(&config);
        assert!(fallback.is_compatible("TMA4240", "TMA4245"));
        assert!(!fallback.is_compatible("TDT4100", "TDT4102"));
    }
}
