//! Resolve command handler

use exchange_planner::config::Config;
use exchange_planner::core::catalog::{CatalogKey, CurriculumCatalog};
use exchange_planner::core::models::{Subject, Term};
use exchange_planner::{error, info};

/// Run the resolve command: look up a curriculum template and print it.
///
/// # Arguments
/// * `program` - Study program name
/// * `track` - Optional technical track
/// * `specialization` - Optional specialization
/// * `year` - Study year
/// * `term` - Term string (e.g., "host", "var")
/// * `config` - Configuration containing the catalog file path
pub fn run(
    program: &str,
    track: Option<&str>,
    specialization: Option<&str>,
    year: u8,
    term: &str,
    config: &Config,
) {
    if let Err(err) = resolve_template(program, track, specialization, year, term, config) {
        error!("Resolve failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn resolve_template(
    program: &str,
    track: Option<&str>,
    specialization: Option<&str>,
    year: u8,
    term: &str,
    config: &Config,
) -> Result<(), String> {
    let term: Term = term.parse()?;

    let catalog_path = &config.paths.catalog_file;
    if catalog_path.is_empty() {
        return Err(
            "✗ No catalog file configured. Set one with: explan config set catalog_file <path>"
                .to_string(),
        );
    }

    let catalog = CurriculumCatalog::from_file(catalog_path)
        .map_err(|e| format!("✗ Failed to load catalog '{catalog_path}': {e}"))?;
    info!("Catalog loaded: {catalog_path} ({} entries)", catalog.len());

    let key = CatalogKey::new(
        program.to_string(),
        track.map(str::to_string),
        specialization.map(str::to_string),
        year,
        term,
    );
    let subjects = catalog.resolve(&key);

    println!(
        "\n=== Curriculum: {program}, år {year}, {} ===\n",
        term.label()
    );

    if subjects.is_empty() {
        println!("No curriculum template found for this combination.");
        println!("Start from an empty plan and add your own subjects.");
        return Ok(());
    }

    print_subjects(&subjects);

    let mandatory_credits: f32 = subjects
        .iter()
        .filter(|s| !s.is_elective)
        .map(|s| s.credits)
        .sum();
    println!(
        "\n{} subjects ({:.1} mandatory credits)",
        subjects.len(),
        mandatory_credits
    );

    Ok(())
}

fn print_subjects(subjects: &[Subject]) {
    for subject in subjects {
        let kind = if subject.is_elective {
            subject
                .elective_group
                .clone()
                .unwrap_or_else(|| "Valgbart emne".to_string())
        } else {
            "Obligatorisk".to_string()
        };
        println!(
            "  {:<10} {:<45} {:>5.1}  [{kind}]",
            subject.code, subject.name, subject.credits
        );
    }
}
