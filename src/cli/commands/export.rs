//! Export command handler

use std::path::{Path, PathBuf};

use exchange_planner::config::Config;
use exchange_planner::core::export::{ExportContext, ExportFormat};
use exchange_planner::core::persistence::read_plan_file;
use exchange_planner::{error, info};

/// Run the export command: render a saved plan as a document.
///
/// # Arguments
/// * `plan_file` - Path to a stored plan JSON document
/// * `output` - Optional output file path; defaults to the exports directory
/// * `format` - Format string ("markdown"/"md" or "text"/"txt")
/// * `config` - Configuration containing the exports directory
pub fn run(plan_file: &Path, output: Option<&Path>, format: &str, config: &Config) {
    match export_plan(plan_file, output, format, config) {
        Ok(output_path) => {
            println!("✓ Plan exported: {}", output_path.display());
        }
        Err(err) => {
            error!("Export failed for {}: {err}", plan_file.display());
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn export_plan(
    plan_file: &Path,
    output: Option<&Path>,
    format: &str,
    config: &Config,
) -> Result<PathBuf, String> {
    let format: ExportFormat = format.parse().map_err(|e| format!("✗ {e}"))?;

    let plan = read_plan_file(plan_file).map_err(|e| format!("✗ {e}"))?;
    info!("Plan loaded: {}", plan_file.display());

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let exports_dir = PathBuf::from(&config.paths.exports_dir);
            std::fs::create_dir_all(&exports_dir).map_err(|e| {
                format!(
                    "✗ Failed to create exports directory {}: {e}",
                    exports_dir.display()
                )
            })?;

            let stem = plan_file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("plan");
            exports_dir.join(format!("{stem}.{}", format.extension()))
        }
    };

    let ctx = ExportContext::new(&plan);
    format
        .renderer()
        .generate(&ctx, &output_path)
        .map_err(|e| format!("✗ Failed to export plan: {e}"))?;

    Ok(output_path)
}
