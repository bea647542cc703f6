use crate::config::{self, Workbench};
use crate::plotting;
use anyhow::{Context, Result};
use scentforge_core::{
    compliance::{respond_json, ComplianceStatus},
    dilution::plan_dilution,
    logger,
    report::{analyze, FormulationReport},
    spark::resolve_spark,
};
use scentforge_schemas::{category::IfraCategory, formula::Formula, request::ComplianceResponse};
use std::{fs, path::Path};
use tracing::info;

/// Prints the compliance table for `formula` and returns whether it passes.
pub fn run_check(bench: &Workbench, formula: &Formula, category: IfraCategory) -> Result<bool> {
    println!("\n--- [Workflow] Checking '{}' against {} ---", formula.name, category.label());

    let report = analyze(formula, &bench.catalog, category)?;
    print_compliance_table(&report);
    Ok(report.is_compliant())
}

/// Full analysis: summary on stdout, artefacts in a fresh run directory.
pub fn run_analyze(bench: &Workbench, formula: &Formula, category: IfraCategory, out_root: &Path) -> Result<String> {
    println!("\n--- [Workflow] Analyzing '{}' ---", formula.name);

    let report = analyze(formula, &bench.catalog, category)?;

    let output_dir = format!(
        "{}/{}_{}",
        out_root.display(),
        formula.id,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    let report_json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    fs::write(Path::new(&output_dir).join("report.json"), report_json).context("Failed to write report.json")?;
    logger::write_lines(&format!("{}/lines.csv", output_dir), &report.normalized)?;
    logger::write_decay_timeline(&format!("{}/decay_timeline.csv", output_dir), &report.decay_timeline)?;
    logger::write_violations(&format!("{}/violations.csv", output_dir), &report.compliance.violations)?;
    plotting::generate_all_plots(&output_dir, &report)?;

    info!(%output_dir, "run artefacts written");
    print_summary_report(&report);
    Ok(output_dir)
}

/// Answers a JSON compliance request file. Returns false for an error envelope.
pub fn run_request(bench: &Workbench, path: &Path) -> Result<bool> {
    let body = fs::read_to_string(path).with_context(|| format!("Failed to read request {:?}", path))?;
    let response = respond_json(&body, &bench.catalog);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(matches!(response, ComplianceResponse::Success(_)))
}

pub fn run_dilute(mass_grams: f64, current_percent: f64, target_percent: f64) -> Result<()> {
    let plan = plan_dilution(mass_grams, current_percent, target_percent)?;
    println!(
        "Dilute {:.2} g at {}% to {}%: add {:.2} g solvent for {:.2} g total.",
        mass_grams, current_percent, target_percent, plan.solvent_to_add_grams, plan.final_mass_grams
    );
    Ok(())
}

pub fn run_spark(bench: &Workbench, path: &Path, target_total_grams: f64) -> Result<()> {
    let suggestion = config::load_spark(path)?;
    let formula_id = format!("spark-{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    let resolution = resolve_spark(&suggestion, &bench.catalog, &formula_id, target_total_grams)?;

    if !suggestion.notes.is_empty() {
        println!("# {}", suggestion.notes);
    }
    for placeholder in &resolution.placeholders {
        println!("# not in catalog, added as placeholder: {} ({})", placeholder.name, placeholder.id);
    }
    print!("{}", config::formula_to_yaml(resolution.formula)?);
    Ok(())
}

fn print_compliance_table(report: &FormulationReport) {
    let table = &report.compliance_table;
    println!("Category: {} ({})", table.category.label(), table.category);
    if table.rows.is_empty() {
        println!("  No restricted materials in this formula.");
    }
    for row in &table.rows {
        let marker = match row.status {
            ComplianceStatus::Violation => "VIOLATION",
            ComplianceStatus::Warning => "WARNING",
            ComplianceStatus::Pass => "PASS",
        };
        println!(
            "  - {:<10} {:<28} used {:>8.4}% / allowed {:>8.4}%",
            marker, row.name, row.percent_used, row.percent_allowed
        );
    }
    println!(
        "  {} violation(s), {} warning(s), {} pass of {} line(s).",
        table.counts.violation, table.counts.warning, table.counts.pass, table.counts.total
    );
    for id in report.unmatched_ingredients() {
        println!("  ! '{}' is not in the catalog and was not checked.", id);
    }
}

fn print_summary_report(report: &FormulationReport) {
    let n = &report.normalized;

    println!("\n\n--- [Formulation Summary Report] ---");
    println!("========================================");
    println!("Formula: {} ({})", report.formula_name, report.formula_id);
    println!("Total Weight: {:.2} g", n.total_weight_grams);
    println!("Oil Concentration: {:.2}% | Diluent: {:.2}%", n.oil_concentration_percent, n.diluent_percent);
    println!(
        "Note Pyramid: top {:.1}% / mid {:.1}% / base {:.1}%",
        n.note_pyramid.top, n.note_pyramid.mid, n.note_pyramid.base
    );
    println!("----------------------------------------");

    println!("\nIFRA Compliance:");
    print_compliance_table(report);

    println!("\nAllergens: {} of {} monitored", report.allergens.count, report.allergens.monitored);

    println!("\nLongevity (intensity by hour):");
    for point in &report.decay_timeline {
        println!("  - {:>4}h: {:>6.1}", point.hour, point.intensity);
    }

    println!("\nNormalized Cost Breakdown:");
    for bucket in &report.cost_breakdown {
        println!("  - {:<22} ${:.4} USD", bucket.name, bucket.value);
    }

    let cost = &report.batch_cost;
    println!("\nBatch Cost:");
    println!("  - Materials:                ${:.2} USD", cost.materials_cost);
    println!("  - Dilutant (Est):           ${:.2} USD", cost.dilutant_cost);
    println!("  - Packaging (Est):          ${:.2} USD", cost.packaging_cost);
    println!("  --------------------------------------");
    println!("  - Total:                    ${:.2} USD", cost.total_cost);
    println!("========================================");
}
