use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use scentforge_core::spark::DEFAULT_TARGET_TOTAL_GRAMS;
use scentforge_schemas::category::IfraCategory;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod plotting;
mod workflow;

#[derive(Parser, Debug)]
#[command(name = "scentforge", version, about = "Perfume formulation and IFRA compliance workbench")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a formula against the IFRA limits of one product category.
    Check(FormulaArgs),
    /// Full analysis of a formula, saved to a timestamped run directory.
    Analyze {
        #[command(flatten)]
        formula: FormulaArgs,
        /// Root directory for run artefacts.
        #[arg(long, default_value = config::DEFAULT_RUNS_DIR)]
        out: PathBuf,
    },
    /// Answer a JSON compliance request.
    Request {
        /// Request body: {ingredients, dilutantQuantity, categoryId}.
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = config::DEFAULT_CATALOG_DIR)]
        catalog: PathBuf,
    },
    /// Solvent needed to dilute a material to a lower concentration.
    Dilute {
        /// Grams of material on hand.
        #[arg(long)]
        mass: f64,
        /// Current concentration in percent.
        #[arg(long)]
        current: f64,
        /// Target concentration in percent.
        #[arg(long)]
        target: f64,
    },
    /// Turn a generated suggestion into a formula YAML.
    Spark {
        /// Suggestion JSON: {formula: {name: grams}, notes}.
        #[arg(long)]
        file: PathBuf,
        /// Batch weight to top up to with ethanol.
        #[arg(long, default_value_t = DEFAULT_TARGET_TOTAL_GRAMS)]
        total: f64,
        #[arg(long, default_value = config::DEFAULT_CATALOG_DIR)]
        catalog: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
struct FormulaArgs {
    /// Formula YAML file.
    #[arg(long)]
    formula: PathBuf,
    /// IFRA product category id, e.g. cat4 or cat5a.
    #[arg(long, default_value = "cat4")]
    category: IfraCategory,
    /// Directory of ingredient catalog YAML files.
    #[arg(long, default_value = config::DEFAULT_CATALOG_DIR)]
    catalog: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let passed = match cli.command {
        Command::Check(args) => {
            let bench = config::Workbench::load(&args.catalog)?;
            let formula = config::load_formula(&args.formula)?;
            workflow::run_check(&bench, &formula, args.category)?
        }
        Command::Analyze { formula: args, out } => {
            println!("--- Scentforge Analysis ---");
            let bench = config::Workbench::load(&args.catalog)?;
            let formula = config::load_formula(&args.formula)?;
            let output_dir = workflow::run_analyze(&bench, &formula, args.category, &out)?;
            println!("\nAnalysis complete. Results are in '{}'", output_dir);
            true
        }
        Command::Request { file, catalog } => {
            let bench = config::Workbench::load(&catalog)?;
            workflow::run_request(&bench, &file)?
        }
        Command::Dilute { mass, current, target } => {
            workflow::run_dilute(mass, current, target)?;
            true
        }
        Command::Spark { file, total, catalog } => {
            let bench = config::Workbench::load(&catalog)?;
            workflow::run_spark(&bench, &file, total)?;
            true
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
