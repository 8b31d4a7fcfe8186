// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod models;
pub mod packager;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::packager::Packager;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Project Root
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_root = current_dir.join(&args.project_root);
    let project_root = project_root
        .canonicalize()
        .context(format!("Project root not found: {}", project_root.display()))?;

    // 3. Resolve Configuration
    let config = resolve_config(args, project_root)?;
    log::info!(
        "Packaging {} Editor ({}) from {}",
        config.product,
        config.configuration,
        config.project_root.display()
    );

    let packager = Packager::new(&config)?;

    // 4. Dry run: show what would be produced and stop
    if config.dry_run {
        let plan = packager.plan()?;
        let tree = OutputGenerator::generate_tree(&plan.entries);
        println!(
            "{}",
            OutputGenerator::format_plan(&packager.layout().output_base, &tree)
        );
        return Ok(());
    }

    // 5. Package
    let report = packager.package()?;
    log::info!("{}", OutputGenerator::format_summary(&report));

    Ok(())
}
