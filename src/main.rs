//! Loanscope: Loan Application Cleaning CLI Tool
//!
//! Runs the cleaning pipeline over the applications and previous-applications
//! tables, prints what the cleaning did, and summarizes default risk.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use loanscope::cli::Cli;
use loanscope::pipeline::PipelineCache;
use loanscope::report::{display_cleaning_summary, display_insights, export_cleaning_report};
use loanscope::utils::{
    create_spinner, finish_with_error, finish_with_success, init_logging, level_from_verbosity,
    print_banner, print_completion, print_info, print_missing_data, print_sources, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(level_from_verbosity(cli.verbose, cli.quiet))?;

    let sources = cli.sources();
    let mut cache = PipelineCache::new(cli.pipeline_config());

    print_banner(env!("CARGO_PKG_VERSION"));
    print_sources(&sources);

    let started = Instant::now();
    let spinner = create_spinner("Loading and cleaning datasets...");
    let Some(tables) = cache.get_or_run(&sources) else {
        finish_with_error(&spinner, "Datasets could not be loaded");
        print_missing_data(&sources);
        anyhow::bail!(
            "Missing data files: expected {} and {}",
            sources.applications,
            sources.previous
        );
    };
    finish_with_success(
        &spinner,
        &format!("Cleaned in {:.2}s", started.elapsed().as_secs_f64()),
    );

    display_cleaning_summary(&tables.report);

    if let Some(path) = &cli.report {
        export_cleaning_report(&tables.report, &sources, cache.config(), path)?;
        println!();
        print_success(&format!("Cleaning report saved to {}", path.display()));
    }

    if cli.no_insights {
        println!();
        print_info("Insights skipped");
    } else {
        display_insights(&tables)?;
    }

    println!();
    println!(
        "    Output tables: {} applications, {} previous applications, {} merged rows",
        style(tables.applications.height()).bold(),
        style(tables.previous_applications.height()).bold(),
        style(tables.merged.height()).bold()
    );
    print_completion();

    Ok(())
}
