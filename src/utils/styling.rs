//! Terminal styling utilities

use console::{style, Emoji};

use crate::pipeline::SourcePair;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static BANK: Emoji<'_, '_> = Emoji("🏦 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {}{}",
        BANK,
        style("Loanscope").cyan().bold()
    );
    println!(
        "    {}",
        style("Loan application cleaning & default insights").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the two input sources
pub fn print_sources(sources: &SourcePair) {
    println!("    {}Applications: {}", FOLDER, style(&sources.applications).dim());
    println!("    {}Previous:     {}", FOLDER, style(&sources.previous).dim());
    println!();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the message shown when the datasets cannot be loaded
pub fn print_missing_data(sources: &SourcePair) {
    eprintln!();
    eprintln!("    {} {}", style("🚨").red(), style("Missing Data Files").red().bold());
    eprintln!(
        "    Place {} and {} where they can be read, or pass their locations with --applications / --previous.",
        style(&sources.applications).yellow(),
        style(&sources.previous).yellow()
    );
    eprintln!();
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Loanscope cleaning complete!").green().bold()
    );
    println!();
}
