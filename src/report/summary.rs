//! Cleaning summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningReport, TableReport};

fn count_cell(count: usize) -> Cell {
    Cell::new(count).fg(if count == 0 { Color::White } else { Color::Yellow })
}

/// Indent and print a table
pub(crate) fn print_table(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

pub(crate) fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

/// Side-by-side overview of both input tables and the merge
pub fn summary_table(report: &CleaningReport) -> Table {
    let apps = &report.applications;
    let prev = &report.previous_applications;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Applications").add_attribute(Attribute::Bold),
        Cell::new("Previous").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("📁 Rows"), Cell::new(apps.rows), Cell::new(prev.rows)]);
    table.add_row(vec![
        Cell::new("📁 Columns loaded"),
        Cell::new(apps.columns_loaded),
        Cell::new(prev.columns_loaded),
    ]);
    table.add_row(vec![
        Cell::new("🗑️  Dropped (Missing)"),
        count_cell(apps.dropped_missing.len()),
        count_cell(prev.dropped_missing.len()),
    ]);
    table.add_row(vec![
        Cell::new("🗑️  Dropped (Admin)"),
        count_cell(apps.dropped_admin.len()),
        count_cell(prev.dropped_admin.len()),
    ]);
    table.add_row(vec![
        Cell::new("🩹 Imputed columns"),
        count_cell(apps.imputation.applied.len()),
        count_cell(prev.imputation.applied.len()),
    ]);
    table.add_row(vec![
        Cell::new("↔️  Day offsets normalized"),
        count_cell(apps.normalized.len()),
        count_cell(prev.normalized.len()),
    ]);
    table.add_row(vec![
        Cell::new("🏷️  Derived columns"),
        count_cell(apps.derived.len()),
        count_cell(prev.derived.len()),
    ]);
    table.add_row(vec![
        Cell::new("✅ Columns retained"),
        Cell::new(apps.columns_retained)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Cell::new(prev.columns_retained)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    table
}

/// Per-column imputation details of one table
pub fn imputation_table(report: &TableReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Rule").add_attribute(Attribute::Bold),
        Cell::new("Fill value").add_attribute(Attribute::Bold),
        Cell::new("Filled").add_attribute(Attribute::Bold),
    ]);

    for imputation in &report.imputation.applied {
        table.add_row(vec![
            Cell::new(&imputation.column),
            Cell::new(imputation.rule),
            Cell::new(&imputation.fill_value),
            count_cell(imputation.filled),
        ]);
    }
    for skipped in &report.imputation.skipped {
        table.add_row(vec![
            Cell::new(&skipped.column),
            Cell::new(skipped.rule),
            Cell::new("skipped").fg(Color::Red),
            Cell::new("-"),
        ]);
    }

    table
}

fn print_dropped(title: &str, columns: &[String]) {
    if columns.is_empty() {
        return;
    }
    println!();
    println!(
        "      {} {}:",
        style(title).yellow(),
        style(format!("({})", columns.len())).dim()
    );
    for column in columns {
        println!("        {} {}", style("•").dim(), column);
    }
}

/// Print the full cleaning summary to stdout
pub fn display_cleaning_summary(report: &CleaningReport) {
    print_section("📋", "CLEANING SUMMARY");
    print_table(&summary_table(report));

    println!();
    println!(
        "      Merged: {} rows, {} columns, {} applicants",
        style(report.merge.rows).green().bold(),
        style(report.merge.columns).green(),
        style(report.merge.applicants).green()
    );

    for (name, table) in [
        ("APPLICATIONS", &report.applications),
        ("PREVIOUS APPLICATIONS", &report.previous_applications),
    ] {
        print_section("🩹", &format!("{} IMPUTATION", name));
        if table.imputation.applied.is_empty() && table.imputation.skipped.is_empty() {
            println!("      {}", style("No imputation rules applied").dim());
        } else {
            print_table(&imputation_table(table));
        }
        print_dropped("High Missing Values", &table.dropped_missing);
        print_dropped("Administrative", &table.dropped_admin);
    }
}
