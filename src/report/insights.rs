//! Terminal rendering of the read-only insights

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use super::summary::{print_section, print_table};
use crate::insights::*;
use crate::pipeline::{
    Bucket, CleanedTables, CreditBucket, GoodsPriceBucket, IncomeBucket, NAME_EDUCATION_TYPE,
    OCCUPATION_TYPE,
};

fn rate_color(rate: f64) -> Color {
    if rate > 0.10 {
        Color::Red
    } else if rate > 0.07 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn pct(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn rate_table(first_header: &str, rows: impl IntoIterator<Item = (String, usize, usize, f64)>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new(first_header).add_attribute(Attribute::Bold),
        Cell::new("Applicants").add_attribute(Attribute::Bold),
        Cell::new("Defaulters").add_attribute(Attribute::Bold),
        Cell::new("Default rate").add_attribute(Attribute::Bold),
    ]);
    for (name, applicants, defaulters, rate) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(applicants),
            Cell::new(defaulters),
            Cell::new(pct(rate)).fg(rate_color(rate)),
        ]);
    }
    table
}

pub fn category_rate_table(header: &str, rates: &[CategoryRate]) -> Table {
    rate_table(
        header,
        rates
            .iter()
            .map(|r| (r.category.clone(), r.applicants, r.defaulters, r.default_rate)),
    )
}

pub fn bucket_rate_table<B: Bucket>(header: &str, rates: &[BucketRate<B>]) -> Table {
    rate_table(
        header,
        rates
            .iter()
            .map(|r| (r.bucket.label().to_string(), r.applicants, r.defaulters, r.default_rate)),
    )
}

pub fn status_table(counts: &[StatusCount]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Previous contract status").add_attribute(Attribute::Bold),
        Cell::new("Repayers").add_attribute(Attribute::Bold),
        Cell::new("Defaulters").add_attribute(Attribute::Bold),
    ]);
    for count in counts {
        table.add_row(vec![
            Cell::new(&count.status),
            Cell::new(count.repayers).fg(Color::Cyan),
            Cell::new(count.defaulters).fg(Color::Red),
        ]);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("")];
    header.extend(
        matrix
            .columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|v| match v {
            Some(c) => Cell::new(format!("{:.2}", c)).fg(if c.abs() > 0.7 {
                Color::Red
            } else {
                Color::White
            }),
            None => Cell::new("-"),
        }));
        table.add_row(cells);
    }
    table
}

fn print_bucket_rates<B: Bucket>(title: &str, tables: &CleanedTables) -> Result<()> {
    let rates = bucket_default_rates::<B>(&tables.applications)?;
    if !rates.is_empty() {
        print_section("📊", title);
        print_table(&bucket_rate_table(B::OUTPUT_COLUMN, &rates));
    }
    Ok(())
}

/// Print every insight that the available columns allow
pub fn display_insights(tables: &CleanedTables) -> Result<()> {
    let apps = &tables.applications;

    if let Some(overview) = portfolio_overview(apps)? {
        print_section("🏢", "PORTFOLIO OVERVIEW");
        println!("      Total applicants: {}", style(overview.applicants).bold());
        println!(
            "      Defaulter rate:   {}",
            style(pct(overview.default_rate)).red().bold()
        );
        if let Some(mean_credit) = overview.mean_credit {
            println!("      Avg loan amount:  {}", style(format!("{:.0}", mean_credit)).bold());
        }
        for count in outcome_distribution(apps)? {
            println!(
                "      {:<16}{} ({})",
                count.outcome.label(),
                count.count,
                style(pct(count.share)).dim()
            );
        }
    }

    for (column, title) in [
        (NAME_EDUCATION_TYPE, "DEFAULT RATE BY EDUCATION"),
        (OCCUPATION_TYPE, "DEFAULT RATE BY OCCUPATION"),
    ] {
        let rates = default_rate_by(apps, column)?;
        if let Some(top) = rates.first() {
            print_section("👥", title);
            print_table(&category_rate_table(column, &rates));
            println!();
            println!(
                "      Highest risk: {} at {}",
                style(&top.category).yellow().bold(),
                style(pct(top.default_rate)).red().bold()
            );
        }
    }

    print_bucket_rates::<GoodsPriceBucket>("DEFAULT RATE BY GOODS PRICE", tables)?;
    print_bucket_rates::<IncomeBucket>("DEFAULT RATE BY INCOME", tables)?;
    print_bucket_rates::<CreditBucket>("DEFAULT RATE BY CREDIT", tables)?;

    let statuses = status_by_outcome(&tables.merged)?;
    if !statuses.is_empty() {
        print_section("💰", "PREVIOUS CONTRACT STATUS");
        print_table(&status_table(&statuses));
    }

    if let Some(matrix) = defaulter_correlations(apps, &DEFAULT_CORRELATION_COLUMNS)? {
        print_section("📈", "DEFAULTER CORRELATIONS");
        print_table(&correlation_table(&matrix));
    }

    Ok(())
}
