//! Shared test utilities and fixture generators

#![allow(dead_code)]

use loanscope::pipeline::SourcePair;
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Applications fixture with known characteristics.
///
/// - `SK_ID_CURR` 1..=10, `TARGET` with 3 defaulters
/// - `CNT_FAM_MEMBERS`: 2 nulls, 1.0 and 2.0 tie as mode (1.0 wins)
/// - `OCCUPATION_TYPE`: 3 nulls, mode "Laborers"
/// - `AMT_ANNUITY`: 2 nulls, mean 45000
/// - `AMT_GOODS_PRICE`: 1 null, median 250000
/// - `OWN_CAR_AGE`: 60% missing (dropped)
/// - `EXT_SOURCE_1`: exactly 40% missing (dropped)
/// - `DAYS_EMPLOYED`: one zero offset and two positive sentinels
pub fn applications_frame() -> DataFrame {
    df! {
        "SK_ID_CURR" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "TARGET" => [0i64, 1, 0, 0, 1, 0, 0, 1, 0, 0],
        "NAME_CONTRACT_TYPE" => ["Cash loans", "Cash loans", "Revolving loans", "Cash loans", "Cash loans",
                                 "Cash loans", "Revolving loans", "Cash loans", "Cash loans", "Cash loans"],
        "CNT_FAM_MEMBERS" => [Some(2.0f64), None, Some(1.0), Some(2.0), Some(1.0),
                              Some(3.0), None, Some(4.0), Some(2.0), Some(1.0)],
        "OCCUPATION_TYPE" => [Some("Laborers"), None, Some("Drivers"), Some("Laborers"), Some("Core staff"),
                              None, Some("Drivers"), Some("Laborers"), None, Some("Sales staff")],
        "NAME_TYPE_SUITE" => [Some("Unaccompanied"), Some("Family"), Some("Unaccompanied"), None, Some("Unaccompanied"),
                              Some("Family"), Some("Unaccompanied"), Some("Unaccompanied"), Some("Spouse, partner"), Some("Unaccompanied")],
        "NAME_EDUCATION_TYPE" => ["Secondary / secondary special", "Higher education", "Secondary / secondary special",
                                  "Higher education", "Secondary / secondary special", "Incomplete higher",
                                  "Higher education", "Lower secondary", "Secondary / secondary special", "Higher education"],
        "AMT_ANNUITY" => [Some(10000.0f64), Some(20000.0), None, Some(30000.0), Some(40000.0),
                          Some(50000.0), Some(60000.0), None, Some(70000.0), Some(80000.0)],
        "AMT_GOODS_PRICE" => [Some(0.0f64), Some(100000.0), Some(450000.0), None, Some(900000.0),
                              Some(99999.0), Some(250000.0), Some(1200000.0), Some(180000.0), Some(675000.0)],
        "AMT_INCOME_TOTAL" => [90000.0f64, 100000.0, 150000.0, 202500.0, 400000.0,
                               135000.0, 67500.0, 225000.0, 180000.0, 1000000.0],
        "AMT_CREDIT" => [150000.0f64, 200000.0, 5000000.0, 900000.0, 1000000.0,
                         450000.0, 312682.5, 2500000.0, 3000000.0, 599999.0],
        "DAYS_BIRTH" => [-9461i64, -16765, -19046, -19005, -19932, -16941, -13778, -18850, -20099, -14469],
        "DAYS_EMPLOYED" => [-637i64, -1188, -225, -3039, 365243, -1588, 0, -449, 365243, -2019],
        "OWN_CAR_AGE" => [None, Some(12.0f64), None, Some(26.0), None, None, Some(17.0), None, Some(8.0), None],
        "EXT_SOURCE_1" => [Some(0.08f64), None, Some(0.5), None, None, Some(0.3), Some(0.7), None, Some(0.2), Some(0.6)],
    }
    .unwrap()
}

/// Previous-applications fixture.
///
/// - identifiers 1 (x2), 2, 3 (x3), 5, 8 (x2) match applications: 9 rows
/// - identifiers 11, 12 (x2) have no application: 3 rows
/// - `AMT_GOODS_PRICE`: 2 nulls, median 225000
/// - `PRODUCT_COMBINATION`: 1 null, mode "Cash"
/// - `CNT_PAYMENT`: 3 nulls
/// - the four administrative columns are fully populated
/// - `RATE_INTEREST_PRIMARY`: 11 of 12 missing
pub fn previous_frame() -> DataFrame {
    df! {
        "SK_ID_PREV" => [101i64, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 112],
        "SK_ID_CURR" => [1i64, 1, 2, 3, 3, 3, 5, 8, 8, 11, 12, 12],
        "NAME_CONTRACT_STATUS" => ["Approved", "Refused", "Approved", "Canceled", "Approved", "Approved",
                                   "Refused", "Approved", "Unused offer", "Approved", "Refused", "Approved"],
        "AMT_ANNUITY" => [Some(1730.43f64), None, Some(25188.615), Some(15060.735), None, Some(47041.335),
                          Some(31924.395), Some(23703.93), None, Some(7240.5), Some(11368.62), Some(13832.775)],
        "AMT_CREDIT" => [17145.0f64, 679671.0, 136444.5, 112500.0, 450000.0, 0.0,
                         337500.0, 315000.0, 180000.0, 67500.0, 90000.0, 270000.0],
        "AMT_GOODS_PRICE" => [Some(17145.0f64), Some(607500.0), None, Some(112500.0), Some(450000.0), None,
                              Some(337500.0), Some(315000.0), Some(180000.0), Some(67500.0), Some(90000.0), Some(270000.0)],
        "PRODUCT_COMBINATION" => [Some("POS mobile with interest"), Some("Cash X-Sell: low"), Some("Cash X-Sell: low"),
                                  None, Some("Cash"), Some("Cash"), Some("POS household with interest"), Some("Cash"),
                                  Some("Card Street"), Some("Cash X-Sell: low"), Some("Cash"), Some("POS mobile with interest")],
        "CNT_PAYMENT" => [Some(12.0f64), Some(36.0), Some(12.0), None, Some(24.0), Some(12.0),
                          None, Some(6.0), Some(48.0), Some(18.0), None, Some(10.0)],
        "DAYS_DECISION" => [-73i64, -164, -301, -512, -781, -684, -14, -1383, -2922, -42, -605, -8],
        "WEEKDAY_APPR_PROCESS_START" => ["SATURDAY", "THURSDAY", "TUESDAY", "MONDAY", "THURSDAY", "SATURDAY",
                                         "FRIDAY", "MONDAY", "SUNDAY", "TUESDAY", "WEDNESDAY", "FRIDAY"],
        "HOUR_APPR_PROCESS_START" => [15i64, 11, 11, 7, 9, 8, 11, 12, 15, 10, 9, 17],
        "FLAG_LAST_APPL_PER_CONTRACT" => ["Y", "Y", "Y", "Y", "Y", "Y", "Y", "Y", "N", "Y", "Y", "Y"],
        "NFLAG_LAST_APPL_IN_DAY" => [1i64, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        "RATE_INTEREST_PRIMARY" => [Some(0.18f64), None, None, None, None, None, None, None, None, None, None, None],
    }
    .unwrap()
}

/// Write a DataFrame to `dir/name` as CSV
pub fn write_csv(dir: &TempDir, name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Write both fixtures as CSV files in a temporary directory
pub fn write_fixture_pair() -> (TempDir, SourcePair) {
    write_pair(&mut applications_frame(), &mut previous_frame())
}

/// Write the given frames as CSV files in a temporary directory
pub fn write_pair(applications: &mut DataFrame, previous: &mut DataFrame) -> (TempDir, SourcePair) {
    let temp_dir = TempDir::new().unwrap();
    let apps_path = write_csv(&temp_dir, "application_data.csv", applications);
    let prev_path = write_csv(&temp_dir, "previous_application.csv", previous);
    (temp_dir, SourcePair::new(apps_path, prev_path))
}

/// Random applications/previous pair with `n` applicants and up to
/// `max_history` previous applications each. Some previous applications
/// reference identifiers above `n`.
pub fn create_random_pair(n: usize, max_history: usize, seed: u64) -> (DataFrame, DataFrame) {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(seed);

    let ids: Vec<i64> = (1..=n as i64).collect();
    let target: Vec<i64> = (0..n).map(|_| i64::from(rng.gen_bool(0.1))).collect();
    let credit: Vec<Option<f64>> = (0..n)
        .map(|_| rng.gen_bool(0.9).then(|| rng.gen_range(20_000.0..4_000_000.0)))
        .collect();
    let days_birth: Vec<i64> = (0..n).map(|_| -rng.gen_range(7_000..25_000)).collect();

    let applications = df! {
        "SK_ID_CURR" => ids,
        "TARGET" => target,
        "AMT_CREDIT" => credit,
        "DAYS_BIRTH" => days_birth,
    }
    .unwrap();

    let mut prev_ids: Vec<i64> = Vec::new();
    for id in 1..=(n + n / 5) as i64 {
        for _ in 0..rng.gen_range(0..=max_history) {
            prev_ids.push(id);
        }
    }
    let payments: Vec<Option<f64>> = prev_ids
        .iter()
        .map(|_| rng.gen_bool(0.8).then(|| rng.gen_range(1..60) as f64))
        .collect();

    let previous = df! {
        "SK_ID_CURR" => prev_ids,
        "CNT_PAYMENT" => payments,
    }
    .unwrap();

    (applications, previous)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Values of a string or enum column as text
pub fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Values of a numeric column as f64
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}
