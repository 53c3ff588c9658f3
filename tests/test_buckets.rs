//! Tests for bucket feature derivation

use loanscope::pipeline::{
    derive_bucket, derive_buckets, impute_columns, Bucket, CreditBucket, GoodsPriceBucket,
    IncomeBucket, APPLICATION_RULES,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::{applications_frame, assert_has_columns, str_values};

#[test]
fn test_boundary_values_belong_to_upper_bucket() {
    assert_eq!(GoodsPriceBucket::from_value(0.0).map(Bucket::label), Some("0-100K"));
    assert_eq!(GoodsPriceBucket::from_value(99_999.0).map(Bucket::label), Some("0-100K"));
    assert_eq!(GoodsPriceBucket::from_value(100_000.0).map(Bucket::label), Some("100k-200K"));
    assert_eq!(GoodsPriceBucket::from_value(900_000.0).map(Bucket::label), Some("Above 900K"));

    assert_eq!(IncomeBucket::from_value(150_000.0).map(Bucket::label), Some("150K-200K"));
    assert_eq!(IncomeBucket::from_value(5e7).map(Bucket::label), Some("Above 400K"));

    assert_eq!(CreditBucket::from_value(899_999.99).map(Bucket::label), Some("800K-900K"));
    assert_eq!(CreditBucket::from_value(3_000_000.0).map(Bucket::label), Some("Above 3M"));
    assert_eq!(CreditBucket::from_value(5_000_000.0).map(Bucket::label), Some("Above 3M"));
}

#[test]
fn test_out_of_range_values_have_no_bucket() {
    assert_eq!(GoodsPriceBucket::from_value(-1.0), None);
    assert_eq!(IncomeBucket::from_value(f64::NAN), None);
    assert_eq!(CreditBucket::from_value(-0.01), None);
}

#[test]
fn test_buckets_are_ordered() {
    assert!(CreditBucket::from_value(100.0) < CreditBucket::from_value(1_500_000.0));
    assert_eq!(CreditBucket::ALL.len(), 9);
    assert_eq!(GoodsPriceBucket::ALL.len(), 10);
    assert_eq!(IncomeBucket::ALL.len(), 8);
}

#[test]
fn test_derive_buckets_on_applications() {
    let (df, _) = impute_columns(applications_frame(), &APPLICATION_RULES).unwrap();
    let (df, derived) = derive_buckets(df).unwrap();

    assert_eq!(
        derived,
        vec![
            "AMT_GOODS_PRICE_RANGE".to_string(),
            "AMT_INCOME_TOTAL_RANGE".to_string(),
            "AMT_CREDIT_RANGE".to_string(),
        ]
    );
    assert_has_columns(&df, &["AMT_GOODS_PRICE_RANGE", "AMT_INCOME_TOTAL_RANGE", "AMT_CREDIT_RANGE"]);

    let goods = str_values(&df, "AMT_GOODS_PRICE_RANGE");
    assert_eq!(goods[0].as_deref(), Some("0-100K"));
    assert_eq!(goods[1].as_deref(), Some("100k-200K"));
    // Imputed median 250000
    assert_eq!(goods[3].as_deref(), Some("200K-300K"));
    assert_eq!(goods[4].as_deref(), Some("Above 900K"));
    assert_eq!(goods[5].as_deref(), Some("0-100K"));

    let income = str_values(&df, "AMT_INCOME_TOTAL_RANGE");
    assert_eq!(income[1].as_deref(), Some("100K-150K"));
    assert_eq!(income[3].as_deref(), Some("200K-250K"));
    assert_eq!(income[9].as_deref(), Some("Above 400K"));

    let credit = str_values(&df, "AMT_CREDIT_RANGE");
    assert_eq!(credit[0].as_deref(), Some("0-200K"));
    assert_eq!(credit[1].as_deref(), Some("200K-400K"));
    assert_eq!(credit[2].as_deref(), Some("Above 3M"));
    assert_eq!(credit[8].as_deref(), Some("Above 3M"));
    assert_eq!(credit[9].as_deref(), Some("400K-600K"));
}

#[test]
fn test_every_label_is_a_known_bucket() {
    let (df, _) = impute_columns(applications_frame(), &APPLICATION_RULES).unwrap();
    let (df, _) = derive_buckets(df).unwrap();

    for label in str_values(&df, CreditBucket::OUTPUT_COLUMN).into_iter().flatten() {
        assert!(CreditBucket::from_label(&label).is_some(), "unknown label {}", label);
    }
}

#[test]
fn test_null_source_gives_null_label() {
    let mut df = df! {
        "AMT_CREDIT" => [Some(250_000.0f64), None, Some(-5.0)],
    }
    .unwrap();

    assert!(derive_bucket::<CreditBucket>(&mut df).unwrap());
    let labels = str_values(&df, "AMT_CREDIT_RANGE");
    assert_eq!(labels, vec![Some("200K-400K".to_string()), None, None]);
}

#[test]
fn test_missing_source_column_is_skipped() {
    let df = df! { "SK_ID_CURR" => [1i64, 2] }.unwrap();
    let (df, derived) = derive_buckets(df).unwrap();

    assert!(derived.is_empty());
    assert_eq!(df.width(), 1);
}

#[test]
fn test_integer_source_column() {
    let mut df = df! { "AMT_INCOME_TOTAL" => [99_999i64, 100_000, 400_000] }.unwrap();

    assert!(derive_bucket::<IncomeBucket>(&mut df).unwrap());
    let labels = str_values(&df, "AMT_INCOME_TOTAL_RANGE");
    assert_eq!(
        labels,
        vec![
            Some("0-100K".to_string()),
            Some("100K-150K".to_string()),
            Some("Above 400K".to_string()),
        ]
    );
}

#[test]
fn test_range_columns_sort_in_bucket_order() {
    let (df, _) = impute_columns(applications_frame(), &APPLICATION_RULES).unwrap();
    let (df, _) = derive_buckets(df).unwrap();

    for name in ["AMT_GOODS_PRICE_RANGE", "AMT_INCOME_TOTAL_RANGE", "AMT_CREDIT_RANGE"] {
        assert!(
            matches!(df.column(name).unwrap().dtype(), DataType::Enum(_, _)),
            "{} should be an enum column",
            name
        );
    }

    let sorted = df
        .sort(["AMT_CREDIT_RANGE"], SortMultipleOptions::default())
        .unwrap();
    let buckets: Vec<CreditBucket> = str_values(&sorted, "AMT_CREDIT_RANGE")
        .into_iter()
        .flatten()
        .filter_map(|label| CreditBucket::from_label(&label))
        .collect();
    assert_eq!(buckets.len(), 10);
    assert!(buckets.windows(2).all(|w| w[0] <= w[1]));
}
