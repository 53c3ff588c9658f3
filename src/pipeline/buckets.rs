//! Ordinal bucket features derived from monetary columns
//!
//! Each bucket family is a closed, ordered enumeration. Bins are
//! left-closed/right-open (`[edge_i, edge_i+1)`), so a value sitting exactly
//! on a boundary belongs to the upper bucket. The last bucket is open-ended.
//! Negative, NaN and null inputs have no bucket.

use polars::prelude::*;
use tracing::warn;

use super::columns::{has_column, AMT_CREDIT, AMT_GOODS_PRICE, AMT_INCOME_TOTAL};

/// A closed, ordered family of value ranges
pub trait Bucket: Copy + Ord + std::fmt::Debug + 'static {
    /// Lower edge of each bucket, ascending. `EDGES[i]` belongs to `ALL[i]`.
    const EDGES: &'static [f64];
    /// Every bucket in ascending order
    const ALL: &'static [Self];
    /// Numeric column the bucket is derived from
    const SOURCE_COLUMN: &'static str;
    /// Name of the derived label column
    const OUTPUT_COLUMN: &'static str;

    fn label(self) -> &'static str;

    /// Bucket containing `value`, if any
    fn from_value(value: f64) -> Option<Self> {
        if value.is_nan() || value < Self::EDGES[0] {
            return None;
        }
        let idx = Self::EDGES.partition_point(|&edge| edge <= value) - 1;
        Some(Self::ALL[idx])
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label() == label)
    }

    /// Enum dtype of the label column; its categories follow bucket order
    fn label_dtype() -> DataType {
        let labels: Vec<&str> = Self::ALL.iter().map(|b| b.label()).collect();
        let categories = StringChunked::from_slice(PlSmallStr::EMPTY, &labels);
        let dtype = match categories.downcast_iter().next() {
            Some(array) => create_enum_dtype(array.clone()),
            None => DataType::String,
        };
        dtype
    }
}

/// Goods price ranges: 100K steps up to 900K
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoodsPriceBucket {
    Upto100K,
    From100KTo200K,
    From200KTo300K,
    From300KTo400K,
    From400KTo500K,
    From500KTo600K,
    From600KTo700K,
    From700KTo800K,
    From800KTo900K,
    Above900K,
}

impl Bucket for GoodsPriceBucket {
    const EDGES: &'static [f64] = &[
        0.0, 100_000.0, 200_000.0, 300_000.0, 400_000.0, 500_000.0, 600_000.0, 700_000.0,
        800_000.0, 900_000.0,
    ];
    const ALL: &'static [Self] = &[
        Self::Upto100K,
        Self::From100KTo200K,
        Self::From200KTo300K,
        Self::From300KTo400K,
        Self::From400KTo500K,
        Self::From500KTo600K,
        Self::From600KTo700K,
        Self::From700KTo800K,
        Self::From800KTo900K,
        Self::Above900K,
    ];
    const SOURCE_COLUMN: &'static str = AMT_GOODS_PRICE;
    const OUTPUT_COLUMN: &'static str = "AMT_GOODS_PRICE_RANGE";

    fn label(self) -> &'static str {
        match self {
            Self::Upto100K => "0-100K",
            Self::From100KTo200K => "100k-200K",
            Self::From200KTo300K => "200K-300K",
            Self::From300KTo400K => "300K-400K",
            Self::From400KTo500K => "400K-500K",
            Self::From500KTo600K => "500K-600K",
            Self::From600KTo700K => "600K-700K",
            Self::From700KTo800K => "700K-800K",
            Self::From800KTo900K => "800K-900K",
            Self::Above900K => "Above 900K",
        }
    }
}

/// Total income ranges: 100K, then 50K steps up to 400K
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncomeBucket {
    Upto100K,
    From100KTo150K,
    From150KTo200K,
    From200KTo250K,
    From250KTo300K,
    From300KTo350K,
    From350KTo400K,
    Above400K,
}

impl Bucket for IncomeBucket {
    const EDGES: &'static [f64] = &[
        0.0, 100_000.0, 150_000.0, 200_000.0, 250_000.0, 300_000.0, 350_000.0, 400_000.0,
    ];
    const ALL: &'static [Self] = &[
        Self::Upto100K,
        Self::From100KTo150K,
        Self::From150KTo200K,
        Self::From200KTo250K,
        Self::From250KTo300K,
        Self::From300KTo350K,
        Self::From350KTo400K,
        Self::Above400K,
    ];
    const SOURCE_COLUMN: &'static str = AMT_INCOME_TOTAL;
    const OUTPUT_COLUMN: &'static str = "AMT_INCOME_TOTAL_RANGE";

    fn label(self) -> &'static str {
        match self {
            Self::Upto100K => "0-100K",
            Self::From100KTo150K => "100K-150K",
            Self::From150KTo200K => "150K-200K",
            Self::From200KTo250K => "200K-250K",
            Self::From250KTo300K => "250K-300K",
            Self::From300KTo350K => "300K-350K",
            Self::From350KTo400K => "350K-400K",
            Self::Above400K => "Above 400K",
        }
    }
}

/// Credit amount ranges, widening towards the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreditBucket {
    Upto200K,
    From200KTo400K,
    From400KTo600K,
    From600KTo800K,
    From800KTo900K,
    From900KTo1M,
    From1MTo2M,
    From2MTo3M,
    Above3M,
}

impl Bucket for CreditBucket {
    const EDGES: &'static [f64] = &[
        0.0,
        200_000.0,
        400_000.0,
        600_000.0,
        800_000.0,
        900_000.0,
        1_000_000.0,
        2_000_000.0,
        3_000_000.0,
    ];
    const ALL: &'static [Self] = &[
        Self::Upto200K,
        Self::From200KTo400K,
        Self::From400KTo600K,
        Self::From600KTo800K,
        Self::From800KTo900K,
        Self::From900KTo1M,
        Self::From1MTo2M,
        Self::From2MTo3M,
        Self::Above3M,
    ];
    const SOURCE_COLUMN: &'static str = AMT_CREDIT;
    const OUTPUT_COLUMN: &'static str = "AMT_CREDIT_RANGE";

    fn label(self) -> &'static str {
        match self {
            Self::Upto200K => "0-200K",
            Self::From200KTo400K => "200K-400K",
            Self::From400KTo600K => "400K-600K",
            Self::From600KTo800K => "600K-800K",
            Self::From800KTo900K => "800K-900K",
            Self::From900KTo1M => "900K-1M",
            Self::From1MTo2M => "1M-2M",
            Self::From2MTo3M => "2M-3M",
            Self::Above3M => "Above 3M",
        }
    }
}

/// Add the label column of bucket family `B` as an ordered enum column.
///
/// Returns `false` without touching `df` when the source column is absent or
/// not numeric.
pub fn derive_bucket<B: Bucket>(df: &mut DataFrame) -> PolarsResult<bool> {
    if !has_column(df, B::SOURCE_COLUMN) {
        return Ok(false);
    }

    let source = df.column(B::SOURCE_COLUMN)?;
    if !source.dtype().is_primitive_numeric() {
        warn!(
            column = B::SOURCE_COLUMN,
            dtype = %source.dtype(),
            "bucket source column is not numeric"
        );
        return Ok(false);
    }

    let floats = source.cast(&DataType::Float64)?;
    let labels: Vec<Option<&'static str>> = floats
        .f64()?
        .into_iter()
        .map(|v| v.and_then(B::from_value).map(B::label))
        .collect();

    let labels = Series::new(B::OUTPUT_COLUMN.into(), labels).cast(&B::label_dtype())?;
    df.with_column(labels)?;
    Ok(true)
}

/// Derive all three bucket families on the applications table.
///
/// Returns the names of the label columns that were added.
pub fn derive_buckets(mut df: DataFrame) -> PolarsResult<(DataFrame, Vec<String>)> {
    let mut derived = Vec::new();

    if derive_bucket::<GoodsPriceBucket>(&mut df)? {
        derived.push(GoodsPriceBucket::OUTPUT_COLUMN.to_string());
    }
    if derive_bucket::<IncomeBucket>(&mut df)? {
        derived.push(IncomeBucket::OUTPUT_COLUMN.to_string());
    }
    if derive_bucket::<CreditBucket>(&mut df)? {
        derived.push(CreditBucket::OUTPUT_COLUMN.to_string());
    }

    Ok((df, derived))
}
