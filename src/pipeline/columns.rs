//! Well-known column names of the application datasets

/// Applicant identifier, the join key shared by both tables
pub const APPLICANT_ID: &str = "SK_ID_CURR";

/// Binary outcome flag: 1 = defaulted, 0 = repaid
pub const TARGET: &str = "TARGET";

/// Human-readable copy of [`TARGET`]
pub const TARGET_LABEL: &str = "TARGET_STR";

pub const CNT_FAM_MEMBERS: &str = "CNT_FAM_MEMBERS";
pub const OCCUPATION_TYPE: &str = "OCCUPATION_TYPE";
pub const NAME_TYPE_SUITE: &str = "NAME_TYPE_SUITE";
pub const AMT_ANNUITY: &str = "AMT_ANNUITY";
pub const AMT_GOODS_PRICE: &str = "AMT_GOODS_PRICE";
pub const AMT_INCOME_TOTAL: &str = "AMT_INCOME_TOTAL";
pub const AMT_CREDIT: &str = "AMT_CREDIT";
pub const PRODUCT_COMBINATION: &str = "PRODUCT_COMBINATION";
pub const CNT_PAYMENT: &str = "CNT_PAYMENT";
pub const NAME_CONTRACT_STATUS: &str = "NAME_CONTRACT_STATUS";
pub const NAME_EDUCATION_TYPE: &str = "NAME_EDUCATION_TYPE";
pub const NAME_CONTRACT_TYPE: &str = "NAME_CONTRACT_TYPE";
pub const DAYS_BIRTH: &str = "DAYS_BIRTH";
pub const DAYS_EMPLOYED: &str = "DAYS_EMPLOYED";

/// Columns that are never pruned, whatever their null fraction
pub const PROTECTED_COLUMNS: [&str; 2] = [APPLICANT_ID, TARGET];

/// Suffix given to previous-application columns that collide in the merge
pub const PREVIOUS_SUFFIX: &str = "_PREV";

/// Does the frame contain a column with this name?
pub fn has_column(df: &polars::prelude::DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}
