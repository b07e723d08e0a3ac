use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

pub const DEFAULT_NDI: Money = Decimal::ZERO;
pub const DEFAULT_DSR_MAX_PCT: Percent = dec!(70);

/// A bank's lending terms as they arrive from a rate table. `ndi` and
/// `dsr_max_pct` may be blank.
///
/// Accepts both the spreadsheet column headers (`Bank`, `Rate`, `NDI`,
/// `DSR Max (%)`) and the snake_case field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRateRow {
    #[serde(alias = "Bank")]
    pub bank_name: String,
    #[serde(alias = "Rate")]
    pub annual_rate_pct: Percent,
    #[serde(default, alias = "NDI", skip_serializing_if = "Option::is_none")]
    pub ndi: Option<Money>,
    #[serde(default, alias = "DSR Max (%)", skip_serializing_if = "Option::is_none")]
    pub dsr_max_pct: Option<Percent>,
}

impl BankRateRow {
    pub fn into_record(self) -> BankRateRecord {
        BankRateRecord {
            bank_name: self.bank_name,
            annual_rate_pct: self.annual_rate_pct,
            ndi: self.ndi.unwrap_or(DEFAULT_NDI),
            dsr_max_pct: self.dsr_max_pct.unwrap_or(DEFAULT_DSR_MAX_PCT),
        }
    }
}

/// Fully populated lending terms for one bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRateRecord {
    pub bank_name: String,
    pub annual_rate_pct: Percent,
    pub ndi: Money,
    pub dsr_max_pct: Percent,
}

impl From<BankRateRow> for BankRateRecord {
    fn from(row: BankRateRow) -> Self {
        row.into_record()
    }
}

/// Resolve defaults for a whole table, preserving order.
pub fn resolve_rows(rows: Vec<BankRateRow>) -> Vec<BankRateRecord> {
    rows.into_iter().map(BankRateRow::into_record).collect()
}
