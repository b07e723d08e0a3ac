use std::fs;
use std::io;
use std::path::Path;

use calamine::{RangeDeserializerBuilder, Reader, Xlsx};
use loan_eligibility_core::eligibility::BankRateRow;
use loan_eligibility_core::{EligibilityError, LoanResult};
use tracing::{info, warn};

const EXPECTED_COLUMNS: &str = "Bank, Rate, NDI, DSR Max (%)";

/// Rows read from a rate table, plus the reason the table could not be read.
#[derive(Debug, Default)]
pub struct RateTable {
    pub rows: Vec<BankRateRow>,
    pub warning: Option<String>,
}

/// Source format, chosen by file extension. Anything unrecognised is CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateFormat {
    Csv,
    Json,
    Xlsx,
}

impl RateFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RateFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => RateFormat::Xlsx,
            _ => RateFormat::Csv,
        }
    }
}

/// Load a bank rate table from CSV, JSON or an Excel workbook.
///
/// Never fails: a missing or malformed source yields an empty table and a
/// warning, and the evaluation then reports that no banks were evaluated.
pub fn load_rate_table(path: &Path) -> RateTable {
    match read_rate_rows(path) {
        Ok(rows) => {
            info!(path = %path.display(), banks = rows.len(), "loaded rate table");
            RateTable {
                rows,
                warning: None,
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "rate table unavailable");
            RateTable {
                rows: Vec::new(),
                warning: Some(e.to_string()),
            }
        }
    }
}

fn read_rate_rows(path: &Path) -> LoanResult<Vec<BankRateRow>> {
    let contents = fs::read(path).map_err(|e| {
        EligibilityError::ConfigurationMissing(format!(
            "failed to read '{}' ({e}); expected columns {EXPECTED_COLUMNS}",
            path.display()
        ))
    })?;

    let parsed = match RateFormat::from_path(path) {
        RateFormat::Json => parse_json(&contents),
        RateFormat::Xlsx => parse_xlsx(contents),
        RateFormat::Csv => parse_csv(contents.as_slice()),
    };

    parsed.map_err(|reason| {
        EligibilityError::ConfigurationMissing(format!(
            "failed to parse '{}' ({reason}); expected columns {EXPECTED_COLUMNS}",
            path.display()
        ))
    })
}

/// Parse CSV rows keyed by header. Blank NDI / DSR cells become `None`.
pub fn parse_csv<R: io::Read>(reader: R) -> Result<Vec<BankRateRow>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize()
        .collect::<Result<Vec<BankRateRow>, csv::Error>>()
        .map_err(|e| e.to_string())
}

/// Parse a JSON array of rows.
pub fn parse_json(contents: &[u8]) -> Result<Vec<BankRateRow>, String> {
    serde_json::from_slice(contents).map_err(|e| e.to_string())
}

/// Parse the first worksheet of an `.xlsx` workbook. The first row holds
/// the headers; empty NDI / DSR cells become `None`.
pub fn parse_xlsx(contents: Vec<u8>) -> Result<Vec<BankRateRow>, String> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(io::Cursor::new(contents)).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or("workbook has no worksheets")?
        .map_err(|e| e.to_string())?;

    RangeDeserializerBuilder::new()
        .from_range::<_, BankRateRow>(&range)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<BankRateRow>, _>>()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_csv_with_spreadsheet_headers() {
        let data = "Bank,Rate,NDI,DSR Max (%)\n\
                    Maybank,3.8,200,70\n\
                    CIMB,3.65,,\n\
                    RHB, 4.1 ,150,\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].bank_name, "Maybank");
        assert_eq!(rows[0].annual_rate_pct, dec!(3.8));
        assert_eq!(rows[0].ndi, Some(dec!(200)));
        assert_eq!(rows[1].ndi, None);
        assert_eq!(rows[1].dsr_max_pct, None);
        assert_eq!(rows[2].annual_rate_pct, dec!(4.1));
        assert_eq!(rows[2].dsr_max_pct, None);
    }

    #[test]
    fn test_csv_without_optional_columns() {
        let data = "bank_name,annual_rate_pct\nHong Leong,3.9\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        let record = rows[0].clone().into_record();
        assert_eq!(record.ndi, Decimal::ZERO);
        assert_eq!(record.dsr_max_pct, dec!(70));
    }

    #[test]
    fn test_csv_bad_rate_is_an_error() {
        let data = "Bank,Rate\nAmBank,not-a-number\n";
        assert!(parse_csv(data.as_bytes()).is_err());
    }

    #[test]
    fn test_json_rows() {
        let rows = parse_json(br#"[{"Bank": "BSN", "Rate": "4.0", "NDI": "100"}]"#).unwrap();
        assert_eq!(rows[0].bank_name, "BSN");
        assert_eq!(rows[0].ndi, Some(dec!(100)));
        assert_eq!(rows[0].dsr_max_pct, None);
    }

    #[test]
    fn test_missing_file_yields_empty_table_with_warning() {
        let table = load_rate_table(Path::new("/nonexistent/bank_rates.csv"));
        assert!(table.rows.is_empty());
        let warning = table.warning.unwrap();
        assert!(warning.starts_with("Rate table unavailable"), "{warning}");
        assert!(warning.contains(EXPECTED_COLUMNS));
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(RateFormat::from_path(Path::new("rates.csv")), RateFormat::Csv);
        assert_eq!(RateFormat::from_path(Path::new("rates.JSON")), RateFormat::Json);
        assert_eq!(RateFormat::from_path(Path::new("Bank Rates.xlsx")), RateFormat::Xlsx);
        assert_eq!(RateFormat::from_path(Path::new("rates")), RateFormat::Csv);
    }

    #[test]
    fn test_xlsx_garbage_is_an_error() {
        assert!(parse_xlsx(b"Bank,Rate\nMaybank,3.8\n".to_vec()).is_err());
    }

    #[test]
    fn test_unreadable_workbook_yields_empty_table_with_warning() {
        let path = std::env::temp_dir()
            .join(format!("loanelig-{}-bank_rates.xlsx", std::process::id()));
        fs::write(&path, b"not a zip archive").unwrap();
        let table = load_rate_table(&path);
        fs::remove_file(&path).unwrap();

        assert!(table.rows.is_empty());
        let warning = table.warning.unwrap();
        assert!(warning.contains("failed to parse"), "{warning}");
        assert!(warning.contains(EXPECTED_COLUMNS));
    }
}
