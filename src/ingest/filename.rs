use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::IngestError;

/// Fixed literal token the upstream export prepends to every workbook name.
pub const FILENAME_PREFIX: &str = "CheckStockTempFile";

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{FILENAME_PREFIX}_(\d{{2}})-(\d{{2}})-(\d{{2}})"))
        .expect("valid filename regex")
});

/// Extracts the snapshot date from an upload filename of the form
/// `CheckStockTempFile_MM-DD-YY.<ext>`.
///
/// Two-digit years use a fixed pivot: 00-68 map to 2000-2068 and 69-99 map
/// to 1969-1999. This matches chrono's `%y` convention but is enforced here
/// explicitly so the rule does not depend on host-library defaults.
pub fn snapshot_date_from_filename(filename: &str) -> Result<NaiveDate, IngestError> {
    let caps = DATE_PATTERN
        .captures(filename)
        .ok_or_else(|| IngestError::InvalidFilenameFormat(filename.to_string()))?;

    // The pattern guarantees two digits each.
    let month: u32 = caps[1].parse().unwrap_or(0);
    let day: u32 = caps[2].parse().unwrap_or(0);
    let yy: i32 = caps[3].parse().unwrap_or(0);
    let year = if yy <= 68 { 2000 + yy } else { 1900 + yy };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| IngestError::InvalidFilenameFormat(filename.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conventional_filename() {
        let date = snapshot_date_from_filename("CheckStockTempFile_03-15-24.xlsx").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn rejects_other_naming_schemes() {
        for name in [
            "StockFile_2024-03-15.xlsx",
            "CheckStockTempFile.xlsx",
            "CheckStockTempFile_2024-03-15.xlsx",
            "checkstocktempfile_03-15-24.xlsx",
        ] {
            assert!(matches!(
                snapshot_date_from_filename(name),
                Err(IngestError::InvalidFilenameFormat(_))
            ));
        }
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(snapshot_date_from_filename("CheckStockTempFile_13-45-24.xlsx").is_err());
        assert!(snapshot_date_from_filename("CheckStockTempFile_02-30-24.xlsx").is_err());
    }

    #[test]
    fn two_digit_year_pivot() {
        let d = snapshot_date_from_filename("CheckStockTempFile_01-01-68.xlsx").unwrap();
        assert_eq!(d.format("%Y").to_string(), "2068");
        let d = snapshot_date_from_filename("CheckStockTempFile_01-01-69.xlsx").unwrap();
        assert_eq!(d.format("%Y").to_string(), "1969");
        let d = snapshot_date_from_filename("CheckStockTempFile_01-01-00.xlsx").unwrap();
        assert_eq!(d.format("%Y").to_string(), "2000");
    }
}
