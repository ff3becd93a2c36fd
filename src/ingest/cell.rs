use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};

/// Tagged cell value from the tabular parser. Every coercion rule in the
/// normalizer is written against this enum so the fallback behavior is
/// exhaustive per variant instead of relying on runtime type inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Absent,
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDateTime),
    Bool(bool),
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => CellValue::Absent,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Integer(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) => CellValue::Date(ndt),
                None => CellValue::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Defensive integer coercion. Absent or unparseable input degrades to 0 —
/// never an error — so one malformed cell cannot abort an otherwise valid
/// batch. Text input has thousands-separator commas stripped and is trimmed
/// before a float-then-int conversion; floats truncate toward zero.
pub fn safe_int(value: &CellValue) -> i32 {
    match value {
        CellValue::Absent => 0,
        CellValue::Integer(i) => (*i).clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        CellValue::Float(f) => *f as i32,
        CellValue::Bool(b) => i32::from(*b),
        CellValue::Date(_) => 0,
        CellValue::Text(s) => {
            let cleaned = s.replace(',', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                0
            } else {
                cleaned.parse::<f64>().map(|f| f as i32).unwrap_or(0)
            }
        }
    }
}

/// Renders any non-absent cell to its trimmed string form; absent cells
/// become the empty string.
pub fn trimmed_text(value: &CellValue) -> String {
    match value {
        CellValue::Absent => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(f) => f.to_string(),
        CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::Date(d) => d.date().to_string(),
    }
}

const COUNT_DATE_FORMATS: [&str; 3] = ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];

/// Last-count date coercion: a native date value is taken as-is; text is
/// tried against the accepted formats in order, first match wins; anything
/// else is no date at all (not an error).
pub fn count_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(dt) => Some(dt.date()),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            COUNT_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_int_never_fails() {
        // The canonical coercion table.
        assert_eq!(safe_int(&CellValue::Text("".into())), 0);
        assert_eq!(safe_int(&CellValue::Absent), 0);
        assert_eq!(safe_int(&CellValue::Text("1,234".into())), 1234);
        assert_eq!(safe_int(&CellValue::Text("abc".into())), 0);
        assert_eq!(safe_int(&CellValue::Float(3.7)), 3);
    }

    #[test]
    fn safe_int_edge_inputs() {
        assert_eq!(safe_int(&CellValue::Text("  42  ".into())), 42);
        assert_eq!(safe_int(&CellValue::Text("1,234.9".into())), 1234);
        assert_eq!(safe_int(&CellValue::Text("-5".into())), -5);
        assert_eq!(safe_int(&CellValue::Text("  ,  ".into())), 0);
        assert_eq!(safe_int(&CellValue::Integer(17)), 17);
        assert_eq!(safe_int(&CellValue::Bool(true)), 1);
        assert_eq!(safe_int(&CellValue::Float(-2.9)), -2);
    }

    #[test]
    fn trimmed_text_variants() {
        assert_eq!(trimmed_text(&CellValue::Absent), "");
        assert_eq!(trimmed_text(&CellValue::Text("  widget  ".into())), "widget");
        assert_eq!(trimmed_text(&CellValue::Integer(12)), "12");
        assert_eq!(trimmed_text(&CellValue::Bool(false)), "FALSE");
    }

    #[test]
    fn count_date_accepts_formats_in_order() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(count_date(&CellValue::Text("03/15/24".into())), Some(expected));
        assert_eq!(count_date(&CellValue::Text("03/15/2024".into())), Some(expected));
        assert_eq!(count_date(&CellValue::Text("2024-03-15".into())), Some(expected));
        assert_eq!(
            count_date(&CellValue::Date(expected.and_hms_opt(9, 30, 0).unwrap())),
            Some(expected)
        );
    }

    #[test]
    fn count_date_degrades_to_none() {
        assert_eq!(count_date(&CellValue::Absent), None);
        assert_eq!(count_date(&CellValue::Text("15 March".into())), None);
        assert_eq!(count_date(&CellValue::Integer(45366)), None);
    }

    #[test]
    fn calamine_cells_map_to_tagged_variants() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Absent);
        assert_eq!(
            CellValue::from(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
        assert_eq!(CellValue::from(&Data::Int(3)), CellValue::Integer(3));
        assert_eq!(CellValue::from(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
    }
}
