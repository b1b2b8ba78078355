use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::domain::{
    common::entities::app_errors::CoreError,
    consumption::entities::{ConsumptionRecord, ConsumptionUpload},
};

pub const DATE_COLUMN: &str = "Fecha";
pub const CATEGORY_COLUMN: &str = "Tipo de Alimento";
pub const QUANTITY_COLUMN: &str = "Cantidad Consumida (gr)";

pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, CATEGORY_COLUMN, QUANTITY_COLUMN];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Four-digit years only
const YEAR_RANGE: RangeInclusive<i32> = 1000..=9999;

/// Column positions of the required fields inside the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    date: usize,
    category: usize,
    quantity: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self, CoreError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let position = |column: &str| names.iter().position(|name| *name == column);

        match (
            position(DATE_COLUMN),
            position(CATEGORY_COLUMN),
            position(QUANTITY_COLUMN),
        ) {
            (Some(date), Some(category), Some(quantity)) => Ok(Self {
                date,
                category,
                quantity,
            }),
            _ => Err(CoreError::MissingColumns {
                required: REQUIRED_COLUMNS.into_iter().map(str::to_string).collect(),
                missing: REQUIRED_COLUMNS
                    .into_iter()
                    .filter(|c| position(*c).is_none())
                    .map(str::to_string)
                    .collect(),
            }),
        }
    }
}

/// Validates an upload and parses it into consumption records.
///
/// Checks run in order: file extension, CSV structure, required columns,
/// then every row's date and quantity. The first failure aborts the whole
/// upload; there is no partial recovery.
pub fn parse_consumption_upload(
    upload: &ConsumptionUpload,
) -> Result<Vec<ConsumptionRecord>, CoreError> {
    upload.ensure_tabular_extension()?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(upload.content.as_ref());

    let headers = reader
        .headers()
        .map_err(|e| CoreError::MalformedUpload(e.to_string()))?
        .clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|e| CoreError::MalformedUpload(e.to_string()))?;
        records.push(parse_row(&row, row_number, layout)?);
    }

    if records.is_empty() {
        return Err(CoreError::EmptyDataset);
    }

    debug!(
        filename = %upload.filename,
        rows = records.len(),
        "Parsed consumption upload"
    );

    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    row_number: usize,
    layout: ColumnLayout,
) -> Result<ConsumptionRecord, CoreError> {
    let raw_date = row.get(layout.date).unwrap_or_default();
    let date = parse_record_date(raw_date).ok_or_else(|| CoreError::InvalidDate {
        row: row_number,
        value: raw_date.to_string(),
    })?;

    let raw_quantity = row.get(layout.quantity).unwrap_or_default();
    let quantity = raw_quantity
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q >= 0.0)
        .ok_or_else(|| CoreError::InvalidQuantity {
            row: row_number,
            value: raw_quantity.to_string(),
        })?;

    let category = row.get(layout.category).unwrap_or_default();

    Ok(ConsumptionRecord::new(date, category, quantity))
}

/// Parses the date field, discarding any time component.
/// Years outside four digits are rejected.
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content: &str) -> ConsumptionUpload {
        ConsumptionUpload::new("consumo.csv", content.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_upload() {
        let csv = "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n\
                   2024-01-01,Fruta,100\n\
                   2024-01-03,Verdura,50.5\n";
        let records = parse_consumption_upload(&upload(csv)).unwrap();
        assert_eq!(
            records,
            vec![
                ConsumptionRecord::new(date(2024, 1, 1), "Fruta", 100.0),
                ConsumptionRecord::new(date(2024, 1, 3), "Verdura", 50.5),
            ]
        );
    }

    #[test]
    fn test_column_order_and_extra_columns_are_irrelevant() {
        let csv = "Notas,Cantidad Consumida (gr),Fecha,Tipo de Alimento\n\
                   desayuno,80,2024-02-10,Cereal\n";
        let records = parse_consumption_upload(&upload(csv)).unwrap();
        assert_eq!(
            records,
            vec![ConsumptionRecord::new(date(2024, 2, 10), "Cereal", 80.0)]
        );
    }

    #[test]
    fn test_headers_are_trimmed_and_bom_tolerated() {
        let csv = "\u{feff}Fecha , Tipo de Alimento ,Cantidad Consumida (gr)\n2024-01-01, Fruta ,10\n";
        let records = parse_consumption_upload(&upload(csv)).unwrap();
        assert_eq!(records[0].category, "Fruta");
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let csv = "Fecha,Cantidad\n2024-01-01,10\n";
        let err = parse_consumption_upload(&upload(csv)).unwrap_err();
        match err {
            CoreError::MissingColumns { required, missing } => {
                assert_eq!(required.len(), 3);
                assert_eq!(
                    missing,
                    vec![CATEGORY_COLUMN.to_string(), QUANTITY_COLUMN.to_string()]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_extension_rejected_before_parsing() {
        let bad = ConsumptionUpload::new("consumo.txt", vec![0xff, 0xfe, 0x00]);
        assert!(matches!(
            parse_consumption_upload(&bad),
            Err(CoreError::InvalidFileExtension(_))
        ));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let csv = "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n2024-01-01,Fruta\n";
        assert!(matches!(
            parse_consumption_upload(&upload(csv)),
            Err(CoreError::MalformedUpload(_))
        ));
    }

    #[test]
    fn test_invalid_date_reports_row() {
        let csv = "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n\
                   2024-01-01,Fruta,10\n\
                   ayer,Fruta,10\n";
        match parse_consumption_upload(&upload(csv)).unwrap_err() {
            CoreError::InvalidDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "ayer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        for quantity in ["mucho", "-5", "NaN", ""] {
            let csv = format!(
                "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n2024-01-01,Fruta,{quantity}\n"
            );
            assert!(
                matches!(
                    parse_consumption_upload(&upload(&csv)),
                    Err(CoreError::InvalidQuantity { row: 1, .. })
                ),
                "{quantity:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let csv = "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n";
        assert!(matches!(
            parse_consumption_upload(&upload(csv)),
            Err(CoreError::EmptyDataset)
        ));
    }

    #[test]
    fn test_date_formats() {
        let expected = date(2024, 3, 5);
        for value in [
            "2024-03-05",
            "2024/03/05",
            "03/05/2024",
            "2024-03-05 18:30:00",
            "2024-03-05T18:30:00",
            "2024-03-05T18:30:00+02:00",
        ] {
            assert_eq!(parse_record_date(value), Some(expected), "{value}");
        }
        assert_eq!(parse_record_date("2024-13-01"), None);
        assert_eq!(parse_record_date("   "), None);
    }

    #[test]
    fn test_years_outside_four_digits_are_rejected() {
        for value in ["+200000-01-01", "-200000-01-01", "0001-01-01", "10000-01-01"] {
            assert_eq!(parse_record_date(value), None, "{value}");
        }
        assert_eq!(parse_record_date("1000-01-01"), Some(date(1000, 1, 1)));
        assert_eq!(parse_record_date("9999-12-31"), Some(date(9999, 12, 31)));

        let csv = "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n\
                   0001-01-01,Fruta,10\n\
                   9999-12-31,Fruta,10\n";
        assert!(matches!(
            parse_consumption_upload(&upload(csv)),
            Err(CoreError::InvalidDate { row: 1, .. })
        ));
    }
}
