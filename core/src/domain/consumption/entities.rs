use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::common::entities::app_errors::CoreError;

/// One row of an uploaded consumption file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub category: String,
    /// Consumed quantity in grams
    pub quantity: f64,
}

impl ConsumptionRecord {
    pub fn new(date: NaiveDate, category: impl Into<String>, quantity: f64) -> Self {
        Self {
            date,
            category: category.into(),
            quantity,
        }
    }
}

/// Raw upload as received from the transport layer
#[derive(Debug, Clone)]
pub struct ConsumptionUpload {
    pub filename: String,
    pub content: Bytes,
}

impl ConsumptionUpload {
    pub const EXTENSION: &'static str = ".csv";

    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Rejects anything that is not named like a CSV file. Runs before any parsing.
    pub fn ensure_tabular_extension(&self) -> Result<(), CoreError> {
        let name = self.filename.trim();
        let has_extension = name.len() >= Self::EXTENSION.len()
            && name
                .get(name.len() - Self::EXTENSION.len()..)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(Self::EXTENSION));

        if has_extension {
            Ok(())
        } else {
            Err(CoreError::InvalidFileExtension(self.filename.clone()))
        }
    }
}
