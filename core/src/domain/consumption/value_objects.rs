use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    common::entities::app_errors::CoreError, consumption::entities::ConsumptionRecord,
};

/// Quantity consumed per food category, summed over every record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotals {
    pub totals: BTreeMap<String, f64>,
}

impl CategoryTotals {
    pub fn from_records(records: &[ConsumptionRecord]) -> Self {
        let mut totals = BTreeMap::new();
        for record in records {
            *totals.entry(record.category.clone()).or_insert(0.0) += record.quantity;
        }
        Self { totals }
    }

    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(label, total)| (label.as_str(), *total))
    }
}

/// Longest calendar a daily series may cover, roughly ten years
pub const MAX_SERIES_DAYS: i64 = 3660;

/// One value per calendar day from `start` onwards, without gaps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailySeries {
    pub start: NaiveDate,
    pub values: Vec<f64>,
}

impl DailySeries {
    /// Reindexes records onto a contiguous daily calendar spanning the first
    /// to the last observed date. Same-day records are summed, absent days
    /// are zero. Calendars longer than [`MAX_SERIES_DAYS`] are rejected.
    pub fn from_records(records: &[ConsumptionRecord]) -> Result<Self, CoreError> {
        let (Some(start), Some(end)) = (
            records.iter().map(|r| r.date).min(),
            records.iter().map(|r| r.date).max(),
        ) else {
            return Err(CoreError::EmptyDataset);
        };

        let days = (end - start).num_days() + 1;
        if days > MAX_SERIES_DAYS {
            return Err(CoreError::DateSpanTooLong {
                days,
                max_days: MAX_SERIES_DAYS,
            });
        }

        let mut values = vec![0.0; days as usize];
        for record in records {
            let offset = (record.date - start).num_days() as usize;
            values[offset] += record.quantity;
        }

        Ok(Self { start, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn end(&self) -> NaiveDate {
        self.date_at(self.values.len().saturating_sub(1))
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn date_at(&self, offset: usize) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(offset, value)| (self.date_at(offset), *value))
    }

    /// The `horizon` calendar days following the last observed date
    pub fn future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        let last = self.len().saturating_sub(1);
        (1..=horizon).map(|step| self.date_at(last + step)).collect()
    }
}
