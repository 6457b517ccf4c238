//! Row-level normalization of the raw market tracker.
//!
//! Per chunk: strip commas from `CITY`, project to [`REQUIRED_COLUMNS`], drop
//! rows with a missing value in any of them, then parse the period bounds and
//! derive year and month-name columns. Nullness is decided before dates are
//! parsed, so a present but malformed date aborts instead of being dropped.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::constants::{
    month_name, CITY_COLUMN, NULL_MARKERS, PERIOD_BEGIN_COLUMN, PERIOD_END_COLUMN,
    REQUIRED_COLUMNS,
};
use crate::error::SchemaError;
use crate::pipeline::chunked::RawChunk;

static NULLS: Lazy<HashSet<&'static str>> = Lazy::new(|| NULL_MARKERS.iter().copied().collect());

const BEGIN_POS: usize = 0;
const END_POS: usize = 1;

pub fn is_null(value: &str) -> bool {
    value.is_empty() || NULLS.contains(value)
}

/// Accepts ISO dates, ISO date-times (space or `T` separated, optional
/// fraction), RFC 3339 and US `MM/DD/YYYY`.
pub fn parse_period_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(value, "%m/%d/%Y").ok()
}

/// Source header positions of the required columns
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    required: Vec<usize>,
    city: usize,
}

impl ColumnPlan {
    /// Fails on the first required column absent from `header`.
    /// With duplicated header names the first occurrence wins.
    pub fn resolve(header: &StringRecord) -> Result<Self, SchemaError> {
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };
        let required = REQUIRED_COLUMNS
            .iter()
            .map(|name| position(*name))
            .collect::<Result<Vec<_>, _>>()?;
        let city = position(CITY_COLUMN)?;
        Ok(Self { required, city })
    }
}

/// One row of the normalized dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    /// Required column values, `REQUIRED_COLUMNS` order
    values: Vec<String>,
    period_begin: NaiveDate,
    period_end: NaiveDate,
}

impl NormalizedRow {
    pub fn value(&self, column: &str) -> Option<&str> {
        REQUIRED_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i].as_str())
    }

    pub fn period_begin(&self) -> NaiveDate {
        self.period_begin
    }

    pub fn period_end(&self) -> NaiveDate {
        self.period_end
    }

    pub fn begin_year(&self) -> i32 {
        self.period_begin.year()
    }

    pub fn end_year(&self) -> i32 {
        self.period_end.year()
    }

    pub fn begin_month(&self) -> &'static str {
        month_abbrev(self.period_begin)
    }

    pub fn end_month(&self) -> &'static str {
        month_abbrev(self.period_end)
    }

    /// Output fields: required columns with dates rendered as `YYYY-MM-DD`,
    /// then the four derived columns.
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.values.len() + 4);
        for (i, value) in self.values.iter().enumerate() {
            match i {
                BEGIN_POS => fields.push(self.period_begin.format("%Y-%m-%d").to_string()),
                END_POS => fields.push(self.period_end.format("%Y-%m-%d").to_string()),
                _ => fields.push(value.clone()),
            }
        }
        fields.push(self.begin_year().to_string());
        fields.push(self.end_year().to_string());
        fields.push(self.begin_month().to_string());
        fields.push(self.end_month().to_string());
        fields
    }
}

fn month_abbrev(date: NaiveDate) -> &'static str {
    // chrono guarantees month() in 1..=12
    month_name(date.month()).unwrap_or_default()
}

/// Output of normalizing one raw chunk
#[derive(Debug, Default)]
pub struct NormalizedChunk {
    pub rows: Vec<NormalizedRow>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

pub fn normalize_chunk(plan: &ColumnPlan, chunk: &RawChunk) -> Result<NormalizedChunk, SchemaError> {
    let mut out = NormalizedChunk {
        rows: Vec::with_capacity(chunk.len()),
        rows_read: chunk.len(),
        rows_dropped: 0,
    };

    for (offset, record) in chunk.rows.iter().enumerate() {
        // Project, and drop the row on any missing required value
        let mut values = Vec::with_capacity(plan.required.len());
        let mut complete = true;
        for &idx in &plan.required {
            let value = record.get(idx).unwrap_or("");
            if is_null(value) {
                complete = false;
                break;
            }
            if idx == plan.city {
                values.push(value.replace(',', ""));
            } else {
                values.push(value.to_string());
            }
        }
        if !complete {
            out.rows_dropped += 1;
            continue;
        }

        let row_number = chunk.first_row + offset as u64 + 1;
        let period_begin = parse_required_date(&values[BEGIN_POS], PERIOD_BEGIN_COLUMN, row_number)?;
        let period_end = parse_required_date(&values[END_POS], PERIOD_END_COLUMN, row_number)?;

        out.rows.push(NormalizedRow {
            values,
            period_begin,
            period_end,
        });
    }

    Ok(out)
}

fn parse_required_date(value: &str, column: &str, row: u64) -> Result<NaiveDate, SchemaError> {
    parse_period_date(value).ok_or_else(|| SchemaError::InvalidDate {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}
