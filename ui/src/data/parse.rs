//! Tolerant row parser for the raw delimited dataset.
//!
//! The export is a strict comma dialect with a fixed 8-column schema; there
//! is no quoting, so no escape handling here. The header line is discarded
//! without validating names, and short rows are dropped silently. Malformed
//! numeric cells coerce to NaN and the row is still emitted.

use super::record::{month_label, parse_date_key, Record};

const MIN_COLUMNS: usize = 8;

pub fn parse_dataset(text: &str) -> Vec<Record> {
    let mut lines = text.trim().lines();
    if lines.next().is_none() {
        return Vec::new();
    }
    lines.filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<Record> {
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() < MIN_COLUMNS {
        return None;
    }

    let [data_as_of, death_year, death_month, jurisdiction, drug_involved, time_period, month_ending_date, overdose_deaths] =
        [
            cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7],
        ];

    Some(Record {
        data_as_of: data_as_of.to_string(),
        death_year: coerce_number(death_year),
        death_month: coerce_number(death_month),
        jurisdiction: jurisdiction.to_string(),
        drug_involved: drug_involved.to_string(),
        time_period: time_period.to_string(),
        month_ending_date: month_ending_date.to_string(),
        month_label: month_label(death_year, death_month),
        overdose_deaths: coerce_number(overdose_deaths),
        date_key: parse_date_key(month_ending_date),
    })
}

fn coerce_number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}
