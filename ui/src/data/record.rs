//! Typed rows of the provisional overdose-deaths dataset.

use time::macros::format_description;
use time::Date;

/// One dataset row: a jurisdiction/drug/month observation.
///
/// Numeric fields keep the tolerant-coercion policy of the parser: malformed
/// cells come through as NaN rather than dropping the row. `month_label` is
/// the grouping and ordering key downstream; `date_key` exists only so the
/// aggregator can sort months and is never exposed past it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub data_as_of: String,
    pub death_year: f64,
    pub death_month: f64,
    pub jurisdiction: String,
    pub drug_involved: String,
    pub time_period: String,
    pub month_ending_date: String,
    pub month_label: String,
    pub overdose_deaths: f64,
    pub(crate) date_key: Option<Date>,
}

/// Grouping key: raw year plus the zero-padded raw month, e.g. `2022-03`.
pub fn month_label(year: &str, month: &str) -> String {
    format!("{}-{:0>2}", year.trim(), month.trim())
}

/// Month-ending dates appear either ISO (`2022-03-31`) or US (`03/31/2022`)
/// depending on the export. Unparsable dates yield no key; the aggregator
/// falls back to label order.
pub fn parse_date_key(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    let iso = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(trimmed, &iso) {
        return Some(date);
    }
    let us = format_description!("[month]/[day]/[year]");
    Date::parse(trimmed, &us).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_label_zero_pads() {
        assert_eq!(month_label("2022", "3"), "2022-03");
        assert_eq!(month_label("2022", "11"), "2022-11");
    }

    #[test]
    fn month_label_trims_whitespace() {
        assert_eq!(month_label(" 2021 ", " 7 "), "2021-07");
    }

    #[test]
    fn date_key_accepts_both_dialects() {
        let iso = parse_date_key("2022-03-31").unwrap();
        let us = parse_date_key("03/31/2022").unwrap();
        assert_eq!(iso, us);
        assert!(parse_date_key("March 2022").is_none());
    }
}
