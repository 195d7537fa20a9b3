//! Groups parsed records into the sparse per-month drug matrix.

use std::collections::{HashMap, HashSet};

use time::Date;

use super::record::Record;

/// One month's counts across the currently selected drugs.
///
/// The mapping is sparse: a drug absent from `counts` has no data for the
/// month, which is not the same as zero. The sort key used to order months
/// is internal scaffolding and does not appear here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyCounts {
    pub month: String,
    pub counts: HashMap<String, f64>,
}

impl MonthlyCounts {
    pub fn value_for(&self, drug: &str) -> Option<f64> {
        self.counts.get(drug).copied()
    }
}

struct PendingRow {
    date_key: Option<Date>,
    counts: HashMap<String, f64>,
}

/// Aggregate records into ordered monthly rows for the given drug selection.
///
/// Pure and recomputed in full on every call: same records and selection in,
/// same rows out. A duplicate (drug, month) pair in the source silently takes
/// the later value. An empty selection short-circuits.
pub fn monthly_rows(records: &[Record], selection: &[String]) -> Vec<MonthlyCounts> {
    if selection.is_empty() {
        return Vec::new();
    }

    let selected: HashSet<&str> = selection.iter().map(String::as_str).collect();
    let mut grouped: HashMap<String, PendingRow> = HashMap::new();

    for record in records {
        if !selected.contains(record.drug_involved.as_str()) {
            continue;
        }

        let row = grouped
            .entry(record.month_label.clone())
            .or_insert_with(|| PendingRow {
                // First occurrence fixes the sort key for the month.
                date_key: record.date_key,
                counts: HashMap::new(),
            });
        row.counts
            .insert(record.drug_involved.clone(), record.overdose_deaths);
    }

    let mut rows: Vec<(String, PendingRow)> = grouped.into_iter().collect();
    rows.sort_by(|(label_a, row_a), (label_b, row_b)| {
        match (row_a.date_key, row_b.date_key) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| label_a.cmp(label_b)),
            // Unparsable month-ending dates fall back to label order, which
            // is monotonic for well-formed YYYY-MM labels anyway.
            _ => label_a.cmp(label_b),
        }
    });

    rows.into_iter()
        .map(|(month, row)| MonthlyCounts {
            month,
            counts: row.counts,
        })
        .collect()
}

/// Sorted unique drug names present in the dataset.
pub fn available_drugs(records: &[Record]) -> Vec<String> {
    let mut drugs: Vec<String> = records
        .iter()
        .map(|r| r.drug_involved.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    drugs.sort();
    drugs
}

/// Initial chart selection: the first three drugs of the catalog.
pub fn default_selection(available: &[String]) -> Vec<String> {
    available.iter().take(3).cloned().collect()
}
