//! Make Tally Module
//! Counts manufacturers and folds the long tail into an "Other" bucket.

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Label of the synthetic overflow entry.
pub const OTHER_LABEL: &str = "Other";

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Column '{0}' not found in data")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Top-K selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPolicy {
    /// Number of makes shown individually.
    pub top_k: usize,
    /// Fold everything outside the top-K into a single "Other" entry.
    pub bucket_overflow: bool,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            top_k: 12,
            bucket_overflow: true,
        }
    }
}

/// Occurrence count per make, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct MakeTally {
    counts: Vec<(String, u64)>,
    total: u64,
    missing: u64,
}

impl MakeTally {
    /// Count make values. `None` entries are recorded as missing.
    pub fn from_makes<'a, I>(makes: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut tally = Self::default();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for make in makes {
            let Some(make) = make else {
                tally.missing += 1;
                continue;
            };

            match index.get(make) {
                Some(&i) => tally.counts[i].1 += 1,
                None => {
                    index.insert(make, tally.counts.len());
                    tally.counts.push((make.to_string(), 1));
                }
            }
            tally.total += 1;
        }

        tally
    }

    /// Count the values of `column` in the DataFrame.
    pub fn from_frame(df: &DataFrame, column: &str) -> Result<Self, TallyError> {
        let col = df
            .column(column)
            .map_err(|_| TallyError::MissingColumn(column.to_string()))?;
        let as_str = col.cast(&DataType::String)?;
        let values = as_str.as_materialized_series().str()?;

        Ok(Self::from_makes(values.into_iter()))
    }

    /// Number of rows that were counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of rows skipped because the make was missing.
    pub fn missing(&self) -> u64 {
        self.missing
    }

    /// Number of distinct makes.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct makes in alphabetical order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.counts.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Makes by count descending. Ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> =
            self.counts.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Build the display series for the given policy.
    pub fn bucket(&self, policy: &BucketPolicy) -> MakeSeries {
        let ranked = self.ranked();
        let k = policy.top_k.min(ranked.len());

        let mut entries: Vec<SeriesEntry> = ranked[..k]
            .iter()
            .enumerate()
            .map(|(rank, (name, count))| SeriesEntry {
                label: name.to_string(),
                count: *count,
                kind: EntryKind::Ranked { rank },
            })
            .collect();

        let overflow: u64 = ranked[k..].iter().map(|(_, c)| c).sum();
        if policy.bucket_overflow && ranked.len() > k {
            entries.push(SeriesEntry {
                label: other_label(&entries, ranked.len() - k),
                count: overflow,
                kind: EntryKind::Other,
            });
        }

        MakeSeries {
            entries,
            ranked_len: k,
            total: self.total + self.missing,
        }
    }
}

/// Label for the overflow entry that no ranked make already uses.
fn other_label(ranked: &[SeriesEntry], excluded: usize) -> String {
    let taken = |label: &str| ranked.iter().any(|e| e.label == label);
    if !taken(OTHER_LABEL) {
        return OTHER_LABEL.to_string();
    }

    let mut label = format!("{} ({} makes)", OTHER_LABEL, excluded);
    while taken(&label) {
        label.push('*');
    }
    label
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Position among the top-K, 0 for the most frequent make.
    Ranked { rank: usize },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    pub label: String,
    pub count: u64,
    pub kind: EntryKind,
}

impl SeriesEntry {
    pub fn is_other(&self) -> bool {
        self.kind == EntryKind::Other
    }
}

/// Ranked makes ready for display: top-K first, then "Other" if present.
#[derive(Debug, Clone)]
pub struct MakeSeries {
    entries: Vec<SeriesEntry>,
    ranked_len: usize,
    total: u64,
}

impl MakeSeries {
    /// Entries in rank order, largest first, "Other" last.
    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    /// Entries from the bottom of the chart to the top.
    pub fn display_order(&self) -> Vec<&SeriesEntry> {
        let mut order: Vec<&SeriesEntry> = self.other().into_iter().collect();
        order.extend(self.entries[..self.ranked_len].iter().rev());
        order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of individually ranked makes.
    pub fn ranked_len(&self) -> usize {
        self.ranked_len
    }

    pub fn other(&self) -> Option<&SeriesEntry> {
        self.entries.last().filter(|e| e.is_other())
    }

    /// All rows of the table, including those without a make. Denominator for percentages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Sum of the displayed counts.
    pub fn displayed_total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    /// Share of the total, in percent.
    pub fn percent(&self, entry: &SeriesEntry) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        entry.count as f64 / self.total as f64 * 100.0
    }
}
