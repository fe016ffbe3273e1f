//! Text formatting for chart annotations.

use crate::data::{MakeSeries, SeriesEntry};
use chrono::NaiveDate;

/// Format an integer with comma thousands separators: `12345` -> `12,345`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Percentage with one decimal place: `33.333` -> `33.3%`.
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Annotation drawn at the end of a bar.
pub fn bar_annotation(series: &MakeSeries, entry: &SeriesEntry, with_percent: bool) -> String {
    let count = format_thousands(entry.count);
    if with_percent {
        format!("{} ({})", count, format_percent(series.percent(entry)))
    } else {
        count
    }
}

pub fn footer_text(prefix: &str, date: NaiveDate) -> String {
    format!("{}{}", prefix, date.format("%Y-%m-%d"))
}

pub fn total_text(total: u64) -> String {
    format!("Total records: {}", format_thousands(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BucketPolicy, MakeTally};

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(12345), "12,345");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn percent_rounds_to_one_place() {
        assert_eq!(format_percent(100.0 / 3.0), "33.3%");
        assert_eq!(format_percent(50.0), "50.0%");
        assert_eq!(format_percent(100.0 / 6.0), "16.7%");
    }

    #[test]
    fn annotations_follow_style_flag() {
        let tally = MakeTally::from_makes(
            ["Ford", "BMW", "Ford", "Audi", "Ford", "BMW"]
                .iter()
                .map(|m| Some(*m)),
        );
        let series = tally.bucket(&BucketPolicy {
            top_k: 2,
            bucket_overflow: true,
        });
        let ford = &series.entries()[0];

        assert_eq!(bar_annotation(&series, ford, true), "3 (50.0%)");
        assert_eq!(bar_annotation(&series, ford, false), "3");
    }

    #[test]
    fn footer_and_total() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            footer_text("Lisense Insights - Generated on ", date),
            "Lisense Insights - Generated on 2024-03-09"
        );
        assert_eq!(total_text(48213), "Total records: 48,213");
    }
}
