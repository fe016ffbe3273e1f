//! Report pipeline: load the registrations, summarize them, chart the makes.

use crate::charts::{BarChartRenderer, ChartStyle, RenderContext};
use crate::config::Args;
use crate::data::{load_vehicle_data, row_count, BucketPolicy, MakeTally};
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a plotting attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutcome {
    /// Nothing to chart: no table, no rows, or no make values.
    NoData,
    Saved(PathBuf),
}

/// Everything needed to turn a table into a chart.
pub struct Report<'a> {
    pub column: &'a str,
    pub policy: BucketPolicy,
    pub style: &'a ChartStyle,
    pub ctx: RenderContext,
    pub output: &'a Path,
}

impl Report<'_> {
    /// Tally the make column and render the chart, skipping absent or empty tables.
    pub fn plot_vehicle_makes(&self, table: Option<&DataFrame>) -> Result<PlotOutcome> {
        let Some(df) = table.filter(|df| row_count(df) > 0) else {
            warn!("No data to plot");
            return Ok(PlotOutcome::NoData);
        };

        let tally = MakeTally::from_frame(df, self.column)?;
        if tally.is_empty() {
            warn!("No data to plot");
            return Ok(PlotOutcome::NoData);
        }

        let series = tally.bucket(&self.policy);
        for entry in series.entries() {
            debug!(make = %entry.label, count = entry.count, "Series entry");
        }
        info!(
            distinct = tally.distinct(),
            shown = series.len(),
            displayed = series.displayed_total(),
            other = series.other().map(|o| o.count).unwrap_or(0),
            "Aggregated {} records",
            tally.total()
        );

        BarChartRenderer::render(&series, self.style, &self.ctx, self.output)
            .with_context(|| format!("Failed to render chart to {}", self.output.display()))?;
        Ok(PlotOutcome::Saved(self.output.to_path_buf()))
    }
}

/// Print the record count and the distinct makes, as a quick sanity check of the input.
fn print_summary(df: &DataFrame, column: &str) -> Result<()> {
    let tally = MakeTally::from_frame(df, column)?;
    if tally.missing() > 0 {
        warn!(
            missing = tally.missing(),
            "Skipped rows with no value in column '{}'", column
        );
    }

    println!("Loaded {} vehicle records", row_count(df));
    println!("Vehicle makes in the dataset: {:?}", tally.sorted_names());
    Ok(())
}

fn show_chart(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!("Could not open {} in a viewer: {}", path.display(), e);
    }
}

pub fn run(args: &Args) -> Result<()> {
    let style = args.chart_style().context("Failed to load chart style")?;

    let Some(df) = load_vehicle_data(&args.input) else {
        return Ok(());
    };
    print_summary(&df, &args.column)?;

    let report = Report {
        column: &args.column,
        policy: args.bucket_policy(),
        style: &style,
        ctx: RenderContext::now(),
        output: &args.output,
    };

    if let PlotOutcome::Saved(path) = report.plot_vehicle_makes(Some(&df))? {
        println!("Chart saved to {}", path.display());
        if !args.no_show {
            show_chart(&path);
        }
    }
    Ok(())
}
