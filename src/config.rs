//! Command line configuration.

use crate::charts::{ChartStyle, StyleError};
use crate::data::BucketPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version)]
/// Charts vehicle registrations by manufacturer from a CSV file.
pub struct Args {
    #[arg(short, long, default_value = "bo55_plates.csv")]
    /// CSV file with a header row.
    pub input: PathBuf,

    #[arg(short, long, default_value = "vehicle_makes.png")]
    /// Where the PNG chart is written.
    pub output: PathBuf,

    #[arg(long, default_value = "make")]
    /// Column holding the manufacturer name.
    pub column: String,

    #[arg(short = 'k', long, default_value_t = 12, value_parser = clap::value_parser!(u16).range(1..))]
    /// Number of manufacturers shown individually.
    pub top_k: u16,

    #[arg(long)]
    /// Drop manufacturers outside the top-K instead of grouping them as "Other".
    pub no_other: bool,

    #[arg(long)]
    /// JSON file overriding chart style settings.
    pub style: Option<PathBuf>,

    #[arg(long)]
    /// Save the chart without opening it in an image viewer.
    pub no_show: bool,
}

impl Args {
    pub fn bucket_policy(&self) -> BucketPolicy {
        BucketPolicy {
            top_k: self.top_k as usize,
            bucket_overflow: !self.no_other,
        }
    }

    pub fn chart_style(&self) -> Result<ChartStyle, StyleError> {
        match &self.style {
            Some(path) => ChartStyle::from_json_file(path),
            None => Ok(ChartStyle::default()),
        }
    }
}
