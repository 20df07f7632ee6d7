use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{AgeRange, DEFAULT_AGE_RANGE};

/// Dataset opened at start-up when no file is given and it exists.
pub const DEFAULT_DATA_FILE: &str = "cleaned_medical_data.csv";

/// Command-line arguments for the dashboard
#[derive(Parser, Debug)]
#[command(name = "medical-dashboard")]
#[command(about = "Interactive dashboard for cleaned cardiac-marker datasets")]
#[command(version)]
pub struct Cli {
    /// Dataset to open (.csv, .json, .parquet)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Initial lower age bound (clamped to the data)
    #[arg(long)]
    pub min_age: Option<u32>,

    /// Initial upper age bound (clamped to the data)
    #[arg(long)]
    pub max_age: Option<u32>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// File to open at start-up: the explicit argument, else the default
    /// dataset if it is present in the working directory.
    pub fn startup_file(&self) -> Option<PathBuf> {
        self.file.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_DATA_FILE);
            default.exists().then_some(default)
        })
    }

    /// Age range requested via `--min-age` / `--max-age`, if either is set.
    pub fn requested_age_range(&self) -> Option<AgeRange> {
        if self.min_age.is_none() && self.max_age.is_none() {
            return None;
        }
        Some(AgeRange::new(
            self.min_age.unwrap_or(DEFAULT_AGE_RANGE.0),
            self.max_age.unwrap_or(DEFAULT_AGE_RANGE.1),
        ))
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
