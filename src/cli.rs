use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    dates::{DateRange, generate_dates},
    error::FormatError,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every day from START to CUTOFF, both included
    Dates {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Show which daily output files are already present
    Plan {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Reconcile a citation year against the date its file was retrieved
    Timestamp {
        year: String,
        #[arg(value_name = "FILE_DATE")]
        file_date: String,
    },
    /// Print the info:doi: URI for a DOI
    Uri { doi: String },
    /// Convert one retrieved citations file
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        /// Skip identifier resolution
        #[arg(long)]
        offline: bool,
    },
    /// Convert every retrieved citations file between START and CUTOFF
    Run {
        #[command(flatten)]
        range: RangeArgs,
        /// Directory holding the retrieved CrossrefCitations_<date>.csv files
        #[arg(long, default_value = ".")]
        in_dir: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        /// Skip identifier resolution
        #[arg(long)]
        offline: bool,
        /// Regenerate outputs that already hold data
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// First day, YYYY-MM-DD
    pub start: String,
    /// Last day, YYYY-MM-DD
    pub cutoff: String,
}

impl RangeArgs {
    pub fn range(&self) -> Result<DateRange, FormatError> {
        generate_dates(&self.start, &self.cutoff)
    }
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Directory for converted files, created when missing
    #[arg(long, default_value = "output")]
    pub out_dir: PathBuf,
    #[arg(long, default_value = "csv")]
    pub extension: String,
}
