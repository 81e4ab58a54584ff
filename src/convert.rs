use std::{
    fs,
    ops::AddAssign,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::{
    citation::{Citation, CitationRow},
    dates::{DATE_FORMAT, DateRange, parse_date},
    files::{FileState, date_from_path, exists_and_not_empty, output_path},
    identifier::info_uri,
    timestamp::reconcile,
    translator::{Translator, resolve_or_empty},
};

/// Retrieved citation dumps are always CSV, whatever the output extension.
pub const INPUT_EXTENSION: &str = "csv";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Rows written
    pub rows: usize,
    /// Citations that resolved to at least one identifier
    pub resolved: usize,
    pub unresolved: usize,
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Self) {
        self.rows += other.rows;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
    }
}

/// The output a day maps to and whether it already exists with content.
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub output: PathBuf,
    pub state: FileState,
}

impl DayPlan {
    pub fn is_cached(&self) -> bool {
        self.state.is_usable()
    }
}

pub fn plan<'a>(
    range: DateRange,
    out_dir: &'a Path,
    extension: &'a str,
) -> impl Iterator<Item = DayPlan> + 'a {
    range.into_iter().map(move |date| {
        let output = output_path(out_dir, &date.format(DATE_FORMAT).to_string(), extension);
        let state = FileState::probe(&output);
        DayPlan {
            date,
            output,
            state,
        }
    })
}

/// Convert one retrieved citation file into an output file in `out_dir`.
///
/// The retrieval date comes from `input`'s name and is reconciled against each citation's year.
/// Without a translator every citation yields one row with an empty `work_uri`; with one, each
/// translation yields a row (canonical ones first) and citations that resolve to nothing are
/// only counted.
pub fn convert_file(
    input: &Path,
    out_dir: &Path,
    extension: &str,
    translator: Option<&dyn Translator>,
) -> anyhow::Result<(PathBuf, Summary)> {
    let file_date = date_from_path(input)?;
    parse_date(&file_date)?;
    let output = output_path(out_dir, &file_date, extension);

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
    if overwrites(input, out_dir, &output)? {
        bail!(
            "output {} would overwrite its input; choose another --out-dir or --extension",
            output.display()
        );
    }

    let mut part = output.clone().into_os_string();
    part.push(".part");
    let part = PathBuf::from(part);

    let summary = match write_rows(input, &part, &file_date, translator) {
        Ok(summary) => summary,
        Err(e) => {
            let _ = fs::remove_file(&part);
            return Err(e);
        }
    };
    fs::rename(&part, &output)
        .with_context(|| format!("failed to move output into place: {}", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = summary.rows,
        unresolved = summary.unresolved,
        "converted citations"
    );
    Ok((output, summary))
}

fn overwrites(input: &Path, out_dir: &Path, output: &Path) -> anyhow::Result<bool> {
    let input = fs::canonicalize(input)
        .with_context(|| format!("failed to open citations file: {}", input.display()))?;
    let out_dir = fs::canonicalize(out_dir)?;
    Ok(output
        .file_name()
        .is_some_and(|name| out_dir.join(name) == input))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn write_rows(
    input: &Path,
    part: &Path,
    file_date: &str,
    translator: Option<&dyn Translator>,
) -> anyhow::Result<Summary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(input)
        .with_context(|| format!("failed to open citations file: {}", input.display()))?;
    // Header written by hand so that a day without citations still gets a non-empty file.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(part)
        .with_context(|| format!("failed to create output file: {}", part.display()))?;
    writer.write_record(["timestamp", "doi", "uri", "work_uri"])?;

    let mut summary = Summary::default();
    for record in reader.deserialize::<Citation>() {
        let citation =
            record.with_context(|| format!("malformed citation in {}", input.display()))?;
        let timestamp = reconcile(&citation.year, file_date)?;
        let uri = info_uri(&citation.doi);

        let work_uris: Vec<String> = match translator {
            None => vec![String::new()],
            Some(t) => {
                let mut found = resolve_or_empty(t, &uri, &timestamp)?;
                found.sort_by_key(|work| !work.canonical.unwrap_or(false));
                if found.is_empty() {
                    summary.unresolved += 1;
                } else {
                    summary.resolved += 1;
                }
                found.into_iter().map(|work| work.uri).collect()
            }
        };

        for work_uri in work_uris {
            writer.serialize(CitationRow {
                timestamp: timestamp.clone(),
                doi: citation.doi.clone(),
                uri: uri.clone(),
                work_uri,
            })?;
            summary.rows += 1;
        }
    }
    writer.flush()?;
    Ok(summary)
}

pub struct RunOptions<'a> {
    pub in_dir: &'a Path,
    pub out_dir: &'a Path,
    pub extension: &'a str,
    /// Regenerate outputs that already hold data
    pub force: bool,
}

/// Process every day in `range`, skipping days that are already done or have nothing to read.
pub fn run(
    range: DateRange,
    opts: &RunOptions<'_>,
    translator: Option<&dyn Translator>,
) -> anyhow::Result<Summary> {
    if opts.extension == INPUT_EXTENSION && same_dir(opts.in_dir, opts.out_dir) {
        bail!(
            "outputs in {} would overwrite the retrieved files; choose another --out-dir or --extension",
            opts.out_dir.display()
        );
    }
    if range.is_empty() {
        warn!("start date is after the cutoff; nothing to do");
    }
    let progress = ProgressBar::new(range.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{spinner} [{bar:30}] {pos}/{len} {msg}",
    )?);

    let mut total = Summary::default();
    for day in plan(range, opts.out_dir, opts.extension) {
        let date = day.date.format(DATE_FORMAT).to_string();
        progress.set_message(date.clone());

        if day.is_cached() && !opts.force {
            debug!(output = %day.output.display(), "output already present; skipping");
            progress.inc(1);
            continue;
        }

        let input = output_path(opts.in_dir, &date, INPUT_EXTENSION);
        if exists_and_not_empty(&input) {
            let (_, summary) = convert_file(&input, opts.out_dir, opts.extension, translator)?;
            total += summary;
        } else {
            warn!(input = %input.display(), "no citations retrieved for {date}");
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(total)
}
