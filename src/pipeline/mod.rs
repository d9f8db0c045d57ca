use crate::error::{Result, StageError};
use crate::input::InputSource;
use crate::table::{filter, load, normalize, write};
use crate::{config, fetch};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Output filename, written to the current working directory.
pub const DEFAULT_OUTPUT: &str = "filtered_production_res.xlsx";

/// Paths a run depends on; injectable so tests never touch the real CWD or
/// the executable's directory.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: config::default_path(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub output_path: PathBuf,
}

/// Drive the whole run: config, prompts, download, parse, filter, normalize,
/// write. Strictly sequential; the first failing stage aborts the run, so a
/// failed run never leaves an output file behind.
pub fn run(source: &mut dyn InputSource, opts: &RunOptions) -> Result<RunSummary> {
    // Ruleset first: with nothing to replace there is no point prompting,
    // let alone downloading.
    let rules = config::load_replacements(&opts.config_path);
    if rules.is_empty() {
        return Err(StageError::Config {
            reason: format!("ruleset from {} is empty", opts.config_path.display()),
        });
    }

    let input_start = Instant::now();
    let params = crate::input::collect_params(source)?;
    info!(elapsed = ?input_start.elapsed(), "[1] input collected");

    // Overall bar across the five remaining stages, mirroring the original
    // export tool's outer progress display.
    let overall = ProgressBar::new(5);

    let download_start = Instant::now();
    let client = fetch::client()?;
    let bytes = fetch::download(&client, &params.url)?;
    info!(elapsed = ?download_start.elapsed(), "[2] file downloaded");
    overall.inc(1);

    let read_start = Instant::now();
    let table = load::from_xlsx_bytes(&bytes)?;
    let total_rows = table.row_count();
    info!(elapsed = ?read_start.elapsed(), "[3] workbook read");
    overall.inc(1);

    let filter_start = Instant::now();
    let mut table = filter::filter_by_codes(table, &params.codes)?;
    let kept_rows = table.row_count();
    info!(elapsed = ?filter_start.elapsed(), "[4] rows filtered");
    overall.inc(1);

    let replace_start = Instant::now();
    normalize::apply_replacements(&mut table, &rules)?;
    info!(elapsed = ?replace_start.elapsed(), "[4.5] names normalized");
    overall.inc(1);

    let save_start = Instant::now();
    write::write_xlsx(&table, &opts.output_path)?;
    info!(elapsed = ?save_start.elapsed(), "[5] result saved");
    overall.inc(1);
    overall.finish_and_clear();

    Ok(RunSummary {
        total_rows,
        kept_rows,
        output_path: opts.output_path.clone(),
    })
}
