use gispfilter::input::Stdin;
use gispfilter::pipeline::{self, RunOptions};
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) run the pipeline ─────────────────────────────────────────
    // Any stage failure has already been tagged; log it and exit cleanly.
    let total_start = Instant::now();
    let mut stdin = Stdin;
    match pipeline::run(&mut stdin, &RunOptions::default()) {
        Ok(summary) => info!(
            kept = summary.kept_rows,
            total = summary.total_rows,
            elapsed = ?total_start.elapsed(),
            "done; wrote {}",
            summary.output_path.display()
        ),
        Err(err) => error!("run aborted: {err}"),
    }
}
