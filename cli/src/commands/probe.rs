use std::path::Path;

use colored::*;
use tracing::Instrument;

use crate::report;
use crate::{mprint, terminal::{colors, format, print, spinner}};
use hostprobe_common::{config::Config, network::target, success, warn};
use hostprobe_core::{RunSummary, perform_probes};

pub async fn probe(targets_file: &Path, cfg: &Config) -> anyhow::Result<()> {
    let list = target::load_targets(targets_file)?;

    if !list.rejected.is_empty() {
        warn!("{} line(s) skipped in {}", list.rejected.len(), targets_file.display());
    }
    if list.is_empty() {
        print::header("zero usable targets", cfg.quiet);
        if cfg.quiet == 0 {
            print::no_targets();
        }
    }

    print::header("probing hosts", cfg.quiet);

    let span = spinner::probe_span(list.len());
    let summary: RunSummary = perform_probes(list.targets, cfg, |outcome, progress| {
        if cfg.quiet < 2 {
            mprint!(&format::outcome_line(outcome));
        }
        spinner::report_probe_progress(&span, progress);
    })
    .instrument(span.clone())
    .await;
    drop(span);

    probe_ends(&summary, cfg);
    Ok(())
}

fn probe_ends(summary: &RunSummary, cfg: &Config) {
    print_summary(summary, cfg);

    if cfg.no_report {
        return;
    }
    match report::write_report(summary, &cfg.output) {
        Ok(()) => success!("Results saved to {}", cfg.output.display()),
        Err(e) => warn!("Report not written: {e:#}"),
    }
}

fn print_summary(summary: &RunSummary, cfg: &Config) {
    let total_time: ColoredString = format!("{:.2}s", summary.elapsed.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!(
        "Probing Complete: {} of {} hosts identified in {total_time}",
        summary.succeeded.to_string().bold().green(),
        summary.total
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::header("statistics", cfg.quiet);
            let details = format::stats_to_detail(summary.succeeded, summary.failed, summary.total);
            let key_width: usize = details.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            print::GLOBAL_KEY_WIDTH.set(key_width);
            for (key, value) in details {
                print::aligned_line(key, value);
            }
            print::aligned_line("Elapsed", total_time.clone());
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            mprint!();
            success!(
                "{} succeeded, {} failed, {} total",
                summary.succeeded,
                summary.failed,
                summary.total
            );
            success!("{}", output)
        }
    }
}
