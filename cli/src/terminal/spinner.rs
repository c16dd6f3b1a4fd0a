use colored::*;
use hostprobe_core::Progress;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Span carrying the progress bar for a run over `total` targets.
pub fn probe_span(total: usize) -> Span {
    let span = info_span!("probe", indicatif.pb_show = true);
    span.pb_set_style(&progress_style());
    span.pb_set_length(total as u64);
    span.pb_set_message("Waiting for hosts to answer...");
    span
}

pub fn report_probe_progress(span: &Span, progress: Progress) {
    span.pb_inc(1);
    let remaining: usize = progress.total.saturating_sub(progress.done);
    span.pb_set_message(&format!(
        "{} hosts still probing...",
        remaining.to_string().green().bold()
    ));
}
