use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "   {prefix} [{bar:30}] {pos}/{len} ({percent}%)";

/// Fixed-width bar drawn on stderr, e.g. `Pages [######----] 3/10 (30%)`
pub fn progress_bar(total: u64, prefix: &'static str) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#-");

    let bar = ProgressBar::new(total);
    bar.set_style(style);
    bar.set_prefix(prefix);
    bar
}
