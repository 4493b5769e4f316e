use chrono::{DateTime, Duration, Utc};
use indicatif::{ProgressBar, ProgressStyle};

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);

    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }

    pb
}

/// Creation times one second apart, oldest first, so the catalog lists the
/// samples newest-first in a stable order.
pub fn staggered(now: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    (0..count)
        .map(|i| now - Duration::seconds((count - i) as i64))
        .collect()
}
