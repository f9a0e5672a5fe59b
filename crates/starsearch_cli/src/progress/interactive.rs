use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use starsearch::Progress;

/// Consolidated progress state to avoid multiple mutex locks.
#[derive(Default)]
struct ProgressState {
    /// Page walk over the starred repositories.
    stars_bar: Option<ProgressBar>,
    /// Repository pages crawled.
    crawl_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self::with_multi(MultiProgress::new())
    }

    /// A reporter that tracks state without drawing anything.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_multi(MultiProgress::with_draw_target(
            indicatif::ProgressDrawTarget::hidden(),
        ))
    }

    fn with_multi(multi: MultiProgress) -> Self {
        Self {
            multi,
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: Progress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            Progress::FetchingStars { .. } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix(format!("{:8}", "Stars"));
                pb.set_message("Fetching starred repositories...");
                pb.enable_steady_tick(Duration::from_millis(100));
                state.stars_bar = Some(pb);
            }

            Progress::FetchedPage {
                page,
                total_so_far,
                total_count,
                ..
            } => {
                if let Some(ref pb) = state.stars_bar {
                    if pb.length() != Some(total_count as u64) {
                        pb.set_length(total_count as u64);
                        pb.set_style(Self::bar_style());
                        pb.disable_steady_tick();
                    }
                    pb.set_position(total_so_far as u64);
                    pb.set_message(format!("page {page}"));
                }
            }

            Progress::FetchComplete { total } => {
                if let Some(ref pb) = state.stars_bar {
                    pb.finish_with_message(format!("✓ {total} starred repositories"));
                }
            }

            Progress::FetchFailed { page, error, .. } => {
                if let Some(ref pb) = state.stars_bar {
                    pb.abandon_with_message(format!("✗ page {page}: {error}"));
                }
            }

            Progress::CrawlingBatch {
                first,
                last,
                total,
                final_batch: _,
            } => {
                if state.crawl_bar.is_none() {
                    let pb = self.multi.add(ProgressBar::new(total as u64));
                    pb.set_style(Self::bar_style());
                    pb.set_prefix(format!("{:8}", "Crawl"));
                    state.crawl_bar = Some(pb);
                }

                if let Some(ref pb) = state.crawl_bar {
                    pb.set_position(first.saturating_sub(1) as u64);
                    pb.set_message(format!("No. [{first}-{last}/{total}]"));
                }
            }

            Progress::ItemRetry {
                name,
                attempt,
                retry_after_ms,
                ..
            } => {
                if let Some(ref pb) = state.crawl_bar {
                    pb.set_message(format!(
                        "⏳ {} retry {} in {:.1}s",
                        name,
                        attempt,
                        retry_after_ms as f64 / 1000.0
                    ));
                }
            }

            Progress::ItemFailed { name, attempts, .. } => {
                drop(state);
                self.multi
                    .println(format!("✗ {name}: network error after {attempts} attempts"))
                    .ok();
            }

            Progress::IntakeTruncated { index } => {
                drop(state);
                self.multi
                    .println(format!(
                        "⚠ entry {index} has no name or url, later entries skipped"
                    ))
                    .ok();
            }

            Progress::CrawlComplete { enriched, failed } => {
                if let Some(ref pb) = state.crawl_bar {
                    pb.set_position((enriched + failed) as u64);
                    let msg = if failed > 0 {
                        format!("✓ {enriched} crawled, {failed} network errors")
                    } else {
                        format!("✓ {enriched} crawled")
                    };
                    pb.finish_with_message(msg);
                }
            }

            Progress::Warning { message } => {
                drop(state);
                self.multi.println(format!("⚠ {}", message)).ok();
            }

            _ => {}
        }
    }

    /// Finish all progress bars.
    pub fn finish(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for pb in [&state.stars_bar, &state.crawl_bar].into_iter().flatten() {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    #[cfg(test)]
    pub fn stars_position(&self) -> Option<u64> {
        let state = self.state.lock().unwrap();
        state.stars_bar.as_ref().map(ProgressBar::position)
    }

    #[cfg(test)]
    pub fn crawl_position(&self) -> Option<u64> {
        let state = self.state.lock().unwrap();
        state.crawl_bar.as_ref().map(ProgressBar::position)
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>4}/{len:4} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
