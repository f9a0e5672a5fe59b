//! Turns library [`Progress`] events into terminal output.
//!
//! On a terminal the update run draws two bars: one for the star list walk
//! and one for page crawling. Anywhere else each event becomes a `tracing`
//! record so piped and CI output stays line-oriented.

mod interactive;
mod logging;

use std::sync::Arc;

use console::Term;
use starsearch::{Progress, ProgressCallback};

pub use interactive::InteractiveReporter;
pub use logging::LoggingReporter;

pub enum ProgressReporter {
    Interactive(InteractiveReporter),
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Bars when stdout is a terminal, log lines otherwise.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    pub fn handle(&self, event: Progress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Shareable callback for `fetch_all_starred` and `enrich_all`.
    ///
    /// The callback keeps the reporter alive, so it can be handed to spawned
    /// crawl tasks.
    pub fn as_callback(self: &Arc<Self>) -> Arc<ProgressCallback> {
        let reporter = Arc::clone(self);
        Arc::new(Box::new(move |event| reporter.handle(event)))
    }

    /// Leave the bars on screen in their final state. No-op when logging.
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
