use cmfeat::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(100);
const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:.bold}";
const COUNTER_TEMPLATE: &str =
    "{prefix:.bold} [{bar:36.cyan/blue}] {pos}/{len} molecules {msg} ({elapsed})";

/// Shows batch featurization as a molecule counter on stderr.
///
/// `ProgressBar` is reference counted, so the callback and the handler drive the
/// same bar. Skipped molecules are counted in the bar's message.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    skipped: Arc<AtomicUsize>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::drawing_to(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::drawing_to(ProgressDrawTarget::hidden())
    }

    fn drawing_to(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target).with_style(spinner_style());
        Self {
            bar,
            skipped: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |event| handler.handle(event))
    }

    fn handle(&self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => {
                self.bar.set_style(spinner_style());
                self.bar.set_prefix(name);
                self.bar.enable_steady_tick(SPINNER_TICK);
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.set_style(counter_style());
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::MoleculeSkipped { index, name } => {
                let skipped = self.skipped.fetch_add(1, Ordering::Relaxed) + 1;
                self.bar.set_message(format!("{} skipped", skipped));
                self.bar.println(format!("  skipped molecule #{} '{}'", index, name));
            }
            Progress::TaskFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_and_clear();
            }
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn counter_style() -> ProgressStyle {
    ProgressStyle::with_template(COUNTER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
