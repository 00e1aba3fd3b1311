use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use linterhub_integration::StatusReporter;
use once_cell::sync::Lazy;

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

/// One spinner per busy status id.
#[derive(Default)]
pub struct SpinnerStatus {
    bars:    MultiProgress,
    running: Mutex<HashMap<String, ProgressBar>>,
}

impl SpinnerStatus {
    fn spinner(&self, id: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let pb = match SPINNER_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix(id.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        self.bars.add(pb)
    }

    #[cfg(test)]
    fn running(&self) -> usize { self.running.lock().unwrap_or_else(PoisonError::into_inner).len() }
}

impl StatusReporter for SpinnerStatus {
    fn update(&self, id: &str, busy: bool, text: Option<&str>) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if busy {
            let pb = running.entry(id.to_string()).or_insert_with(|| self.spinner(id));
            if let Some(text) = text {
                pb.set_message(text.to_string());
            }
        } else if let Some(pb) = running.remove(id) {
            pb.finish_and_clear();
        }
    }
}
