use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Progress bar over the rows of a batch; falls back to structured logs off a terminal
pub struct BatchUI {
    bar: ProgressBar,
    interactive: bool,
    total: u64,
}

impl BatchUI {
    pub fn new(total: usize, show_progress: bool) -> Self {
        let interactive = show_progress && is_interactive();
        let total = total as u64;

        let bar = if interactive {
            let bar = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            {
                bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
            }
            bar
        } else {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Progress bar disabled, using structured logging"
            );
            ProgressBar::hidden()
        };

        Self {
            bar,
            interactive,
            total,
        }
    }

    /// Print a finished row's report without tearing the bar, then advance it
    pub fn row_done<F: FnOnce()>(&self, line: u64, title: &str, report: F) {
        self.bar.suspend(report);
        self.bar.inc(1);

        if self.interactive {
            self.bar.set_message(title.to_string());
        } else {
            tracing::info!(
                operation = "progress",
                current = self.bar.position(),
                total = self.total,
                line = line,
                title = %title,
                "Batch progress update"
            );
        }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
