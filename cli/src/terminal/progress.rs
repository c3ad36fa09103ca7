use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static PROGRESS: Mutex<Option<ProgressBar>> = Mutex::new(None);

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Shows a progress bar for `total` probes.
///
/// Falls back to a spinner when the total does not fit the bar's counter.
pub fn start(total: u128) -> ProgressBar {
    let pb = match u64::try_from(total) {
        Ok(len) => ProgressBar::new(len).with_style(bar_style()),
        Err(_) => ProgressBar::new_spinner().with_style(spinner_style()),
    };

    pb.set_message("Pinging");
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Ok(mut slot) = PROGRESS.lock() {
        *slot = Some(pb.clone());
    }
    pb
}

pub fn finish() {
    if let Ok(mut slot) = PROGRESS.lock() {
        if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .map(|style| style.tick_strings(TICK_STRINGS).progress_chars("█▉▊▋▌▍▎▏  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} {pos} probed [{elapsed_precise}]")
        .map(|style| style.tick_strings(TICK_STRINGS))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn active_bar() -> Option<ProgressBar> {
    PROGRESS
        .lock()
        .ok()
        .and_then(|slot| slot.clone())
        .filter(|pb| !pb.is_hidden() && !pb.is_finished())
}

/// Console writer that prints above the progress bar while one is shown.
pub struct ProgressWriter;

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active_bar() {
            Some(pb) => {
                let msg = String::from_utf8_lossy(buf);
                pb.println(msg.trim_end());
            }
            None => io::stdout().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
