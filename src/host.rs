//! Side effects of the binary: clock, clipboard, blocking wait and console output.

use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use arboard::Clipboard;

use crate::TotpError;

pub trait Host {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
    /// Replace the clipboard content with `text`.
    fn set_clipboard_text(&mut self, text: &str) -> Result<(), TotpError>;
    /// Block the calling thread for `duration`.
    fn sleep(&mut self, duration: Duration);
    /// Print one line to standard output.
    fn write_line(&mut self, line: &str);
}

/// The real operating system.
///
/// The clipboard handle lives as long as the host, so the selection stays owned while
/// the process waits.
#[derive(Default)]
pub struct SystemHost {
    clipboard: Option<Clipboard>,
}

impl SystemHost {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Milliseconds between the Unix epoch and `time`, saturating at both ends.
pub fn epoch_millis(time: SystemTime) -> u64 {
    // a clock set before 1970 reads as the epoch
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl Host for SystemHost {
    fn now_millis(&self) -> u64 {
        epoch_millis(SystemTime::now())
    }

    fn set_clipboard_text(&mut self, text: &str) -> Result<(), TotpError> {
        let clipboard = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard,
            None => self.clipboard.insert(
                Clipboard::new().map_err(|e| TotpError::Clipboard(e.to_string()))?,
            ),
        };
        clipboard
            .set_text(text)
            .map_err(|e| TotpError::Clipboard(e.to_string()))
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn write_line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            log::warn!("could not write to stdout: {}", e);
        }
    }
}
