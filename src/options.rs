use std::time::Duration;

/// How far ahead of the clock the code is computed, so it survives the time it takes to paste.
pub const LOOK_AHEAD: Duration = Duration::from_millis(2000);

/// How long the process keeps the clipboard selection after printing the code.
pub const HOLD: Duration = Duration::from_millis(8000);

/// Runtime knobs of the single-shot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Added to the current time before generating the code.
    pub look_ahead: Duration,
    /// Blocking wait before exit; some platforms drop the clipboard content with its owner.
    pub hold: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            look_ahead: LOOK_AHEAD,
            hold: HOLD,
        }
    }
}

impl Options {
    /// Set the `look_ahead`
    pub fn look_ahead(mut self, value: Duration) -> Self {
        self.look_ahead = value;
        self
    }

    /// Set the `hold`
    pub fn hold(mut self, value: Duration) -> Self {
        self.hold = value;
        self
    }
}
