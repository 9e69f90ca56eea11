//! Clipboard writes and the "copied" indicator
//!
//! Text is placed on the clipboard with the OSC 52 terminal escape, which
//! most modern terminals honour (including over SSH and inside tmux with
//! `set-clipboard on`).

use crate::error::{Result, ToolsError};
use base64::{Engine as _, engine::general_purpose};
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;

/// How long the copied indicator stays on
pub const COPY_RESET: Duration = Duration::from_secs(2);

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// OSC 52 escape sequence that sets the system clipboard
pub fn osc52_sequence(text: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

/// Clipboard backed by the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| ToolsError::ClipboardError(e.to_string()))
    }
}

/// Copy button state: flips to "copied" on success and reverts on its own
#[derive(Debug, Clone)]
pub struct CopyControl {
    copied_at: Option<Instant>,
    reset_after: Duration,
}

impl Default for CopyControl {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyControl {
    pub fn new() -> Self {
        Self {
            copied_at: None,
            reset_after: COPY_RESET,
        }
    }

    /// Copy `text`. On failure the error is logged and the state is left alone.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, text: &str) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                self.copied_at = Some(Instant::now());
                true
            }
            Err(e) => {
                tracing::warn!("Failed to copy text: {}", e);
                false
            }
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at
            .is_some_and(|at| at.elapsed() < self.reset_after)
    }

    pub fn icon(&self) -> &'static str {
        if self.is_copied() { "✓" } else { "⧉" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClipboard {
        written: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            if self.fail {
                return Err(ToolsError::ClipboardError("denied".into()));
            }
            self.written.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[tokio::test(start_paused = true)]
    async fn test_indicator_resets_after_two_seconds() {
        let clipboard = RecordingClipboard::default();
        let mut control = CopyControl::new();
        assert!(!control.is_copied());

        assert!(control.copy(&clipboard, "11111111-2222-3333-4444-555555555555"));
        assert!(control.is_copied());
        assert_eq!(control.icon(), "✓");

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(control.is_copied());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!control.is_copied());
        assert_eq!(control.icon(), "⧉");

        assert_eq!(clipboard.written.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_copy_leaves_state() {
        let clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let mut control = CopyControl::new();

        assert!(!control.copy(&clipboard, "text"));
        assert!(!control.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recopy_restarts_window() {
        let clipboard = RecordingClipboard::default();
        let mut control = CopyControl::new();

        control.copy(&clipboard, "a");
        tokio::time::advance(Duration::from_millis(1500)).await;
        control.copy(&clipboard, "b");
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(control.is_copied());
    }
}
