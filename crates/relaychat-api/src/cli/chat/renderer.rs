//! Incremental terminal rendering of surface snapshots.
//!
//! The surface publishes whole snapshots; the terminal is append-only. The
//! renderer remembers how much of the transcript it has already printed and
//! turns each new snapshot into just the text that is missing.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use relaychat_core::chat::surface::SurfaceSnapshot;
use relaychat_types::chat::{ChatStatus, MessageRole};

/// Tracks what has been printed so far.
#[derive(Debug, Default)]
pub struct TranscriptRenderer {
    /// Turns fully printed (or skipped).
    settled_turns: usize,
    /// Bytes of the in-progress assistant turn already printed.
    printed_bytes: usize,
    last_status: ChatStatus,
}

impl TranscriptRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to print so the terminal catches up with `snapshot`.
    pub fn catch_up(&mut self, snapshot: &SurfaceSnapshot) -> String {
        let mut out = String::new();
        let count = snapshot.messages.len();

        while self.settled_turns < count {
            let index = self.settled_turns;
            let message = &snapshot.messages[index];

            // User turns are already on screen as typed input.
            if message.role != MessageRole::Assistant {
                self.settled_turns += 1;
                continue;
            }

            let text = message.text();
            if self.printed_bytes == 0 && !text.is_empty() {
                out.push_str(&format!("\n  {} ", style("Gemini").cyan().bold()));
            }
            if let Some(fresh) = text.get(self.printed_bytes..) {
                out.push_str(fresh);
                self.printed_bytes = text.len();
            }

            let still_streaming = index + 1 == count && snapshot.status.is_busy();
            if still_streaming {
                break;
            }
            out.push('\n');
            self.settled_turns += 1;
            self.printed_bytes = 0;
        }

        if snapshot.status != self.last_status {
            if snapshot.status == ChatStatus::Error {
                let notice = snapshot.error.as_deref().unwrap_or("Request failed.");
                out.push_str(&format!(
                    "\n  {} {}\n  {}\n",
                    style("!").red().bold(),
                    notice,
                    style("Type a message to retry, /exit to quit.").dim()
                ));
            }
            self.last_status = snapshot.status;
        }

        out
    }
}

/// "Typing..." spinner shown while a call is submitted but nothing has
/// streamed back yet.
#[derive(Default)]
pub struct TypingIndicator {
    spinner: Option<ProgressBar>,
}

impl TypingIndicator {
    pub fn update(&mut self, status: ChatStatus) {
        match (status, self.spinner.is_some()) {
            (ChatStatus::Submitted, false) => {
                let spinner = ProgressBar::new_spinner();
                let template = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}");
                if let Ok(template) = template {
                    spinner.set_style(template);
                }
                spinner.set_message("Typing...");
                spinner.enable_steady_tick(Duration::from_millis(80));
                self.spinner = Some(spinner);
            }
            (ChatStatus::Submitted, true) => {}
            (_, true) => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.finish_and_clear();
                }
            }
            (_, false) => {}
        }
    }
}
