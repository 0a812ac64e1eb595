use std::time::{Duration, Instant};

use ratatui::prelude::*;

/// How long the "Copied!" acknowledgment stays up.
pub const COPIED_FOR: Duration = Duration::from_secs(2);

/// Copy control with its own transient acknowledgment state.
/// Independent of the session: a new request does not reset it.
#[derive(Debug, Clone, Default)]
pub struct CopyButton {
    copied_at: Option<Instant>,
}

impl CopyButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the acknowledgment. While it is showing the control is
    /// disabled, so a repeat mark keeps the original timer.
    pub fn mark_copied(&mut self, now: Instant) {
        if self.copied_at.is_none() {
            self.copied_at = Some(now);
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at.is_some()
    }

    /// Drop the acknowledgment once it has been shown for [`COPIED_FOR`].
    pub fn expire(&mut self, now: Instant) {
        if let Some(at) = self.copied_at {
            if now.saturating_duration_since(at) >= COPIED_FOR {
                self.copied_at = None;
            }
        }
    }

    pub fn label(&self) -> Line<'static> {
        if self.is_copied() {
            Line::from(Span::styled(
                " ✓ Copied! ",
                Style::default().fg(Color::Green).bold(),
            ))
        } else {
            Line::from(Span::styled(
                " [c] Copy ",
                Style::default().fg(Color::Cyan),
            ))
        }
    }
}
