use std::fmt;

use crate::{EnhanceError, EnhancementRequest, EnhancementResult};

/// Where the submit action currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Success => "success",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single mutable record the view renders.
///
/// Every request gets a sequence number from [`SessionState::begin_submit`].
/// Only the result carrying the latest number is applied; anything older
/// is dropped by [`SessionState::settle`].
#[derive(Debug, Clone)]
pub struct SessionState {
    raw_input: String,
    enhanced_output: String,
    error_message: Option<String>,
    phase: Phase,
    latest_seq: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            raw_input: String::new(),
            enhanced_output: String::new(),
            error_message: None,
            phase: Phase::Idle,
            latest_seq: 0,
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn enhanced_output(&self) -> &str {
        &self.enhanced_output
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn has_output(&self) -> bool {
        !self.enhanced_output.is_empty()
    }

    // -- Input editing --

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.raw_input = input.into();
    }

    pub fn insert_char(&mut self, c: char) {
        self.raw_input.push(c);
    }

    pub fn backspace(&mut self) {
        self.raw_input.pop();
    }

    // -- Submit lifecycle --

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.raw_input.trim().is_empty()
    }

    /// Start a new request cycle.
    ///
    /// Returns `None` while a request is in flight, and for blank input
    /// (which drops any previous output, returns to `Idle` and stores the
    /// empty-input message). Otherwise clears the
    /// previous output and error, enters `Loading`, and hands back the
    /// request to send.
    pub fn begin_submit(&mut self) -> Option<EnhancementRequest> {
        if self.is_loading() {
            return None;
        }
        if self.raw_input.trim().is_empty() {
            self.enhanced_output.clear();
            self.error_message = Some(EnhanceError::EmptyInput.to_string());
            self.phase = Phase::Idle;
            return None;
        }

        self.latest_seq += 1;
        self.enhanced_output.clear();
        self.error_message = None;
        self.phase = Phase::Loading;

        Some(EnhancementRequest {
            seq: self.latest_seq,
            raw_message: self.raw_input.clone(),
        })
    }

    /// Apply the outcome of request `seq`. Returns `false` if it was stale
    /// and left the state untouched.
    pub fn settle(&mut self, seq: u64, result: EnhancementResult) -> bool {
        if seq != self.latest_seq || !self.is_loading() {
            return false;
        }

        match result {
            Ok(text) => {
                self.enhanced_output = text;
                self.error_message = None;
                self.phase = Phase::Success;
            }
            Err(e) => {
                self.enhanced_output.clear();
                self.error_message = Some(e.to_string());
                self.phase = Phase::Failed;
            }
        }
        true
    }
}
