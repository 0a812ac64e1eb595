use crate::EnhanceError;

/// One submitted idea, tagged with the sequence number the session issued for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementRequest {
    pub seq: u64,
    pub raw_message: String,
}

/// Outcome of one enhancement call. Consumed once by [`crate::SessionState::settle`].
pub type EnhancementResult = Result<String, EnhanceError>;
