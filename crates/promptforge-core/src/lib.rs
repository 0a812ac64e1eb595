pub mod enhancement;
pub mod error;
pub mod session;

pub use enhancement::{EnhancementRequest, EnhancementResult};
pub use error::EnhanceError;
pub use session::{Phase, SessionState};
