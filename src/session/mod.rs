pub mod claims;
pub mod storage;
pub mod store;

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::{AuthOutcome, SessionState, SessionStore};
