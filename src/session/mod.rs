pub mod load_log;
pub mod storage;
pub mod traits;

pub use load_log::{LoadLog, DEFAULT_LOAD_LOG_KEY};
pub use storage::InMemorySession;
pub use traits::{SessionError, SessionResult, SessionStore};
