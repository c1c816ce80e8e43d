pub mod config;
pub mod error;
pub mod file;
pub mod host;
pub mod normalize;
pub mod pipe;
pub mod push;
pub mod schema_validation;
pub mod selector;
pub mod session;

pub use config::PushConfig;
pub use error::{PushError, PushResult};
pub use file::FileObject;
pub use host::{Collection, Host, Template, ViewStore, Views};
pub use normalize::{Normalize, NormalizeError, VinylNormalizer};
pub use push::{FileStream, PushStream, PushWriter, Pusher, StreamState};
pub use selector::Selector;
pub use session::{InMemorySession, LoadLog, SessionError, SessionStore};
