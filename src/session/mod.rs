// Session management module
// Issues session identifiers, stores sessions in memory and correlates requests via a cookie

pub mod cookie;
pub mod error;
pub mod id;
pub mod manager;
pub mod storage;
pub mod types;

pub use cookie::{SessionCookie, read_cookie};
pub use error::SessionError;
pub use id::{SESSION_ID_BYTES, SESSION_ID_LEN, generate_session_id};
pub use manager::{SessionManager, SessionManagerState};
pub use storage::{MemorySessionStorage, SessionStorage};
pub use types::{RequestContext, Session, SessionConfig, SessionInfo};
