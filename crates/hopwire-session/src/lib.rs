//! hopwire-session - per-session state, the hash-chain/sequence validator,
//! the process-wide session registry, and the server's port manager.
//!
//! - `session`      - `Session`, `SessionId`, `ChainState`, send/recv operations
//! - `validator`     - `ValidationError`
//! - `registry`      - `SessionRegistry`
//! - `port_manager`  - `PortManager`
//! - `pending`       - `Pending`, the client's unacknowledged-send record

#![forbid(unsafe_code)]

pub mod pending;
pub mod port_manager;
pub mod registry;
pub mod session;
pub mod validator;

pub use pending::Pending;
pub use port_manager::PortManager;
pub use registry::SessionRegistry;
pub use session::{ChainState, Session, SessionId, SESSION_ID_SIZE};
pub use validator::ValidationError;
