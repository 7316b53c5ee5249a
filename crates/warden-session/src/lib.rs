//! # warden-session
//!
//! Per-session state for the warden gateway: the lifecycle state
//! machine (`INIT -> ACTIVE -> CLOSED`), the write-once plan-hash
//! binding, and the append-only per-concern audit trail.
//!
//! Every hook invocation is a fresh process; this crate is the only
//! shared mutable state between them (spec §5). Writes are atomic per
//! file (write-temp, rename); reads return defaults when the backing
//! file is absent.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use warden_session::{SessionStore, Lifecycle};
//!
//! let store = SessionStore::new("/tmp/warden", "default");
//! assert_eq!(store.get_state(), Lifecycle::Init);
//! store.set_state(Lifecycle::Active).unwrap();
//! ```

pub mod error;
pub mod lifecycle;
pub mod planhash;
pub mod store;

pub use error::SessionError;
pub use lifecycle::Lifecycle;
pub use planhash::compute_plan_hash;
pub use store::{PlanHashOutcome, SessionStore};
