//! Service layer: session orchestration.
//!
//! [`SessionService`] owns the session store and the outbox directory,
//! applies joins, moves and disconnects one at a time, and fans out the
//! resulting notices.

pub mod session_service;

pub use session_service::{SessionPolicy, SessionService};
