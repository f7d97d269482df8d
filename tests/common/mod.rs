//! Integration test common infrastructure.
//!
//! Provides a session wired to an in-memory outbound channel, fed with raw
//! server lines.

pub mod session;

#[allow(unused_imports)]
pub use session::TestSession;
