//! Audiofolio playback session engine.
//!
//! Drives an external transport backend and mirrors its notifications into a
//! per-book session: resume position, chapter navigation, speed, sleep timer,
//! and once-per-second progress persistence.

pub mod error;
pub mod session;
pub mod sleep;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testkit;

pub use error::{PlayerError, Result};
pub use session::PlayerSession;
pub use sleep::SleepTimer;
pub use store::SessionStore;
pub use transport::{TransitionReason, Transport, TransportEvent};
