//! The transport seam.
//!
//! The session engine never drives audio hardware itself. It issues commands
//! to a [`Transport`] and mirrors the transport's notifications back into its
//! own state, so the session stays correct even when the transport changes
//! items on its own (end-of-chapter advance).

use crate::error::Result;
use audiofolio_core::Duration;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Why the transport moved to a different playlist item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    /// The previous item finished and the transport advanced on its own
    Auto,
    /// A caller asked for the move (next/previous/jump)
    User,
}

/// Notification pushed by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    PlayingChanged(bool),
    SpeedChanged(f32),
    ItemTransition(TransitionReason),
    /// The final playlist item finished
    PlaybackEnded,
}

/// Commands and observations for an external playback backend.
///
/// Implementations own the playlist after [`Transport::load`]; queries like
/// [`Transport::position`] reflect the item the transport is currently on,
/// which is not necessarily the item the last command referred to.
pub trait Transport: Send + Sync {
    /// Replaces the playlist and seeks to the given start point without
    /// starting playback.
    fn load(&self, playlist: Vec<PathBuf>, start_index: usize, start_position: Duration)
        -> Result<()>;

    fn play(&self);
    fn pause(&self);

    /// Seeks within the current item
    fn seek(&self, position: Duration);

    fn next(&self);
    fn previous(&self);
    fn jump_to(&self, index: usize);

    fn set_speed(&self, speed: f32);

    /// Position within the current item
    fn position(&self) -> Duration;

    /// Duration of the current item
    fn duration(&self) -> Duration;

    fn has_next(&self) -> bool;
    fn has_previous(&self) -> bool;

    /// Returns a stream of transport notifications.
    ///
    /// Called once per session; events delivered before subscription are lost.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<TransportEvent>;

    /// Stops playback and frees backend resources
    fn release(&self);
}
