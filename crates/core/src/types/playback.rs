//! Playback session state and speed

use crate::types::common::Duration;
use serde::{Deserialize, Serialize};

/// Validated playback speed multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSpeed(f32);

impl PlaybackSpeed {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 3.0;

    /// Creates a speed, rejecting values outside `[MIN, MAX]`
    pub fn new(value: f32) -> Result<Self, String> {
        if !(Self::MIN..=Self::MAX).contains(&value) || !value.is_finite() {
            return Err(format!(
                "Playback speed must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ));
        }
        Ok(Self(value))
    }

    /// Creates a speed, clamping out-of-range values instead of rejecting them
    pub fn clamped(value: f32) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

impl std::fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

/// Snapshot of the active playback session.
///
/// Owned by the session engine for the lifetime of one session and mirrored
/// from transport notifications rather than set optimistically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub is_playing: bool,
    pub current_chapter_index: usize,
    /// Transport position within the current chapter
    pub position: Duration,
    /// Duration of the current chapter as reported by the transport
    pub duration: Duration,
    pub playback_speed: f32,
    pub total_chapters: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_chapter_index: 0,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            playback_speed: 1.0,
            total_chapters: 0,
        }
    }
}
