//! The playback session engine.
//!
//! One session per open book. The session issues commands to the transport
//! and keeps a [`SessionState`] snapshot that mirrors the transport's
//! notifications. Two background tasks run for the session's lifetime: the
//! event mirror and a once-per-second progress checkpoint.
//!
//! Index bookkeeping: only automatic end-of-item transitions move the
//! session's chapter index from the event stream. Caller-driven navigation
//! updates the index at the call site, so a `User` transition event is
//! informational only.

use crate::error::{PlayerError, Result};
use crate::sleep::SleepTimer;
use crate::store::SessionStore;
use crate::transport::{TransitionReason, Transport, TransportEvent};
use audiofolio_core::{Book, BookId, Chapter, Duration, PlaybackSpeed, SessionState, Timestamp};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How often playback progress is checkpointed to the store
const CHECKPOINT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Active playback session for one book
pub struct PlayerSession {
    book_id: BookId,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    state: Arc<watch::Sender<SessionState>>,
    sleep: SleepTimer,
    mirror_task: JoinHandle<()>,
    progress_task: JoinHandle<()>,
}

impl PlayerSession {
    /// Opens a session: loads the book's chapters into the transport at the
    /// persisted position and starts the mirror and checkpoint tasks.
    ///
    /// Playback does not start until [`PlayerSession::play`]. A persisted
    /// chapter index beyond the current chapter list falls back to the
    /// beginning of the book.
    pub fn start(
        book: &Book,
        chapters: &[Chapter],
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        if chapters.is_empty() {
            return Err(PlayerError::NotLoaded);
        }

        let total_chapters = chapters.len();
        let (start_index, start_position) = if (book.current_chapter_index as usize) < total_chapters
        {
            (book.current_chapter_index as usize, book.current_position)
        } else {
            warn!(
                "Persisted chapter index {} out of range for '{}', starting over",
                book.current_chapter_index, book.title
            );
            (0, Duration::ZERO)
        };

        let playlist = chapters.iter().map(|c| c.file_path.clone()).collect();
        transport.load(playlist, start_index, start_position)?;

        let speed = PlaybackSpeed::clamped(book.playback_speed);
        if speed != PlaybackSpeed::default() {
            transport.set_speed(speed.value());
        }

        let (state_tx, _) = watch::channel(SessionState {
            is_playing: false,
            current_chapter_index: start_index,
            position: start_position,
            duration: transport.duration(),
            playback_speed: speed.value(),
            total_chapters,
        });
        let state = Arc::new(state_tx);

        let events = transport.subscribe();
        let mirror_task = tokio::spawn(mirror_events(
            events,
            Arc::clone(&state),
            Arc::clone(&store),
            book.id,
        ));

        let progress_task = tokio::spawn(checkpoint_progress(
            Arc::clone(&transport),
            Arc::clone(&state),
            Arc::clone(&store),
            book.id,
        ));

        let session = Self {
            book_id: book.id,
            transport,
            store,
            state,
            sleep: SleepTimer::new(),
            mirror_task,
            progress_task,
        };

        // A sleep timer that survived an app restart keeps running
        if let Some(end) = book.sleep_timer_end {
            let left = end.as_millis().saturating_sub(Timestamp::now().as_millis());
            if left > 0 {
                session
                    .sleep
                    .start(Duration::from_millis(left as u64), Arc::clone(&session.transport));
            }
        }

        info!(
            "Session opened for '{}' at chapter {}, {}",
            book.title,
            start_index,
            start_position.as_hms()
        );

        Ok(session)
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch state changes as they are mirrored in
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn play(&self) {
        self.transport.play();
    }

    pub fn pause(&self) {
        self.transport.pause();
    }

    /// Seeks within the current chapter and checkpoints immediately
    pub async fn seek(&self, position: Duration) -> Result<()> {
        self.transport.seek(position);
        self.state.send_modify(|s| s.position = position);
        self.checkpoint().await
    }

    /// Moves to the next chapter. Does nothing past the last chapter.
    pub async fn next_chapter(&self) -> Result<()> {
        let index = self.state.borrow().current_chapter_index;
        let total = self.state.borrow().total_chapters;
        if index + 1 >= total {
            return Ok(());
        }
        self.transport.next();
        self.move_to(index + 1).await
    }

    /// Moves to the previous chapter. Does nothing before the first chapter.
    pub async fn previous_chapter(&self) -> Result<()> {
        let index = self.state.borrow().current_chapter_index;
        if index == 0 {
            return Ok(());
        }
        self.transport.previous();
        self.move_to(index - 1).await
    }

    /// Jumps to an arbitrary chapter
    pub async fn jump_to_chapter(&self, index: usize) -> Result<()> {
        let total = self.state.borrow().total_chapters;
        if index >= total {
            return Err(PlayerError::InvalidChapter { index, total });
        }
        self.transport.jump_to(index);
        self.move_to(index).await
    }

    async fn move_to(&self, index: usize) -> Result<()> {
        self.state.send_modify(|s| {
            s.current_chapter_index = index;
            s.position = Duration::ZERO;
        });
        self.store
            .save_progress(self.book_id, index as u32, Duration::ZERO)
            .await
    }

    /// Sets and persists the playback speed.
    ///
    /// The in-session speed updates when the transport confirms the change.
    pub async fn set_speed(&self, speed: f32) -> Result<()> {
        let validated = PlaybackSpeed::new(speed).map_err(PlayerError::InvalidSpeed)?;
        self.transport.set_speed(validated.value());
        self.store.save_speed(self.book_id, validated.value()).await
    }

    /// Starts the sleep timer and persists its wall-clock end
    pub async fn start_sleep_timer(&self, duration: Duration) -> Result<()> {
        let end = Timestamp::now() + duration;
        self.store
            .save_sleep_timer(self.book_id, Some(end))
            .await?;
        self.sleep.start(duration, Arc::clone(&self.transport));
        info!("Sleep timer set for {}", duration.as_hms());
        Ok(())
    }

    /// Cancels the sleep timer and clears the persisted end
    pub async fn cancel_sleep_timer(&self) -> Result<()> {
        self.sleep.cancel();
        self.store.save_sleep_timer(self.book_id, None).await
    }

    /// Remaining sleep time, or None when no timer is running
    pub fn sleep_remaining(&self) -> Option<Duration> {
        self.sleep.remaining()
    }

    pub fn sleep_timer_active(&self) -> bool {
        self.sleep.is_active()
    }

    /// Persists the current position immediately
    pub async fn checkpoint(&self) -> Result<()> {
        let index = self.state.borrow().current_chapter_index;
        let position = self.transport.position();
        self.store
            .save_progress(self.book_id, index as u32, position)
            .await
    }

    /// Closes the session: final checkpoint, then tears down the background
    /// tasks and the transport.
    pub async fn release(self) -> Result<()> {
        let result = self.checkpoint().await;
        self.mirror_task.abort();
        self.progress_task.abort();
        self.sleep.cancel();
        self.transport.release();
        debug!("Session released");
        result
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.mirror_task.abort();
        self.progress_task.abort();
    }
}

/// Mirrors transport notifications into the session state
async fn mirror_events(
    mut events: tokio::sync::mpsc::UnboundedReceiver<TransportEvent>,
    state: Arc<watch::Sender<SessionState>>,
    store: Arc<dyn SessionStore>,
    book_id: BookId,
) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::PlayingChanged(playing) => {
                state.send_modify(|s| s.is_playing = playing);
            }
            TransportEvent::SpeedChanged(speed) => {
                state.send_modify(|s| s.playback_speed = speed);
            }
            TransportEvent::ItemTransition(TransitionReason::Auto) => {
                let mut advanced = None;
                state.send_modify(|s| {
                    if s.current_chapter_index + 1 < s.total_chapters {
                        s.current_chapter_index += 1;
                        s.position = Duration::ZERO;
                        advanced = Some(s.current_chapter_index);
                    }
                });
                if let Some(index) = advanced {
                    if let Err(e) = store.save_progress(book_id, index as u32, Duration::ZERO).await
                    {
                        warn!("Failed to persist chapter advance: {}", e);
                    }
                }
            }
            // Caller-driven moves already updated the index at the call site
            TransportEvent::ItemTransition(TransitionReason::User) => {}
            TransportEvent::PlaybackEnded => {
                state.send_modify(|s| s.is_playing = false);
                if let Err(e) = store.mark_finished(book_id).await {
                    warn!("Failed to mark book finished: {}", e);
                }
            }
        }
    }
}

/// Persists position once per second while playback is running
async fn checkpoint_progress(
    transport: Arc<dyn Transport>,
    state: Arc<watch::Sender<SessionState>>,
    store: Arc<dyn SessionStore>,
    book_id: BookId,
) {
    let mut ticker = tokio::time::interval(CHECKPOINT_INTERVAL);
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if !state.borrow().is_playing {
            continue;
        }

        let position = transport.position();
        let duration = transport.duration();
        let index = {
            let mut index = 0;
            state.send_modify(|s| {
                s.position = position;
                s.duration = duration;
                index = s.current_chapter_index;
            });
            index
        };

        if let Err(e) = store.save_progress(book_id, index as u32, position).await {
            warn!("Progress checkpoint failed: {}", e);
        }
    }
}
