//! Test doubles for the transport and store seams

use crate::error::Result;
use crate::store::SessionStore;
use crate::transport::{TransitionReason, Transport, TransportEvent};
use async_trait::async_trait;
use audiofolio_core::{BookId, Duration, Timestamp};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// In-memory transport that records commands and lets tests inject events
#[derive(Default)]
pub struct MockTransport {
    playing: AtomicBool,
    speed: Mutex<f32>,
    position: Mutex<Duration>,
    duration: Mutex<Duration>,
    index: AtomicUsize,
    playlist_len: AtomicUsize,
    pause_count: AtomicUsize,
    play_count: AtomicUsize,
    released: AtomicBool,
    events: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            speed: Mutex::new(1.0),
            ..Default::default()
        }
    }

    pub fn pause_count(&self) -> usize {
        self.pause_count.load(Ordering::SeqCst)
    }

    pub fn play_count(&self) -> usize {
        self.play_count.load(Ordering::SeqCst)
    }

    pub fn current_index(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn set_position(&self, position: Duration) {
        *self.position.lock().unwrap() = position;
    }

    pub fn set_duration(&self, duration: Duration) {
        *self.duration.lock().unwrap() = duration;
    }

    /// Simulates the end-of-item advance the backend performs on its own
    pub fn finish_current_item(&self) {
        if self.index.load(Ordering::SeqCst) + 1 < self.playlist_len.load(Ordering::SeqCst) {
            self.index.fetch_add(1, Ordering::SeqCst);
            self.emit(TransportEvent::ItemTransition(TransitionReason::Auto));
        } else {
            self.playing.store(false, Ordering::SeqCst);
            self.emit(TransportEvent::PlaybackEnded);
        }
    }

    fn emit(&self, event: TransportEvent) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }
}

impl Transport for MockTransport {
    fn load(
        &self,
        playlist: Vec<PathBuf>,
        start_index: usize,
        start_position: Duration,
    ) -> Result<()> {
        self.playlist_len.store(playlist.len(), Ordering::SeqCst);
        self.index.store(start_index, Ordering::SeqCst);
        *self.position.lock().unwrap() = start_position;
        Ok(())
    }

    fn play(&self) {
        self.play_count.fetch_add(1, Ordering::SeqCst);
        self.playing.store(true, Ordering::SeqCst);
        self.emit(TransportEvent::PlayingChanged(true));
    }

    fn pause(&self) {
        self.pause_count.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
        self.emit(TransportEvent::PlayingChanged(false));
    }

    fn seek(&self, position: Duration) {
        *self.position.lock().unwrap() = position;
    }

    fn next(&self) {
        if self.has_next() {
            self.index.fetch_add(1, Ordering::SeqCst);
            *self.position.lock().unwrap() = Duration::ZERO;
            self.emit(TransportEvent::ItemTransition(TransitionReason::User));
        }
    }

    fn previous(&self) {
        if self.has_previous() {
            self.index.fetch_sub(1, Ordering::SeqCst);
            *self.position.lock().unwrap() = Duration::ZERO;
            self.emit(TransportEvent::ItemTransition(TransitionReason::User));
        }
    }

    fn jump_to(&self, index: usize) {
        if index < self.playlist_len.load(Ordering::SeqCst) {
            self.index.store(index, Ordering::SeqCst);
            *self.position.lock().unwrap() = Duration::ZERO;
            self.emit(TransportEvent::ItemTransition(TransitionReason::User));
        }
    }

    fn set_speed(&self, speed: f32) {
        *self.speed.lock().unwrap() = speed;
        self.emit(TransportEvent::SpeedChanged(speed));
    }

    fn position(&self) -> Duration {
        *self.position.lock().unwrap()
    }

    fn duration(&self) -> Duration {
        *self.duration.lock().unwrap()
    }

    fn has_next(&self) -> bool {
        self.index.load(Ordering::SeqCst) + 1 < self.playlist_len.load(Ordering::SeqCst)
    }

    fn has_previous(&self) -> bool {
        self.index.load(Ordering::SeqCst) > 0
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<TransportEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.events.lock().unwrap() = Some(tx);
        rx
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// In-memory store that records every checkpoint
#[derive(Default)]
pub struct MockStore {
    pub progress: Mutex<Vec<(BookId, u32, Duration)>>,
    pub speeds: Mutex<Vec<(BookId, f32)>>,
    pub sleep_timers: Mutex<Vec<(BookId, Option<Timestamp>)>>,
    pub finished: Mutex<Vec<BookId>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_progress(&self) -> Option<(BookId, u32, Duration)> {
        self.progress.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl SessionStore for MockStore {
    async fn save_progress(
        &self,
        book_id: BookId,
        chapter_index: u32,
        position: Duration,
    ) -> Result<()> {
        self.progress
            .lock()
            .unwrap()
            .push((book_id, chapter_index, position));
        Ok(())
    }

    async fn save_speed(&self, book_id: BookId, speed: f32) -> Result<()> {
        self.speeds.lock().unwrap().push((book_id, speed));
        Ok(())
    }

    async fn save_sleep_timer(&self, book_id: BookId, end: Option<Timestamp>) -> Result<()> {
        self.sleep_timers.lock().unwrap().push((book_id, end));
        Ok(())
    }

    async fn mark_finished(&self, book_id: BookId) -> Result<()> {
        self.finished.lock().unwrap().push(book_id);
        Ok(())
    }
}
