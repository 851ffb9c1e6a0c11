//! Playback controller
//!
//! [`Playback`] holds one frame list and a cursor into it. Seeking is pure
//! index arithmetic: a frame carries everything needed to render it, so no
//! engine is ever re-run and any index can be visited in any order.
//!
//! Auto-play arms one timer at a time through a [`Scheduler`]. Loading a new
//! list or pausing cancels the armed timer, and a timer that fires after being
//! cancelled is recognised by its id and ignored, so frames from two lists are
//! never interleaved.

pub mod scheduler;

pub use scheduler::{ManualScheduler, PollScheduler, Scheduler, TimerId};

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Default auto-play interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("no frames loaded")]
    Empty,

    #[error("frame {index} is out of range for {len} frames")]
    SeekOutOfRange { index: usize, len: usize },

    #[error("already at the first frame")]
    AtStart,

    #[error("already at the last frame")]
    AtEnd,

    #[error("play interval must be greater than zero")]
    InvalidInterval,
}

#[derive(Debug)]
pub struct Playback<F, S: Scheduler> {
    frames: Vec<F>,
    position: usize,
    playing: bool,
    interval: Duration,
    timer: Option<TimerId>,
    scheduler: S,
}

impl<F, S: Scheduler> Playback<F, S> {
    pub fn new(scheduler: S) -> Self {
        Playback {
            frames: Vec::new(),
            position: 0,
            playing: false,
            interval: DEFAULT_INTERVAL,
            timer: None,
            scheduler,
        }
    }

    /// Replace the held frames, rewinding to the first one and pausing
    pub fn load(&mut self, frames: Vec<F>) -> Result<(), PlaybackError> {
        if frames.is_empty() {
            return Err(PlaybackError::Empty);
        }
        self.disarm();
        self.playing = false;
        self.frames = frames;
        self.position = 0;
        debug!(frames = self.frames.len(), "playback loaded");
        Ok(())
    }

    pub fn seek(&mut self, index: usize) -> Result<&F, PlaybackError> {
        if self.frames.is_empty() {
            return Err(PlaybackError::Empty);
        }
        if index >= self.frames.len() {
            return Err(PlaybackError::SeekOutOfRange {
                index,
                len: self.frames.len(),
            });
        }
        self.position = index;
        Ok(&self.frames[index])
    }

    pub fn step_forward(&mut self) -> Result<&F, PlaybackError> {
        if self.frames.is_empty() {
            return Err(PlaybackError::Empty);
        }
        if self.is_at_end() {
            return Err(PlaybackError::AtEnd);
        }
        self.position += 1;
        Ok(&self.frames[self.position])
    }

    pub fn step_backward(&mut self) -> Result<&F, PlaybackError> {
        if self.frames.is_empty() {
            return Err(PlaybackError::Empty);
        }
        if self.position == 0 {
            return Err(PlaybackError::AtStart);
        }
        self.position -= 1;
        Ok(&self.frames[self.position])
    }

    /// Start advancing one frame per `interval`
    ///
    /// Starting from the last frame rewinds to the first one.
    pub fn play(&mut self, interval: Duration) -> Result<(), PlaybackError> {
        if interval.is_zero() {
            return Err(PlaybackError::InvalidInterval);
        }
        if self.frames.is_empty() {
            return Err(PlaybackError::Empty);
        }
        if self.is_at_end() {
            self.position = 0;
        }
        self.disarm();
        self.interval = interval;
        self.playing = true;
        self.timer = Some(self.scheduler.schedule(interval));
        debug!(interval_ms = interval.as_millis() as u64, position = self.position, "playback started");
        Ok(())
    }

    pub fn pause(&mut self) {
        self.disarm();
        if self.playing {
            debug!(position = self.position, "playback paused");
        }
        self.playing = false;
    }

    pub fn toggle(&mut self, interval: Duration) -> Result<(), PlaybackError> {
        if self.playing {
            self.pause();
            Ok(())
        } else {
            self.play(interval)
        }
    }

    /// Handle a fired timer; returns whether the cursor moved
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            trace!(?id, "ignored stale timer");
            return false;
        }
        self.timer = None;
        if !self.playing || self.is_at_end() {
            self.playing = false;
            return false;
        }

        self.position += 1;
        if self.is_at_end() {
            self.playing = false;
            debug!(position = self.position, "playback reached the last frame");
        } else {
            self.timer = Some(self.scheduler.schedule(self.interval));
        }
        true
    }

    /// Deliver every due timer; returns how many frames were advanced
    pub fn tick(&mut self) -> usize {
        let fired = self.scheduler.fired();
        fired.into_iter().filter(|&id| self.on_timer(id)).count()
    }

    fn disarm(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn current(&self) -> Option<&F> {
        self.frames.get(self.position)
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.frames.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
