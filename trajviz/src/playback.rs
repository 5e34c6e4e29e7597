use std::time::{Duration, Instant};

use crate::config::AnimationConfig;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Present this frame now.
    Frame(usize),
    /// The next frame is not due yet.
    Wait,
    Paused,
    /// Every frame has been presented.
    Finished,
}

/// Fixed-interval frame clock. Frames are handed out strictly in order, one
/// per due tick; a late tick never skips ahead.
#[derive(Clone, Debug)]
pub struct Playback {
    num_frames: usize,
    interval: Duration,
    next_frame: usize,
    due: Option<Instant>,
    paused: bool,
}

impl Playback {
    pub fn new(num_frames: usize, interval: Duration) -> Self {
        Playback {
            num_frames,
            interval,
            next_frame: 0,
            due: None,
            paused: false,
        }
    }

    pub fn from_config(num_frames: usize, config: &AnimationConfig) -> Result<Self> {
        Ok(Playback::new(num_frames, config.frame_interval()?))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.num_frames
    }

    /// Last frame handed out, if any.
    pub fn current_frame(&self) -> Option<usize> {
        self.next_frame.checked_sub(1)
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.is_finished() {
            return Tick::Finished;
        }
        if self.paused {
            return Tick::Paused;
        }
        if let Some(due) = self.due {
            if now < due {
                return Tick::Wait;
            }
        }

        let frame = self.next_frame;
        self.next_frame += 1;
        self.due = Some(now + self.interval);
        Tick::Frame(frame)
    }

    /// Flips between paused and playing and returns the new paused state.
    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        if self.paused {
            self.due = Some(now + self.interval);
        }
        self.paused = !self.paused;
        self.paused
    }
}
