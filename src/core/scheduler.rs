//=========================================================================
// Frame Scheduler
//
// Converts a free-running host frame clock into a throttled,
// FPS-tracked game loop.
//
// Responsibilities:
// - Own the Idle → Running ⇄ Paused state machine
// - Compute per-tick delta from the previous tick's timestamp
// - Keep a bounded rolling window of frame durations and derive FPS
// - Compute the delay before the next host frame request
//
// Notes:
// The scheduler never calls user code and never touches the surface;
// `Instance` wraps `begin_frame` / `end_frame` around the draw and update
// passes. While paused the host keeps ticking: `begin_frame` only keeps
// the timestamp synced, so the first frame after `resume` reports a
// normal delta instead of the whole pause.
//
// All timestamps are milliseconds on the host's monotonic clock.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::VecDeque;
use std::time::Duration;

//=== External Crates =====================================================
use log::{debug, info, trace};

//=== Constants ===========================================================

/// Maximum number of frame durations kept for the FPS estimate
/// (about five seconds at 60 Hz).
pub const FRAME_WINDOW: usize = 300;

//=== SchedulerState ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Not started yet; ticks are ignored.
    #[default]
    Idle,
    Running,
    /// Ticks skip the draw/update passes but keep the clock synced.
    Paused,
}

//=== FrameScheduler ======================================================

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
    last_frame: f64,
    frame_times: VecDeque<f64>,
    fps: u32,
    max_fps: Option<f64>,
}

impl FrameScheduler {
    //--- Construction -----------------------------------------------------

    /// `max_fps = None` runs unthrottled.
    pub fn new(max_fps: Option<f64>) -> Self {
        Self {
            state: SchedulerState::Idle,
            last_frame: 0.0,
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
            fps: 0,
            max_fps: sanitize_max_fps(max_fps),
        }
    }

    //--- State Machine ----------------------------------------------------

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Idle → Running. Captures `now` as the previous frame timestamp.
    ///
    /// Has no effect once started.
    pub fn start(&mut self, now: f64) {
        if self.state != SchedulerState::Idle {
            debug!(target: "scheduler", "start() ignored, already {:?}", self.state);
            return;
        }
        self.last_frame = now;
        self.state = SchedulerState::Running;
        info!(target: "scheduler", "Scheduler running (max fps: {:?})", self.max_fps);
    }

    /// Running → Paused.
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
            info!(target: "scheduler", "Scheduler paused");
        }
    }

    /// Paused → Running.
    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
            info!(target: "scheduler", "Scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    //--- Tick Bookkeeping -------------------------------------------------

    /// Opens a tick at host timestamp `t`.
    ///
    /// Returns the delta since the previous tick when Running. Returns
    /// `None` when Idle or Paused, in which case the caller skips the draw
    /// and update passes.
    pub fn begin_frame(&mut self, t: f64) -> Option<f64> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Paused => {
                self.last_frame = t;
                None
            }
            SchedulerState::Running => Some((t - self.last_frame).max(0.0)),
        }
    }

    /// Closes a tick: records `delta`, refreshes the FPS estimate and
    /// stores `t` as the previous frame timestamp.
    pub fn end_frame(&mut self, t: f64, delta: f64) {
        self.frame_times.push_back(delta);
        while self.frame_times.len() > FRAME_WINDOW {
            self.frame_times.pop_front();
        }

        self.fps = match self.average_frame_time() {
            Some(mean) if mean > 0.0 => (1000.0 / mean).floor() as u32,
            _ => 0,
        };
        self.last_frame = t;

        trace!(target: "scheduler", "Frame closed: delta {:.2} ms, fps {}", delta, self.fps);
    }

    //--- Statistics -------------------------------------------------------

    /// `floor(1000 / mean frame time)`; 0 before the first frame.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Rolling window of recent frame durations, oldest first.
    pub fn frame_times(&self) -> &VecDeque<f64> {
        &self.frame_times
    }

    /// Mean of the rolling window, `None` while it is empty.
    pub fn average_frame_time(&self) -> Option<f64> {
        if self.frame_times.is_empty() {
            return None;
        }
        Some(self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64)
    }

    pub fn last_frame(&self) -> f64 {
        self.last_frame
    }

    //--- Throttling -------------------------------------------------------

    pub fn max_fps(&self) -> Option<f64> {
        self.max_fps
    }

    /// Zero, negative and non-finite limits mean unthrottled.
    pub fn set_max_fps(&mut self, max_fps: Option<f64>) {
        self.max_fps = sanitize_max_fps(max_fps);
        debug!(target: "scheduler", "Max fps set to {:?}", self.max_fps);
    }

    /// Delay before requesting the next host frame.
    ///
    /// `max(0, 1000 / max_fps - (now - t))`: measured against the time
    /// already spent since the tick began, so overhead does not compound.
    /// Zero when unthrottled.
    pub fn next_frame_delay(&self, t: f64, now: f64) -> Duration {
        match self.max_fps {
            Some(limit) => {
                let remaining = 1000.0 / limit - (now - t);
                Duration::from_secs_f64(remaining.max(0.0) / 1000.0)
            }
            None => Duration::ZERO,
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(None)
    }
}

fn sanitize_max_fps(max_fps: Option<f64>) -> Option<f64> {
    max_fps.filter(|fps| fps.is_finite() && *fps > 0.0)
}

//=========================================================================
// Unit Tests
//=========================================================================
