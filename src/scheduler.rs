//! Drift-compensated frame pacing
//!
//! The host delivers frame callbacks at its own refresh rate, which is neither
//! the target rate nor exactly periodic. Each callback decides whether one
//! step is due. A step fires when the time since the last executed step
//! reaches `frame_time - pacing_error`, where `pacing_error` is how far the
//! previous step overshot its own gate. Carrying the overshoot forward keeps
//! the long-run step rate on target instead of rounding every frame up to the
//! next host refresh.
//!
//! The carried error is clamped to one frame: after a stall (backgrounded tab)
//! the scheduler owes at most one frame, so it resumes with a single catch-up
//! step instead of replaying the whole gap.

use std::ops::ControlFlow;

use crate::platform::{FrameHost, FrameRequest};

/// Pacing state, private to the scheduler
#[derive(Debug, Clone, Copy, Default)]
struct FrameClock {
    /// Host timestamp of the last executed step
    last_executed: Option<f64>,
    /// Overshoot of the last executed step past its gate, 0..=frame_time
    pacing_error: f64,
}

impl FrameClock {
    /// Overshoot past the gate if a step is due at `now`
    fn due(&self, now: f64, frame_time: f64) -> Option<f64> {
        match self.last_executed {
            // Nothing executed yet: the first callback steps immediately
            None => Some(0.0),
            Some(last) => {
                let elapsed = now - last;
                let gate = frame_time - self.pacing_error;
                (elapsed >= gate).then(|| elapsed - gate)
            }
        }
    }

    fn record(&mut self, now: f64, overshoot: f64, frame_time: f64) {
        self.last_executed = Some(now);
        self.pacing_error = overshoot.clamp(0.0, frame_time);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Stopped,
}

/// What a host callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The routine ran and asked to continue
    Executed,
    /// Not due yet; re-registered for the next callback
    Skipped,
    /// The routine ran and asked to stop; the scheduler is now inert
    Stopped,
    /// Scheduler not running; nothing happened
    Inert,
}

/// Calls a step routine at a target rate from irregular host callbacks
pub struct FrameScheduler<H: FrameHost> {
    host: H,
    clock: FrameClock,
    frame_time: f64,
    pending: Option<FrameRequest>,
    state: RunState,
}

impl<H: FrameHost> FrameScheduler<H> {
    pub fn new(host: H, target_fps: f64) -> Self {
        Self {
            host,
            clock: FrameClock::default(),
            frame_time: 1000.0 / target_fps,
            pending: None,
            state: RunState::Idle,
        }
    }

    /// Interval between steps (ms)
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Register for the first host callback. Only an idle scheduler starts.
    pub fn start(&mut self) {
        if self.state != RunState::Idle {
            log::warn!("Scheduler start ignored ({:?})", self.state);
            return;
        }
        self.state = RunState::Running;
        self.pending = Some(self.host.request_frame());
        log::debug!("Scheduler started at {:.2} ms/frame", self.frame_time);
    }

    /// Handle one host callback at timestamp `now` (ms)
    ///
    /// Runs `routine` at most once. A `Break` or an error stops the scheduler;
    /// otherwise the next callback is requested whether or not a step ran.
    pub fn on_frame<F, E>(&mut self, now: f64, routine: F) -> Result<FrameOutcome, E>
    where
        F: FnOnce(f64) -> Result<ControlFlow<()>, E>,
    {
        if self.state != RunState::Running {
            return Ok(FrameOutcome::Inert);
        }
        // This callback is the delivery of the pending request
        self.pending = None;

        let mut outcome = FrameOutcome::Skipped;
        if let Some(overshoot) = self.clock.due(now, self.frame_time) {
            match routine(now) {
                Ok(ControlFlow::Continue(())) => {
                    self.clock.record(now, overshoot, self.frame_time);
                    outcome = FrameOutcome::Executed;
                }
                Ok(ControlFlow::Break(())) => {
                    self.cancel();
                    return Ok(FrameOutcome::Stopped);
                }
                Err(e) => {
                    self.cancel();
                    return Err(e);
                }
            }
        }

        self.pending = Some(self.host.request_frame());
        Ok(outcome)
    }

    /// Deregister the pending callback and go inert. Repeat calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(request) = self.pending.take() {
            self.host.cancel_frame(request);
        }
        if self.state != RunState::Stopped {
            self.state = RunState::Stopped;
            log::debug!("Scheduler stopped");
        }
    }
}

impl<H: FrameHost> Drop for FrameScheduler<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}
