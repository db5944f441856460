//! Hand-driven frame host and timer
//!
//! Clones share state, so a test (or the headless runner) keeps one copy to
//! deliver frames and advance time while the fight owns the other.

use std::cell::RefCell;
use std::rc::Rc;

use super::{FrameHost, FrameRequest, Timer, TimerId};

#[derive(Debug, Default)]
struct HostState {
    next_id: i32,
    pending: Vec<FrameRequest>,
    requested: u32,
    cancelled: u32,
}

/// Frame host whose callbacks are delivered by hand
#[derive(Debug, Clone, Default)]
pub struct ManualFrameHost {
    state: Rc<RefCell<HostState>>,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the oldest pending request, as the host would when it fires
    pub fn take_pending(&self) -> Option<FrameRequest> {
        let mut state = self.state.borrow_mut();
        if state.pending.is_empty() {
            None
        } else {
            Some(state.pending.remove(0))
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.state.borrow().pending.is_empty()
    }

    /// Total frames ever requested
    pub fn requested(&self) -> u32 {
        self.state.borrow().requested
    }

    /// Total requests withdrawn before delivery
    pub fn cancelled(&self) -> u32 {
        self.state.borrow().cancelled
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requested += 1;
        let request = FrameRequest(state.next_id);
        state.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.state.borrow_mut();
        let before = state.pending.len();
        state.pending.retain(|r| *r != request);
        if state.pending.len() < before {
            state.cancelled += 1;
        }
    }
}

struct PendingTimeout {
    id: TimerId,
    deadline: f64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerState {
    now: f64,
    next_id: i32,
    pending: Vec<PendingTimeout>,
    fired: u32,
}

/// Timer driven by explicit `advance` calls
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<TimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Total callbacks fired so far
    pub fn fired(&self) -> u32 {
        self.state.borrow().fired
    }

    /// Move time forward and fire everything that came due, in deadline order
    pub fn advance(&self, ms: f64) {
        let due = {
            let mut state = self.state.borrow_mut();
            state.now += ms;
            let now = state.now;
            let (mut due, rest): (Vec<_>, Vec<_>) =
                state.pending.drain(..).partition(|t| t.deadline <= now);
            state.pending = rest;
            state.fired += due.len() as u32;
            due.sort_by(|a, b| a.deadline.total_cmp(&b.deadline));
            due
        };
        // Callbacks run with the state released so they may schedule more
        for timeout in due {
            log::debug!("Timeout {:?} fired", timeout.id);
            (timeout.callback)();
        }
    }
}

impl Timer for ManualTimer {
    fn set_timeout(&mut self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        let deadline = state.now + delay_ms.max(0.0);
        state.pending.push(PendingTimeout {
            id,
            deadline,
            callback,
        });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.state.borrow_mut().pending.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_frame_requests_and_cancel() {
        let mut host = ManualFrameHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        host.cancel_frame(a);
        assert_eq!(host.cancelled(), 1);
        assert_eq!(host.take_pending(), Some(b));
        assert!(!host.has_pending());
        // Cancelling a delivered request is a no-op
        host.cancel_frame(b);
        assert_eq!(host.cancelled(), 1);
        assert_eq!(host.requested(), 2);
    }

    #[test]
    fn test_timer_fires_at_deadline() {
        let mut timer = ManualTimer::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        timer.set_timeout(100.0, Box::new(move || h.set(h.get() + 1)));

        timer.advance(99.0);
        assert_eq!(hits.get(), 0);
        timer.advance(1.0);
        assert_eq!(hits.get(), 1);
        timer.advance(500.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(timer.fired(), 1);
    }

    #[test]
    fn test_timer_clear() {
        let mut timer = ManualTimer::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = timer.set_timeout(10.0, Box::new(move || h.set(h.get() + 1)));
        timer.clear_timeout(id);
        timer.clear_timeout(id);
        timer.advance(20.0);
        assert_eq!(hits.get(), 0);
        assert_eq!(timer.pending(), 0);
    }
}
