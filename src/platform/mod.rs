//! Platform abstraction layer
//!
//! The fight loop never talks to the browser directly. It asks a frame host
//! for the next frame callback and a timer for delayed callbacks:
//! - `manual`: hand-driven host and timer (tests, headless native run)
//! - `web`: requestAnimationFrame, setTimeout and Canvas 2D (wasm32)

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use manual::{ManualFrameHost, ManualTimer};

/// Token for a pending frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

/// Token for a pending timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Source of display-refresh callbacks
///
/// The host delivers timestamps (ms) to whoever owns the scheduler; the
/// scheduler only registers and deregisters interest.
pub trait FrameHost {
    /// Ask for one more frame callback
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a pending request; unknown or already delivered tokens are ignored
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// One-shot delayed callbacks
pub trait Timer {
    fn set_timeout(&mut self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timeout; fired or unknown ids are ignored
    fn clear_timeout(&mut self, id: TimerId);
}
