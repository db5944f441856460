//! Hit effects
//!
//! Each hit starts its own short-lived ring animation at the fighter's
//! position. The fight loop only hands hits over; sampling and drawing happen
//! on the presentation side at whatever rate it likes.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::color::Color;
use crate::fight::HitEvent;

/// Live effects kept at once; the oldest is dropped beyond this
pub const MAX_EFFECTS: usize = 32;

/// Keyframes at 0, 1/2 and 1 of an effect's lifetime
const SCALE: [f32; 3] = [0.25, 1.0, 0.75];
const BORDER: [f32; 3] = [5.0, 40.0, 0.0];
const OPACITY: [f32; 3] = [0.2, 0.25, 0.0];

/// Receives hits from the fight loop. Never fails.
pub trait EffectSink {
    fn on_hit(&mut self, hit: &HitEvent, now: f64);
}

impl<E: EffectSink> EffectSink for Rc<RefCell<E>> {
    fn on_hit(&mut self, hit: &HitEvent, now: f64) {
        self.borrow_mut().on_hit(hit, now);
    }
}

/// One effect as it should look right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectFrame {
    /// World position of the hit
    pub pos: Vec2,
    pub color: Color,
    pub scale: f32,
    /// Ring border width (px)
    pub border: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy)]
struct HitEffect {
    pos: Vec2,
    color: Color,
    started: f64,
}

/// Cubic ease-in-out on [0, 1]
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Eased value along three evenly spaced keyframes
fn keyframe(frames: [f32; 3], progress: f32) -> f32 {
    let (a, b, local) = if progress < 0.5 {
        (frames[0], frames[1], progress * 2.0)
    } else {
        (frames[1], frames[2], (progress - 0.5) * 2.0)
    };
    a + (b - a) * ease_in_out(local.clamp(0.0, 1.0))
}

/// Runs independent hit effects on a shared clock
#[derive(Debug, Clone)]
pub struct EffectController {
    duration_ms: f64,
    live: Vec<HitEffect>,
    triggered: u32,
}

impl EffectController {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            live: Vec::new(),
            triggered: 0,
        }
    }

    /// Start an effect for `hit` at `now` (ms)
    pub fn trigger(&mut self, hit: &HitEvent, now: f64) {
        if self.live.len() >= MAX_EFFECTS {
            self.live.remove(0);
        }
        self.live.push(HitEffect {
            pos: hit.pos,
            color: hit.color,
            started: now,
        });
        self.triggered += 1;
    }

    /// Current frame of every live effect, oldest first; expired ones are dropped
    pub fn sample(&mut self, now: f64) -> Vec<EffectFrame> {
        let duration = self.duration_ms;
        self.live.retain(|e| now - e.started < duration);
        self.live
            .iter()
            .map(|e| {
                let progress = ((now - e.started) / duration).max(0.0) as f32;
                EffectFrame {
                    pos: e.pos,
                    color: e.color,
                    scale: keyframe(SCALE, progress),
                    border: keyframe(BORDER, progress),
                    opacity: keyframe(OPACITY, progress),
                }
            })
            .collect()
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Total effects ever started
    pub fn triggered(&self) -> u32 {
        self.triggered
    }
}

impl EffectSink for EffectController {
    fn on_hit(&mut self, hit: &HitEvent, now: f64) {
        self.trigger(hit, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(player: usize) -> HitEvent {
        HitEvent {
            player,
            pos: Vec2::new(120.0, 80.0),
            color: Color::rgb(0xFF, 0x31, 0x31),
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_keyframes_at_start_middle_end() {
        let mut fx = EffectController::new(500.0);
        fx.trigger(&hit(0), 1000.0);

        let start = fx.sample(1000.0)[0];
        assert!(close(start.scale, 0.25));
        assert!(close(start.border, 5.0));
        assert!(close(start.opacity, 0.2));
        assert_eq!(start.pos, Vec2::new(120.0, 80.0));

        let middle = fx.sample(1250.0)[0];
        assert!(close(middle.scale, 1.0));
        assert!(close(middle.border, 40.0));
        assert!(close(middle.opacity, 0.25));

        let late = fx.sample(1499.0)[0];
        assert!(late.opacity < 0.01);
        assert!(late.border < 1.0);
    }

    #[test]
    fn test_expired_effects_pruned() {
        let mut fx = EffectController::new(500.0);
        fx.trigger(&hit(0), 0.0);
        fx.trigger(&hit(1), 300.0);
        assert_eq!(fx.sample(400.0).len(), 2);
        assert_eq!(fx.sample(500.0).len(), 1);
        assert_eq!(fx.sample(800.0).len(), 0);
        assert_eq!(fx.live(), 0);
        assert_eq!(fx.triggered(), 2);
    }

    #[test]
    fn test_simultaneous_hits_animate_independently() {
        let mut fx = EffectController::new(500.0);
        fx.trigger(&hit(0), 0.0);
        fx.trigger(&hit(1), 0.0);
        let frames = fx.sample(100.0);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].scale, frames[1].scale);
    }

    #[test]
    fn test_oldest_dropped_past_cap() {
        let mut fx = EffectController::new(500.0);
        for i in 0..(MAX_EFFECTS + 5) {
            fx.trigger(&hit(i % 2), i as f64);
        }
        assert_eq!(fx.live(), MAX_EFFECTS);
    }

    #[test]
    fn test_shared_sink() {
        let fx = Rc::new(RefCell::new(EffectController::new(500.0)));
        let mut sink: Box<dyn EffectSink> = Box::new(fx.clone());
        sink.on_hit(&hit(0), 10.0);
        assert_eq!(fx.borrow().live(), 1);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = ease_in_out(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
        assert!(close(last, 1.0));
    }
}
