//! Hit detection from consecutive snapshots
//!
//! The engine pushes no events; a hit is any tick where a fighter's health
//! went down. This is the only place the presentation core reads health
//! between ticks.

use glam::Vec2;

use crate::color::Color;
use crate::sim::{FightSnapshot, PLAYER_COUNT};

/// A fighter lost health this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    /// Index of the fighter that was hit
    pub player: usize,
    /// Where the fighter is now (world units)
    pub pos: Vec2,
    /// The fighter's display color
    pub color: Color,
}

/// Hits between `previous` and `next`; nothing on the first tick
///
/// Each fighter is checked on its own, so a mutual exchange yields two events.
pub fn diff(
    previous: Option<&FightSnapshot>,
    next: &FightSnapshot,
    colors: [Color; PLAYER_COUNT],
) -> Vec<HitEvent> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    (0..PLAYER_COUNT)
        .filter(|&i| previous.players[i].health > next.players[i].health)
        .map(|i| HitEvent {
            player: i,
            pos: next.players[i].pos,
            color: colors[i],
        })
        .collect()
}
