//! HUD view model
//!
//! Per-fighter readout built from a snapshot. The browser writes it into the
//! DOM; the headless run logs it.

use std::f32::consts::PI;
use std::fmt;

use glam::Vec2;

use crate::catalog::FighterDescriptor;
use crate::color::Color;
use crate::consts::{MAX_ENERGY, MAX_HEALTH};
use crate::sim::{Control, FightSnapshot, PLAYER_COUNT, PlayerState};

/// One fighter's panel
#[derive(Debug, Clone, PartialEq)]
pub struct HudSide {
    /// `NAME_###`
    pub tag: String,
    pub color: Color,
    /// One slot per health point; filled slots first
    pub pips: [bool; MAX_HEALTH as usize],
    /// Energy as a fraction of the maximum
    pub energy: f32,
    pub pos: Vec2,
    /// Direction of travel (radians, 0 = up)
    pub heading: f32,
    /// Body facing for display (radians)
    pub rotation: f32,
    pub control: Control,
}

impl HudSide {
    fn new(fighter: &FighterDescriptor, player: &PlayerState) -> Self {
        let health = player.health.min(MAX_HEALTH) as usize;
        let mut pips = [false; MAX_HEALTH as usize];
        pips[..health].iter_mut().for_each(|p| *p = true);

        Self {
            tag: fighter.tag(),
            color: fighter.color,
            pips,
            energy: player.energy.min(MAX_ENERGY) as f32 / MAX_ENERGY as f32,
            pos: player.pos,
            heading: player.vel.y.atan2(player.vel.x) - PI / 2.0,
            rotation: player.rotation + PI,
            control: player.last_control,
        }
    }

    pub fn health(&self) -> usize {
        self.pips.iter().filter(|p| **p).count()
    }
}

/// Both panels, player 0 first
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub sides: [HudSide; PLAYER_COUNT],
}

impl HudView {
    pub fn from_snapshot(
        snapshot: &FightSnapshot,
        fighters: &[FighterDescriptor; PLAYER_COUNT],
    ) -> Self {
        Self {
            sides: [
                HudSide::new(&fighters[0], &snapshot.players[0]),
                HudSide::new(&fighters[1], &snapshot.players[1]),
            ],
        }
    }
}

impl fmt::Display for HudSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pips: String = self.pips.iter().map(|p| if *p { '#' } else { '.' }).collect();
        write!(
            f,
            "{} [{}] energy {:>3.0}% at ({:.0}, {:.0})",
            self.tag,
            pips,
            self.energy * 100.0,
            self.pos.x,
            self.pos.y
        )
    }
}

impl fmt::Display for HudView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.sides[0], self.sides[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FighterId};
    use crate::renderer::ring::tests::{player, snapshot};

    fn fighters() -> [FighterDescriptor; 2] {
        let catalog = Catalog::builtin();
        [
            catalog.get(FighterId(25)).unwrap().clone(),
            catalog.get(FighterId(11)).unwrap().clone(),
        ]
    }

    #[test]
    fn test_pips_and_energy() {
        let mut p0 = player(100.0, 200.0, 3);
        p0.energy = 4;
        let snap = snapshot(p0, player(300.0, 200.0, 0), false);
        let hud = HudView::from_snapshot(&snap, &fighters());

        assert_eq!(hud.sides[0].pips, [true, true, true, false, false]);
        assert_eq!(hud.sides[0].health(), 3);
        assert!((hud.sides[0].energy - 0.4).abs() < 1e-6);
        assert_eq!(hud.sides[1].health(), 0);
        assert_eq!(hud.sides[0].tag, "ARNOLD_025");
        assert_eq!(hud.sides[1].tag, "FRANK_011");
    }

    #[test]
    fn test_heading_and_rotation() {
        let mut p0 = player(0.0, 0.0, 5);
        p0.vel = Vec2::new(0.0, 1.0);
        p0.rotation = 0.5;
        let snap = snapshot(p0, player(10.0, 10.0, 5), false);
        let side = &HudView::from_snapshot(&snap, &fighters()).sides[0];
        // Moving along +y reads as heading 0
        assert!(side.heading.abs() < 1e-6);
        assert!((side.rotation - (0.5 + PI)).abs() < 1e-6);
    }

    #[test]
    fn test_display_line() {
        let snap = snapshot(player(100.0, 200.0, 2), player(300.0, 150.0, 5), false);
        let text = HudView::from_snapshot(&snap, &fighters()).to_string();
        assert!(text.starts_with("ARNOLD_025 [##...] energy 100%"));
        assert!(text.contains("FRANK_011 [#####]"));
    }
}
