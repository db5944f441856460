//! Snapshot types produced by the fight engine
//!
//! One `FightSnapshot` per engine step. The presentation core reads these and
//! never writes health or energy back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of fighters in a bout
pub const PLAYER_COUNT: usize = 2;

/// Number of discrete engine actions
pub const ACTION_COUNT: usize = 24;

/// Fist animation posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FistPosture {
    #[default]
    Resting,
    Extending,
    Retracting,
}

/// One fist
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FistState {
    pub pos: Vec2,
    pub posture: FistPosture,
}

/// Lateral movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveX {
    Left,
    #[default]
    Still,
    Right,
}

/// Backward movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveY {
    #[default]
    Still,
    Back,
}

/// Control input applied by a fighter's policy on one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Control {
    pub move_x: MoveX,
    pub move_y: MoveY,
    pub left_punch: bool,
    pub right_punch: bool,
}

impl Control {
    /// Decode an engine action index; anything out of range is the idle control
    ///
    /// Layout: `move_x * 8 + back * 4 + right_punch * 2 + left_punch`, with
    /// move_x ordered Still, Left, Right.
    pub fn from_index(action: usize) -> Self {
        if action >= ACTION_COUNT {
            return Self::default();
        }
        let move_x = match action / 8 {
            0 => MoveX::Still,
            1 => MoveX::Left,
            _ => MoveX::Right,
        };
        let move_y = if action & 4 != 0 {
            MoveY::Back
        } else {
            MoveY::Still
        };
        Self {
            move_x,
            move_y,
            left_punch: action & 1 != 0,
            right_punch: action & 2 != 0,
        }
    }

    /// Engine action index for this control
    pub fn index(&self) -> usize {
        let x = match self.move_x {
            MoveX::Still => 0,
            MoveX::Left => 1,
            MoveX::Right => 2,
        };
        x * 8
            + usize::from(self.move_y == MoveY::Back) * 4
            + usize::from(self.right_punch) * 2
            + usize::from(self.left_punch)
    }
}

/// One fighter's state after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    /// Facing angle (radians)
    pub rotation: f32,
    pub vel: Vec2,
    /// Remaining health, 0..=MAX_HEALTH
    pub health: u8,
    /// Remaining energy, 0..=MAX_ENERGY
    pub energy: u8,
    pub fists: [FistState; 2],
    pub last_control: Control,
}

/// Complete state of both fighters after one engine step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightSnapshot {
    pub players: [PlayerState; PLAYER_COUNT],
    /// Set by the engine once the bout is over
    pub is_done: bool,
}

impl FightSnapshot {
    pub fn player(&self, index: usize) -> &PlayerState {
        &self.players[index]
    }

    pub fn healths(&self) -> [u8; PLAYER_COUNT] {
        [self.players[0].health, self.players[1].health]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_decode_known_actions() {
        assert_eq!(Control::from_index(0), Control::default());

        let c = Control::from_index(5);
        assert_eq!(c.move_x, MoveX::Still);
        assert_eq!(c.move_y, MoveY::Back);
        assert!(c.left_punch && !c.right_punch);

        let c = Control::from_index(10);
        assert_eq!(c.move_x, MoveX::Left);
        assert_eq!(c.move_y, MoveY::Still);
        assert!(!c.left_punch && c.right_punch);

        let c = Control::from_index(23);
        assert_eq!(c.move_x, MoveX::Right);
        assert_eq!(c.move_y, MoveY::Back);
        assert!(c.left_punch && c.right_punch);
    }

    #[test]
    fn test_control_index_is_inverse() {
        for action in 0..ACTION_COUNT {
            assert_eq!(Control::from_index(action).index(), action);
        }
    }

    #[test]
    fn test_control_out_of_range_is_idle() {
        assert_eq!(Control::from_index(24), Control::default());
        assert_eq!(Control::from_index(usize::MAX), Control::default());
    }
}
