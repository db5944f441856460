//! Snapshot to draw commands
//!
//! Stateless: the same snapshot, colors and geometry always produce the same
//! command list. Player 0 is drawn entirely before player 1, body then fists,
//! so player 1 occludes player 0 where they overlap.

use crate::color::Color;
use crate::config::FightConfig;
use crate::sim::FightSnapshot;

use super::commands::DrawCommand;

/// Ring geometry in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub surface_size: f32,
    /// Surface pixels per world unit
    pub scale: f32,
    pub body_radius: f32,
    pub fist_radius: f32,
}

impl RingGeometry {
    pub fn from_config(config: &FightConfig) -> Self {
        let scale = config.scale();
        Self {
            surface_size: config.surface_size,
            scale,
            body_radius: config.body_radius * scale,
            fist_radius: config.fist_radius * scale,
        }
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::from_config(&FightConfig::default())
    }
}

/// Draw commands for one frame: clear, then body and both fists per player
pub fn render(snapshot: &FightSnapshot, colors: [Color; 2], geometry: &RingGeometry) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(1 + 3 * snapshot.players.len());
    commands.push(DrawCommand::Clear {
        width: geometry.surface_size,
        height: geometry.surface_size,
    });

    for (player, color) in snapshot.players.iter().zip(colors) {
        commands.push(DrawCommand::FillCircle {
            center: player.pos * geometry.scale,
            radius: geometry.body_radius,
            color,
        });
        for fist in &player.fists {
            commands.push(DrawCommand::FillCircle {
                center: fist.pos * geometry.scale,
                radius: geometry.fist_radius,
                color,
            });
        }
    }

    commands
}
