//! Draw commands and the surface they replay onto

use glam::Vec2;

use crate::color::Color;
use crate::error::SurfaceError;

/// One drawing primitive, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Clear the region from the origin to (width, height)
    Clear { width: f32, height: f32 },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

/// A 2D drawing surface of fixed pixel size
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32) -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError>;

    /// Replay a command list in order, stopping at the first failure
    fn draw(&mut self, commands: &[DrawCommand]) -> Result<(), SurfaceError> {
        for command in commands {
            match *command {
                DrawCommand::Clear { width, height } => self.clear(width, height)?,
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => self.fill_circle(center, radius, color)?,
            }
        }
        Ok(())
    }
}

/// Surface that records what was drawn (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    frames: u32,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands since the last clear
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Number of clears seen, i.e. frames drawn
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Surface for CommandRecorder {
    fn clear(&mut self, width: f32, height: f32) -> Result<(), SurfaceError> {
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { width, height });
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
        Ok(())
    }
}
