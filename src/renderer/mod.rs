//! Ring rendering
//!
//! Snapshots become a flat list of draw commands, replayed onto any surface
//! that can clear and fill circles (Canvas 2D in the browser).

pub mod commands;
pub mod ring;

pub use commands::{CommandRecorder, DrawCommand, Surface};
pub use ring::{RingGeometry, render};
