//! Fight engine boundary
//!
//! The engine itself is external and opaque. This module holds:
//! - Snapshot types the engine produces each step
//! - The async-constructor / synchronous-stepper contract
//! - A seeded sparring stand-in implementing that contract

pub mod client;
pub mod sparring;
pub mod state;

pub use client::{SimulationClient, SimulationHandle};
pub use sparring::{SparringBout, SparringClient};
pub use state::{
    ACTION_COUNT, Control, FightSnapshot, FistPosture, FistState, MoveX, MoveY, PLAYER_COUNT,
    PlayerState,
};
