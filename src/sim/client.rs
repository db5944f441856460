//! Engine boundary
//!
//! The fight engine is opaque: an async constructor that loads both fighters'
//! policies, and a handle that advances one tick per call.

use std::future::Future;

use super::state::FightSnapshot;
use crate::catalog::FighterId;
use crate::error::{LoadError, StepError};

/// Factory for engine handles
pub trait SimulationClient {
    type Handle: SimulationHandle;

    /// Load both fighters and produce a ready-to-step handle
    fn construct(
        &self,
        fighter_a: FighterId,
        fighter_b: FighterId,
    ) -> impl Future<Output = Result<Self::Handle, LoadError>>;
}

/// A loaded fight, stepped from a single logical sequence
pub trait SimulationHandle {
    /// Advance exactly one tick and return the full resulting state
    fn step(&mut self) -> Result<FightSnapshot, StepError>;
}

impl<H: SimulationHandle + ?Sized> SimulationHandle for Box<H> {
    fn step(&mut self) -> Result<FightSnapshot, StepError> {
        (**self).step()
    }
}
