//! One fight, from confirmation to outcome

pub mod diff;
pub mod lifecycle;

pub use diff::{HitEvent, diff};
pub use lifecycle::{FightLifecycle, FightOutcome, LifecyclePhase};
