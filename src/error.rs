//! Error types
//!
//! Nothing in the presentation loop is retried: every failure is returned to
//! whoever drives the fight.

use crate::catalog::FighterId;
use crate::fight::LifecyclePhase;

/// The engine could not be constructed (model or asset load)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to load fight engine: {0}")]
pub struct LoadError(pub String);

/// The engine failed while advancing one tick
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("engine step failed: {0}")]
pub struct StepError(pub String);

/// Drawing surface errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("drawing surface unavailable: {0}")]
    Unavailable(String),

    #[error("draw call failed: {0}")]
    Draw(String),
}

/// Fighter catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("duplicate fighter id: {0}")]
    Duplicate(FighterId),

    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid fight configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid fight config: {field} must be positive (got {value})")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: f64,
}

/// Errors surfaced by the fight lifecycle
#[derive(Debug, thiserror::Error)]
pub enum FightError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown fighter: {0}")]
    UnknownFighter(FighterId),

    #[error("cannot {action} while {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: LifecyclePhase,
    },
}
