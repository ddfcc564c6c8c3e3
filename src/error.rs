use thiserror::Error;

use crate::feed::{RowId, TransitionPhase};

#[derive(Error, Debug)]
pub enum LandingError {
    #[error("Render target not found: {0}")]
    MissingTarget(&'static str),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("Row {row} cannot move from {from:?} to {to:?}")]
    IllegalTransition {
        row: RowId,
        from: TransitionPhase,
        to: TransitionPhase,
    },
    #[error("Host error: {0}")]
    Host(String),
}
