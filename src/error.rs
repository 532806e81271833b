use thiserror::Error;

/// Unified error type for dsviz
#[derive(Error, Debug)]
pub enum VizError {
    /// A different operation is still animating on the same controller.
    #[error("Busy: {active} is still animating (requested {requested})")]
    Busy { active: String, requested: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{what} {index} is out of range (size {len})")]
    OutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },

    #[error("Animation did not finish within {frames} frames")]
    Stalled { frames: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VizError {
    pub fn busy(active: &impl std::fmt::Debug, requested: &impl std::fmt::Debug) -> Self {
        Self::Busy {
            active: format!("{active:?}"),
            requested: format!("{requested:?}"),
        }
    }
}

pub type VizResult<T> = Result<T, VizError>;
