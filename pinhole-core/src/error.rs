//! Errors raised at the controller boundary

use thiserror::Error;

/// Rejected input from a host widget or configuration source
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("slider index {0} out of range")]
    ParameterIndex(usize),

    #[error("view mode option {0} out of range (expected 0..=3)")]
    ViewModeIndex(usize),

    #[error("unknown scene `{0}` (expected extrinsic or intrinsic)")]
    UnknownScene(String),

    #[error("invalid scene configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
