use std::fmt::Display;

use kanri_api::ApiError;
use kanri_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// An error toast raised while running a command.
    #[error("{0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// A service call made outside the runtime. Rendered like an error toast.
    pub fn service(e: impl Display) -> Self {
        Self::Failed(e.to_string())
    }
}
