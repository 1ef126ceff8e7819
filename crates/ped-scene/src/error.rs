use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("unknown route destination '{0}'")]
    UnknownDestination(String),

    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;
