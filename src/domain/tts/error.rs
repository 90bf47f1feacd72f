use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("all synthesis engines failed")]
    AllAdaptersFailed,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::AllAdaptersFailed => AppError::SynthesisFailed,
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
