use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// Only raised under `ParsePolicy::Strict`, lenient parsing drops the token instead.
    #[error("Parsing Error: {0}")]
    ParseError(String),
    #[error("Invalid Config Error: {0}")]
    InvalidConfig(String),
    #[error("Encoding Error: {0}")]
    EncodingError(String),
    #[error("Audio Error: {0}")]
    AudioError(String),
}

impl From<hound::Error> for SynthError {
    fn from(err: hound::Error) -> Self {
        SynthError::AudioError(err.to_string())
    }
}
