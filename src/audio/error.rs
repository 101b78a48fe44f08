use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("no track at index {0}")]
    NoSuchTrack(usize),
    #[error("{name} is not playable ({content_type}, {len} bytes)")]
    Unplayable {
        name: String,
        content_type: String,
        len: usize,
    },
    #[error("could not decode {name}: {reason}")]
    Decode { name: String, reason: String },
    #[error("no audio output: {0}")]
    NoOutput(String),
    #[error("audio thread is not running")]
    Disconnected,
}
