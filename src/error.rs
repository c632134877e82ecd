use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("State store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("State encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Artwork fetch error: {0}")]
    Fetch(String),

    #[error("No handler installed on channel {0}")]
    NoHandler(&'static str),
}
