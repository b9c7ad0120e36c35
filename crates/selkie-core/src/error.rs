pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("chart definition failed: {message}")]
    Definition { message: String },

    #[error("chart runtime rejected the option: {message}")]
    Runtime { message: String },

    #[error("invalid chart config: {message}")]
    InvalidConfig { message: String },

    #[error("embed instance has been disposed")]
    Disposed,
}
