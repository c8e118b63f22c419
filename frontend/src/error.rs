use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage rejected write: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("browser global `{0}` is unavailable")]
    MissingGlobal(&'static str),
    #[error("no element matches `{0}`")]
    MissingRoot(String),
    #[error("no post id in path `{0}`")]
    NoPostId(String),
    #[error("javascript error: {0}")]
    Js(String),
}
