use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed time expression: {0:?}")]
    MalformedTimeExpr(String),
    #[error("unknown {kind} reference: {id}")]
    UnknownReference { kind: &'static str, id: String },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("solver backend failure: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
