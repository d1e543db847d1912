use nova_classfile::StubPath;
use thiserror::Error;

pub type Result<T, E = DecompileError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DecompileError {
    /// Compiled elements are read-only; every mutation entry point returns this.
    #[error("compiled element at {path} cannot be modified")]
    NotModifiable { path: StubPath },

    #[error("no compiled element at {path}")]
    UnknownElement { path: StubPath },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("decompilation cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse decompiler config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid decompiler config value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorParseError {
    #[error("failed to load the mirror grammar: {0}")]
    Language(String),

    #[error("mirror parse did not complete")]
    Aborted,

    #[error("syntax error in mirror text at byte {offset}")]
    Syntax { offset: usize },
}
