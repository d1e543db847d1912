use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Class-format failures. Any of these makes the whole class file undecodable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid classfile magic: 0x{0:08x}")]
    InvalidMagic(u32),
    #[error("trailing bytes after classfile")]
    TrailingBytes,
    #[error("invalid constant pool index: {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("invalid constant pool tag: {0}")]
    InvalidConstantPoolTag(u8),
    #[error("constant pool type mismatch at index {index}: expected {expected}, found {found}")]
    ConstantPoolTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid modified UTF-8 constant")]
    InvalidModifiedUtf8,
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("malformed {0} attribute")]
    MalformedAttribute(&'static str),
    #[error("unsupported annotation element tag {0:?}")]
    UnsupportedElementValue(char),
    #[error("name {0:?} cannot be written in Java source")]
    UnprintableName(String),
}

/// A generic signature that does not follow the JVMS 4.7.9.1 grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid signature {signature:?} at offset {offset}: {reason}")]
pub struct SignatureError {
    pub signature: String,
    pub offset: usize,
    pub reason: &'static str,
}

/// Why the stub builder produced no tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("class format error: {0}")]
    ClassFormat(#[from] Error),
    #[error("class name {0:?} is not a valid binary name")]
    InvalidClassName(String),
    #[error("stub building was cancelled")]
    Cancelled,
}
