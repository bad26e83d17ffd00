use thiserror::Error;

/// A literal that failed one of the format predicates in [`crate::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Wrong phone number format: '{0}'. Use (0XX)XXX-XX-XX format")]
    Phone(String),

    #[error("Wrong email format: '{0}'. Should look like aaaa@ddd.cc")]
    Email(String),

    #[error("Wrong birthday: '{0}'. Should be a real date written as dd.mm.yyyy")]
    Birthday(String),

    #[error("Wrong date: '{0}'. Should be a real date written as dd.mm.yyyy")]
    Date(String),

    #[error("Contact name cannot be empty")]
    EmptyName,

    #[error("Address cannot be empty")]
    EmptyAddress,

    #[error("A note must fit on a single line")]
    MultilineNote,
}

#[derive(Error, Debug)]
pub enum PocketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupted note on line {line}: {content}")]
    Corruption { line: usize, content: String },
}

pub type Result<T> = std::result::Result<T, PocketError>;
