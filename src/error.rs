//! Error type shared by every fallible operation in the crate.
//!
//! Out-of-range increments and decrements are not errors: they are silent
//! no-ops. Errors cover configuration, registration, layout and terminal I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("invalid bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: i32, max: i32 },

    #[error("element '{0}' is already defined")]
    AlreadyDefined(String),

    #[error("'{0}' is not a valid element name")]
    InvalidTag(String),

    #[error("element '{0}' is not defined")]
    UndefinedElement(String),

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CounterError>;
