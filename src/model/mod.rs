use thiserror::Error;

pub mod benchmark;
pub mod framework;
pub mod manifest;
pub mod zon;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("ZON syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Missing ZON key `{0}` while parsing")]
    MissingKey(String),
    #[error("Expected `{key}` to be a {expected}, found {found}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Invalid framework identifier `{0}`")]
    InvalidFramework(String),
}
