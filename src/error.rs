use core::fmt;

/// Misuse of the argument list, or a failing output target.
///
/// Formatting itself never fails: unknown directives are skipped and a short
/// buffer only truncates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A directive needed an argument but the list was exhausted.
    #[error("missing argument {index}")]
    MissingArg { index: usize },
    /// The argument at `index` cannot be read as the directive requires.
    #[error("expected {expected} for argument {index}")]
    BadArg { index: usize, expected: &'static str },
    /// The [`fmt::Write`] target reported an error.
    #[error("formatter error")]
    Write(#[from] fmt::Error),
}
