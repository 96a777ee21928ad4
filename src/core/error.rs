use thiserror::Error;

/// Reasons a line of text cannot become a ledger item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Nothing to add: the item description is empty")]
    EmptyInput,

    /// No metal name or element symbol was found. Blocks the item entirely.
    #[error(
        "Could not detect metal type in \"{0}\". Please specify gold, silver, platinum, or palladium."
    )]
    NoMetalDetected(String),
}
