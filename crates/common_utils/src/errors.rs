//! Errors and error specific types for universal use

/// Custom Result
/// Used for capturing the error with the context of the error stack
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Parsing Errors
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to parse struct: {0}")]
    StructParseFailure(&'static str),
    #[error("Failed to serialize to {0} format")]
    EncodeError(&'static str),
    #[error("Failed to parse {0} as an enum variant")]
    EnumParseFailure(&'static str),
}

/// Monetary amount conversion errors.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AmountConversionError {
    #[error("Amount is not a finite number")]
    NonFiniteAmount,
    #[error("Amount {0} overflows the provider's minor-unit range")]
    MinorUnitOverflow(f64),
    #[error("Failed to parse decimal string amount: {0}")]
    DecimalParseFailure(String),
}
