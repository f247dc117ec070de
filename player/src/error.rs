use thiserror::Error;

/// Failures reported back to the operator
///
/// None of them is fatal, the operator retries by reissuing the command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("memblock ID: {id} out of range, max is {max}")]
    OutOfRange { id: usize, max: usize },
    #[error("offset {offset} is past the end of a {size} byte memblock")]
    OffsetOutOfRange { offset: usize, size: usize },
    #[error("unable to allocate {size} bytes")]
    AllocFailure { size: usize },
    #[error("memblock {id} is in use by an active stream")]
    BlockBusy { id: usize },
    #[error("unrecognized operand")]
    UnrecognizedOperand,
    #[error("invalid operand value")]
    InvalidValue,
    #[error("command not found")]
    UnknownCommand,
    #[error("unsupported stream header")]
    InvalidHeader,
}
