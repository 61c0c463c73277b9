//! Error handling for the operation tree and its transformations
//!
//! Structural misuse of the tree is logged where it happens and returned as
//! a value; the tree is left untouched. Scheduling problems are reported the
//! same way once the affected plan has been written back without losing any
//! geometry.

use printplan_settings::SettingsError;
use thiserror::Error;

/// Operation tree error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The operation is not a child of the sequence it was removed from
    #[error("Operation is not a child of this sequence")]
    NotAChild,

    /// Open sequences have a fixed start and cannot be rotated
    #[error("Cannot reorder an open move sequence")]
    OpenSequenceReorder,

    /// Reversal is only defined for open sequences
    #[error("Reversing a closed move sequence is not supported")]
    ClosedSequenceReverse,

    /// The reorder target is not a move of the sequence
    #[error("Move is not part of this sequence")]
    MoveNotInSequence,

    /// A sequence operation was requested on a move
    #[error("Operation is not a sequence")]
    NotASequence,

    /// Reordering and reversal only apply to continuous move sequences
    #[error("Operation is not a continuous move sequence")]
    NotAContinuousSequence,

    /// The operation is the sequence itself or one of its ancestors
    #[error("Operation cannot be appended to itself or to one of its descendants")]
    CycleDetected,
}

/// Result type alias for operation tree manipulation.
pub type OperationResult<T> = Result<T, OperationError>;

/// Scheduler error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// No remaining item could be processed; ordering constraints contradict each other
    #[error("Scheduling deadlock with {remaining} item(s) left unordered")]
    Deadlock {
        /// Number of items appended in input order after the deadlock.
        remaining: usize,
    },

    /// Tree manipulation failed while scheduling
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),
}

/// Result type alias for scheduling.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Transformer error type
#[derive(Error, Debug)]
pub enum TransformError {
    /// The transformer cannot work on this kind of operation
    #[error("Transformer '{name}' cannot process {operation}")]
    UnsupportedOperation {
        /// Transformer name.
        name: String,
        /// Description of the rejected operation.
        operation: String,
    },

    /// No transformer is registered under this name
    #[error("Unknown transformer: {0}")]
    UnknownTransformer(String),

    /// Scheduling failed
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Tree manipulation failed
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    /// A required setting is missing or invalid
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Result type alias for transformers.
pub type TransformResult<T> = Result<T, TransformError>;
