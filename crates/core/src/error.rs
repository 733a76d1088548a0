use thiserror::Error;

/// Errors surfaced by a mutation pipeline to its caller.
///
/// None of these trigger automatic retry; retries, if any, belong to the
/// storage layer below this crate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An interceptor was attached to a record type that does not expose the
    /// capability it requires. This is a configuration error and aborts the
    /// mutation before it reaches storage; it should be caught during
    /// integration, not at runtime in production.
    #[error("record type '{record_type}' does not expose audit fields")]
    CapabilityMismatch {
        /// The offending record type.
        record_type: String,
    },

    /// A field value on the mutation failed validation. Returned to the
    /// caller as a rejected-input error, never masked.
    #[error("validation error: {0}")]
    Validation(String),

    /// The enclosing request context was cancelled before the chain
    /// completed.
    #[error("request cancelled")]
    Cancelled,

    /// The terminal stage failed to commit the write.
    #[error("storage error: {0}")]
    Storage(String),
}
