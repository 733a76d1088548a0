use crate::operation::Operation;

/// Audit capability a record type opts into by implementing getter/setter
/// pairs for its `created_by` and `updated_by` fields.
///
/// Getters return `None` when the field has not been set on the pending
/// mutation. Both fields are optional in the persisted schema; `created_by`
/// is immutable after creation, which the stamping hook enforces by never
/// writing it on updates.
pub trait AuditFields {
    /// The pending `created_by` value, if set.
    fn created_by(&self) -> Option<&str>;
    /// Set the pending `created_by` value.
    fn set_created_by(&mut self, actor: &str);
    /// The pending `updated_by` value, if set.
    fn updated_by(&self) -> Option<&str>;
    /// Set the pending `updated_by` value.
    fn set_updated_by(&mut self, actor: &str);
}

/// One pending write against a record type, owned by the pipeline for the
/// duration of that write.
pub trait Mutation: Send {
    /// Name of the record type this mutation targets (e.g. `"tenant"`).
    fn record_type(&self) -> &str;

    /// The kind of write this mutation performs.
    fn operation(&self) -> Operation;

    /// View this mutation through the audit capability.
    ///
    /// Record types that carry audit fields override this to return their
    /// accessors. The default returns `None`: not every record type is
    /// auditable, and interceptors that require the capability must treat
    /// its absence as a configuration error.
    fn audit_fields(&mut self) -> Option<&mut dyn AuditFields> {
        None
    }
}
