use async_trait::async_trait;
use tracing::{debug, warn};

use strata_core::{
    Interceptor, Mutation, MutationOutcome, Next, PipelineError, RequestContext,
};

/// Pipeline stage that stamps "who performed this change" onto every create
/// and update.
///
/// On create, both `created_by` and `updated_by` are set to the resolved
/// actor; on update (single or bulk), only `updated_by` is written, which
/// keeps `created_by` immutable after creation. Other operation kinds pass
/// through unstamped. The actor is resolved from the request context,
/// degrading to [`strata_core::UNKNOWN_ACTOR`] when absent.
///
/// Attaching this interceptor to a record type that does not expose the
/// audit capability is a configuration error: the mutation fails with
/// [`PipelineError::CapabilityMismatch`] before reaching storage, and the
/// rest of the chain never runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditInterceptor;

impl AuditInterceptor {
    /// Create the interceptor. Stateless; a single instance may be shared
    /// across record types and concurrent pipeline invocations.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Interceptor for AuditInterceptor {
    async fn intercept(
        &self,
        ctx: &RequestContext,
        mutation: &mut dyn Mutation,
        next: Next<'_>,
    ) -> Result<MutationOutcome, PipelineError> {
        let op = mutation.operation();
        // Resolving the actor never fails; absence degrades to the sentinel.
        let actor = ctx.actor_or_unknown().to_owned();

        {
            let record_type = mutation.record_type().to_owned();
            let Some(fields) = mutation.audit_fields() else {
                warn!(
                    %record_type,
                    "audit interceptor attached to record type without audit fields"
                );
                return Err(PipelineError::CapabilityMismatch { record_type });
            };

            if op.is_create() {
                fields.set_created_by(&actor);
                fields.set_updated_by(&actor);
                debug!(%record_type, %op, %actor, "stamped created_by and updated_by");
            } else if op.is_update() {
                // created_by is left untouched: immutable after creation.
                fields.set_updated_by(&actor);
                debug!(%record_type, %op, %actor, "stamped updated_by");
            }
        }

        next.run(ctx, mutation).await
    }
}
