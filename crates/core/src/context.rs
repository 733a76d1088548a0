use tokio_util::sync::CancellationToken;

/// Sentinel actor recorded when no authenticated identity is present.
///
/// Unauthenticated or system-initiated mutations still succeed with this
/// traceable marker instead of failing.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Request-scoped context threaded through a mutation pipeline.
///
/// Carries the authenticated actor identifier (set once at the
/// authentication boundary, read-only afterwards) and a cancellation token
/// for the enclosing request. Cloning is cheap; clones share the same
/// cancellation token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    actor: Option<String>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a context with no actor and a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authenticated actor identifier (e.g. the subject claim of a
    /// verified token).
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Look up the actor identifier.
    ///
    /// Pure read; never blocks and never fails. Absence simply yields
    /// `None`. A cancelled context still returns whatever value was stored.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// The actor identifier, or [`UNKNOWN_ACTOR`] when absent.
    #[must_use]
    pub fn actor_or_unknown(&self) -> &str {
        self.actor.as_deref().unwrap_or(UNKNOWN_ACTOR)
    }

    /// Cancellation token for the enclosing request.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether the enclosing request has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
