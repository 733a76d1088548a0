use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::PipelineError;
use crate::mutation::Mutation;

/// Whatever the terminal stage returns for the committed write (typically the
/// persisted row rendered as JSON).
pub type MutationOutcome = serde_json::Value;

/// The terminal stage of a pipeline: commits the pending write to storage.
///
/// Implementations must be `Send + Sync` to be shared across concurrent
/// pipeline invocations.
#[async_trait]
pub trait Mutator: Send + Sync {
    /// Commit the mutation and return its outcome.
    async fn mutate(
        &self,
        ctx: &RequestContext,
        mutation: &mut dyn Mutation,
    ) -> Result<MutationOutcome, PipelineError>;
}

/// A pipeline stage that observes, and may transform, a pending write before
/// it is committed.
///
/// Interceptors run in registration order. Each decides whether to delegate
/// to the remainder of the chain via [`Next::run`]; returning an error
/// without delegating aborts the mutation before it reaches storage.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Process the mutation, delegating to `next` to continue the chain.
    async fn intercept(
        &self,
        ctx: &RequestContext,
        mutation: &mut dyn Mutation,
        next: Next<'_>,
    ) -> Result<MutationOutcome, PipelineError>;
}

/// Handle to the remainder of a pipeline: the interceptors that have not yet
/// run, plus the terminal stage.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    terminal: &'a dyn Mutator,
}

impl Next<'_> {
    /// Run the rest of the chain to completion.
    ///
    /// Short-circuits with [`PipelineError::Cancelled`] when the enclosing
    /// request context has been cancelled, so cancellation propagates and
    /// terminates the chain without reaching storage.
    pub async fn run(
        self,
        ctx: &RequestContext,
        mutation: &mut dyn Mutation,
    ) -> Result<MutationOutcome, PipelineError> {
        if ctx.is_cancelled() {
            debug!(
                record_type = mutation.record_type(),
                "pipeline aborted: request cancelled"
            );
            return Err(PipelineError::Cancelled);
        }

        match self.interceptors.split_first() {
            Some((head, rest)) => {
                head.intercept(
                    ctx,
                    mutation,
                    Next {
                        interceptors: rest,
                        terminal: self.terminal,
                    },
                )
                .await
            }
            None => self.terminal.mutate(ctx, mutation).await,
        }
    }
}

/// An ordered chain of interceptors applied to every mutation before it is
/// handed to a terminal stage.
///
/// Each mutation is processed synchronously by one chain to completion;
/// concurrent mutations are independent invocations sharing no mutable
/// state.
#[derive(Clone, Default)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from an existing hook list (e.g. the hooks declared
    /// on a record schema).
    #[must_use]
    pub fn from_hooks(hooks: Vec<Arc<dyn Interceptor>>) -> Self {
        Self {
            interceptors: hooks,
        }
    }

    /// Append an interceptor to the end of the chain.
    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.push(interceptor);
        self
    }

    /// Number of interceptors in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run the mutation through every interceptor and then the terminal
    /// stage, propagating the terminal's outcome unchanged.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        mutation: &mut dyn Mutation,
        terminal: &dyn Mutator,
    ) -> Result<MutationOutcome, PipelineError> {
        Next {
            interceptors: &self.interceptors,
            terminal,
        }
        .run(ctx, mutation)
        .await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::operation::Operation;

    struct TestMutation;

    impl Mutation for TestMutation {
        fn record_type(&self) -> &str {
            "widget"
        }

        fn operation(&self) -> Operation {
            Operation::Create
        }
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Interceptor for Recorder {
        async fn intercept(
            &self,
            ctx: &RequestContext,
            mutation: &mut dyn Mutation,
            next: Next<'_>,
        ) -> Result<MutationOutcome, PipelineError> {
            self.log.lock().unwrap().push(self.label);
            next.run(ctx, mutation).await
        }
    }

    struct CountingTerminal {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Mutator for CountingTerminal {
        async fn mutate(
            &self,
            _ctx: &RequestContext,
            _mutation: &mut dyn Mutation,
        ) -> Result<MutationOutcome, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!({"committed": true}))
        }
    }

    #[tokio::test]
    async fn interceptors_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with_interceptor(Arc::new(Recorder {
                label: "first",
                log: Arc::clone(&log),
            }))
            .with_interceptor(Arc::new(Recorder {
                label: "second",
                log: Arc::clone(&log),
            }));
        let terminal = CountingTerminal {
            calls: AtomicUsize::new(0),
        };

        let ctx = RequestContext::new();
        let mut mutation = TestMutation;
        let outcome = pipeline
            .execute(&ctx, &mut mutation, &terminal)
            .await
            .unwrap();

        assert_eq!(outcome["committed"], true);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(terminal.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_pipeline_reaches_terminal() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        let terminal = CountingTerminal {
            calls: AtomicUsize::new(0),
        };

        let ctx = RequestContext::new();
        let mut mutation = TestMutation;
        pipeline
            .execute(&ctx, &mut mutation, &terminal)
            .await
            .unwrap();
        assert_eq!(terminal.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_short_circuits_before_terminal() {
        let pipeline = Pipeline::new();
        let terminal = CountingTerminal {
            calls: AtomicUsize::new(0),
        };

        let ctx = RequestContext::new();
        ctx.cancellation().cancel();
        let mut mutation = TestMutation;
        let err = pipeline
            .execute(&ctx, &mut mutation, &terminal)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(terminal.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn terminal_error_propagates_unchanged() {
        struct FailingTerminal;

        #[async_trait]
        impl Mutator for FailingTerminal {
            async fn mutate(
                &self,
                _ctx: &RequestContext,
                _mutation: &mut dyn Mutation,
            ) -> Result<MutationOutcome, PipelineError> {
                Err(PipelineError::Storage("connection reset".into()))
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new().with_interceptor(Arc::new(Recorder {
            label: "observer",
            log: Arc::clone(&log),
        }));

        let ctx = RequestContext::new();
        let mut mutation = TestMutation;
        let err = pipeline
            .execute(&ctx, &mut mutation, &FailingTerminal)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Storage(msg) if msg == "connection reset"));
        assert_eq!(*log.lock().unwrap(), vec!["observer"]);
    }
}
