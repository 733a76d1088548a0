pub mod context;
pub mod error;
pub mod mutation;
pub mod operation;
pub mod pipeline;

pub use context::{RequestContext, UNKNOWN_ACTOR};
pub use error::PipelineError;
pub use mutation::{AuditFields, Mutation};
pub use operation::Operation;
pub use pipeline::{Interceptor, MutationOutcome, Mutator, Next, Pipeline};
