pub mod interceptor;
pub mod mixin;

pub use interceptor::AuditInterceptor;
pub use mixin::audit_mixin;
