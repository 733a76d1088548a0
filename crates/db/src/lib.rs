pub mod config;

pub use config::{ConnectionConfig, ConnectionLimits, DbConfigError};
