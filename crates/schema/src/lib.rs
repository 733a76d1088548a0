pub mod descriptor;
pub mod error;
pub mod namespaced;

pub use descriptor::{FieldDef, FieldKind, IndexDef, RecordSchema, SchemaMixin};
pub use error::SchemaError;
pub use namespaced::{
    NAMESPACE_MAX_LEN, NAMESPACE_MIN_LEN, NamespacedData, namespaced_data_mixin,
    validate_namespace,
};
