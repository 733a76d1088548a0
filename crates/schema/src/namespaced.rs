use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::descriptor::{FieldDef, SchemaMixin};
use crate::error::SchemaError;

/// Minimum allowed namespace length, in bytes.
pub const NAMESPACE_MIN_LEN: usize = 5;
/// Maximum allowed namespace length, in bytes.
pub const NAMESPACE_MAX_LEN: usize = 64;

/// Check that a namespace is non-empty and within the allowed length bounds.
pub fn validate_namespace(namespace: &str) -> Result<(), SchemaError> {
    let length = namespace.len();
    if length < NAMESPACE_MIN_LEN || length > NAMESPACE_MAX_LEN {
        return Err(SchemaError::NamespaceLength { length });
    }
    Ok(())
}

/// One row's namespaced-document field: a bounded-length namespace key and
/// an opaque JSON payload.
///
/// The payload must parse as JSON (any value, including `null`, `{}`, and
/// `[]`) but its content is never interpreted or indexed; once validated it
/// passes through byte-for-byte. Multiple rows may share a namespace - there
/// is no uniqueness constraint at this layer.
///
/// Construction goes through [`NamespacedData::new`], which enforces both
/// invariants; deserialization routes through the same checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NamespacedDataWire")]
pub struct NamespacedData {
    namespace: String,
    data: Box<RawValue>,
}

impl NamespacedData {
    /// Validate and build a namespaced payload.
    pub fn new(namespace: impl Into<String>, data: impl Into<String>) -> Result<Self, SchemaError> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        let data = RawValue::from_string(data.into()).map_err(SchemaError::InvalidJson)?;
        Ok(Self { namespace, data })
    }

    /// The namespace key.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The raw JSON payload.
    #[must_use]
    pub fn data(&self) -> &RawValue {
        &self.data
    }

    /// The payload as raw bytes.
    #[must_use]
    pub fn data_bytes(&self) -> &[u8] {
        self.data.get().as_bytes()
    }
}

#[derive(Deserialize)]
struct NamespacedDataWire {
    namespace: String,
    data: Box<RawValue>,
}

impl TryFrom<NamespacedDataWire> for NamespacedData {
    type Error = SchemaError;

    fn try_from(wire: NamespacedDataWire) -> Result<Self, Self::Error> {
        validate_namespace(&wire.namespace)?;
        Ok(Self {
            namespace: wire.namespace,
            data: wire.data,
        })
    }
}

/// Mixin declaring the `namespace` and `data` fields for record types that
/// embed a namespaced document.
#[must_use]
pub fn namespaced_data_mixin() -> SchemaMixin {
    SchemaMixin {
        fields: vec![
            FieldDef::text("namespace")
                .required()
                .min_len(NAMESPACE_MIN_LEN)
                .max_len(NAMESPACE_MAX_LEN),
            FieldDef::json("data").required(),
        ],
        indexes: Vec::new(),
        hooks: Vec::new(),
    }
}
