use std::sync::Arc;

use strata_core::Interceptor;

use crate::error::SchemaError;

/// Storage kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A text column.
    Text,
    /// A JSON blob column.
    Json,
}

/// Declaration of a single persisted field on a record type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Column name.
    pub name: String,
    /// Storage kind.
    pub kind: FieldKind,
    /// Whether the field must be set on creation.
    pub required: bool,
    /// Whether the field may never change after creation.
    pub immutable: bool,
    /// Minimum byte length for text fields.
    pub min_len: Option<usize>,
    /// Maximum byte length for text fields.
    pub max_len: Option<usize>,
}

impl FieldDef {
    /// Declare a text field. Optional and mutable by default.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            required: false,
            immutable: false,
            min_len: None,
            max_len: None,
        }
    }

    /// Declare a JSON field. Optional and mutable by default.
    #[must_use]
    pub fn json(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Json,
            required: false,
            immutable: false,
            min_len: None,
            max_len: None,
        }
    }

    /// Require the field to be set on creation.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Forbid changes to the field after creation.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Set the minimum byte length for a text field.
    #[must_use]
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// Set the maximum byte length for a text field.
    #[must_use]
    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Check a text value against this field's declared constraints.
    pub fn validate_text(&self, value: &str) -> Result<(), SchemaError> {
        if self.required && value.is_empty() {
            return Err(SchemaError::MissingRequired {
                field: self.name.clone(),
            });
        }
        let length = value.len();
        let min = self.min_len.unwrap_or(0);
        let max = self.max_len.unwrap_or(usize::MAX);
        if length < min || length > max {
            return Err(SchemaError::LengthOutOfRange {
                field: self.name.clone(),
                length,
                min,
                max,
            });
        }
        Ok(())
    }

    /// Check that a JSON value parses. The content is not interpreted.
    pub fn validate_json(&self, value: &[u8]) -> Result<(), SchemaError> {
        serde_json::from_slice::<serde::de::IgnoredAny>(value)
            .map(|_| ())
            .map_err(SchemaError::InvalidJson)
    }
}

/// Declaration of a secondary index over one or more fields.
#[derive(Debug, Clone)]
pub struct IndexDef {
    /// Indexed field names, in column order.
    pub fields: Vec<String>,
}

impl IndexDef {
    /// Declare an index over the given fields.
    #[must_use]
    pub fn on<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// The three independent declarations a mixin contributes to a record type:
/// fields, indexes, and mutation hooks. Plain data, composed by
/// [`RecordSchema::with_mixin`]; no inheritance involved.
#[derive(Default)]
pub struct SchemaMixin {
    /// Fields added to the record type.
    pub fields: Vec<FieldDef>,
    /// Indexes added to the record type.
    pub indexes: Vec<IndexDef>,
    /// Hooks appended to the record type's mutation pipeline.
    pub hooks: Vec<Arc<dyn Interceptor>>,
}

impl std::fmt::Debug for SchemaMixin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaMixin")
            .field("fields", &self.fields)
            .field("indexes", &self.indexes)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Descriptor of one record type: its declared fields, indexes, and the
/// hooks its mutations pass through.
#[derive(Default)]
pub struct RecordSchema {
    /// Record type name.
    pub record_type: String,
    /// Declared fields.
    pub fields: Vec<FieldDef>,
    /// Declared indexes.
    pub indexes: Vec<IndexDef>,
    /// Mutation hooks, in execution order.
    pub hooks: Vec<Arc<dyn Interceptor>>,
}

impl RecordSchema {
    /// Create an empty schema for the named record type.
    #[must_use]
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            ..Self::default()
        }
    }

    /// Merge a mixin's declarations into this schema, preserving order.
    #[must_use]
    pub fn with_mixin(mut self, mixin: SchemaMixin) -> Self {
        self.fields.extend(mixin.fields);
        self.indexes.extend(mixin.indexes);
        self.hooks.extend(mixin.hooks);
        self
    }

    /// Add a single field declaration.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field declaration by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The hook list, cloned for handing to a pipeline.
    #[must_use]
    pub fn hooks(&self) -> Vec<Arc<dyn Interceptor>> {
        self.hooks.clone()
    }
}

impl std::fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSchema")
            .field("record_type", &self.record_type)
            .field("fields", &self.fields)
            .field("indexes", &self.indexes)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
