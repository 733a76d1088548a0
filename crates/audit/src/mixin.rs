use std::sync::Arc;

use strata_schema::{FieldDef, IndexDef, SchemaMixin};

use crate::interceptor::AuditInterceptor;

/// Mixin declaring the audit surface of a record type: optional
/// `created_by` (immutable) and `updated_by` fields, a single-field index on
/// each, and the stamping hook.
#[must_use]
pub fn audit_mixin() -> SchemaMixin {
    SchemaMixin {
        fields: vec![
            FieldDef::text("created_by").immutable(),
            FieldDef::text("updated_by"),
        ],
        indexes: vec![IndexDef::on(["created_by"]), IndexDef::on(["updated_by"])],
        hooks: vec![Arc::new(AuditInterceptor::new())],
    }
}

#[cfg(test)]
mod tests {
    use strata_schema::RecordSchema;

    use super::*;

    #[test]
    fn declares_fields_indexes_and_hook() {
        let mixin = audit_mixin();
        assert_eq!(mixin.fields.len(), 2);
        assert_eq!(mixin.indexes.len(), 2);
        assert_eq!(mixin.hooks.len(), 1);

        let created_by = &mixin.fields[0];
        assert_eq!(created_by.name, "created_by");
        assert!(created_by.immutable);
        assert!(!created_by.required);

        let updated_by = &mixin.fields[1];
        assert_eq!(updated_by.name, "updated_by");
        assert!(!updated_by.immutable);
    }

    #[test]
    fn composes_into_a_record_schema() {
        let schema = RecordSchema::new("server").with_mixin(audit_mixin());
        assert!(schema.field("created_by").is_some());
        assert!(schema.field("updated_by").is_some());
        assert_eq!(schema.hooks().len(), 1);
    }
}
