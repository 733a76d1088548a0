use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of write a [`Mutation`](crate::Mutation) represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Insert a new row.
    Create,
    /// Update a single row.
    UpdateOne,
    /// Update many rows matching a predicate.
    Update,
    /// Delete a single row.
    DeleteOne,
    /// Delete many rows matching a predicate.
    Delete,
}

impl Operation {
    /// Whether this operation inserts a new row.
    #[must_use]
    pub fn is_create(self) -> bool {
        matches!(self, Self::Create)
    }

    /// Whether this operation modifies existing rows (single or bulk).
    #[must_use]
    pub fn is_update(self) -> bool {
        matches!(self, Self::UpdateOne | Self::Update)
    }

    /// Whether this operation removes rows (single or bulk).
    #[must_use]
    pub fn is_delete(self) -> bool {
        matches!(self, Self::DeleteOne | Self::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::UpdateOne => "update_one",
            Self::Update => "update",
            Self::DeleteOne => "delete_one",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}
