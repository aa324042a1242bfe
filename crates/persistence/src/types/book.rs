//! The `Book` resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A book stored in a tenant namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Identifier assigned by the namespace, starting at 1.
    pub id: i64,
    /// Title of the book.
    pub name: String,
    /// Schema of the owning tenant, recorded at creation.
    pub tenant_schema: String,
    /// When the book was created.
    pub created_at: DateTime<Utc>,
    /// When the book was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    /// Title of the book.
    pub name: String,
}

/// Input for updating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    /// New title; must not be blank.
    pub name: String,
}

fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField {
            field: "name".to_string(),
        });
    }
    Ok(())
}

impl NewBook {
    /// Creates a new book input.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Rejects a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)
    }
}

impl BookUpdate {
    /// Creates a new update input.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Rejects a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_name(&self.name)
    }
}
