//! Record Module
//!
//! Catalog entries as stored on disk, and the unvalidated draft a write starts from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};

// == Record ==
/// One catalog entry. `id` is assigned by the store and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl Record {
    /// Checks the invariants a persisted record must hold.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.name.is_empty() && !self.category.is_empty() && self.price.is_finite()
    }
}

// == Record Draft ==
/// Candidate record as received from a caller, before validation.
///
/// Fields are kept as raw JSON values so that a wrongly typed field is
/// reported as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
}

impl RecordDraft {
    /// Builds a draft from already-typed values.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            category: Some(Value::String(category.into())),
            price: serde_json::Number::from_f64(price).map(Value::Number),
        }
    }

    // == Validate ==
    /// Checks required fields and returns the typed record body.
    pub fn validate(self) -> Result<NewRecord> {
        let name = required_text(self.name, "name")?;
        let category = required_text(self.category, "category")?;
        let price = match self.price {
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        }
        .ok_or_else(|| CatalogError::Validation("price must be a number".to_string()))?;

        Ok(NewRecord {
            name,
            category,
            price,
        })
    }
}

fn required_text(value: Option<Value>, field: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::String(_)) => Err(CatalogError::Validation(format!(
            "{} must not be empty",
            field
        ))),
        Some(_) => Err(CatalogError::Validation(format!(
            "{} must be a string",
            field
        ))),
        None => Err(CatalogError::Validation(format!("{} is required", field))),
    }
}

// == New Record ==
/// A validated record body still waiting for its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl NewRecord {
    pub fn with_id(self, id: u64) -> Record {
        Record {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
        }
    }
}
