//! Composite types: ordered sequences of value types.
//!
//! A byte string encoding a composite value concatenates per-component
//! length-prefixed encodings in component order, so component count and order
//! are load-bearing. Edits never mutate in place: every edit produces a new
//! sequence, leaving prior schema snapshots untouched.

use crate::errors::CommonError;
use crate::models::types::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable ordered sequence of value types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeType {
    components: Vec<ValueType>,
}

impl CompositeType {
    /// Creates a composite from its ordered components.
    pub fn new(components: Vec<ValueType>) -> Self {
        Self { components }
    }

    /// The ordered components.
    pub fn components(&self) -> &[ValueType] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when the composite has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The component at `index`, if any.
    pub fn component(&self, index: usize) -> Option<&ValueType> {
        self.components.get(index)
    }

    /// Returns a new composite with `ty` at `index`.
    ///
    /// Replaces in place when `index < len`, appends when `index == len`.
    /// Any larger index would leave an undefined gap and is rejected.
    pub fn with_component(&self, index: usize, ty: ValueType) -> Result<Self, CommonError> {
        if index > self.components.len() {
            return Err(CommonError::invalid_input(format!(
                "component index {} out of bounds for composite of {} component(s)",
                index,
                self.components.len()
            )));
        }
        let mut components = self.components.clone();
        if index == components.len() {
            components.push(ty);
        } else {
            components[index] = ty;
        }
        Ok(Self { components })
    }
}

impl fmt::Display for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.components.iter().map(|t| t.cql_name()).collect();
        write!(f, "composite({})", names.join(", "))
    }
}

/// The partition key type of a table: a single value type for simple keys,
/// a composite for multi-component keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyValidator {
    Single(ValueType),
    Composite(CompositeType),
}

impl KeyValidator {
    /// Number of partition key slots.
    pub fn slot_count(&self) -> usize {
        match self {
            KeyValidator::Single(_) => 1,
            KeyValidator::Composite(c) => c.len(),
        }
    }

    /// True for multi-component partition keys.
    pub fn is_composite(&self) -> bool {
        matches!(self, KeyValidator::Composite(_))
    }

    /// The value type at slot `index`, if any.
    pub fn component(&self, index: usize) -> Option<&ValueType> {
        match self {
            KeyValidator::Single(ty) => (index == 0).then_some(ty),
            KeyValidator::Composite(c) => c.component(index),
        }
    }

    /// Returns a new validator with `ty` at slot `index`.
    pub fn with_component(&self, index: usize, ty: ValueType) -> Result<Self, CommonError> {
        match self {
            KeyValidator::Single(_) => {
                if index != 0 {
                    return Err(CommonError::invalid_input(format!(
                        "slot {} out of bounds for a single-component partition key",
                        index
                    )));
                }
                Ok(KeyValidator::Single(ty))
            }
            KeyValidator::Composite(c) => Ok(KeyValidator::Composite(c.with_component(index, ty)?)),
        }
    }
}
