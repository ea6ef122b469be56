//! The StrataDB value-type system.
//!
//! Value types describe how a byte string decodes to a typed value; they form
//! a compatibility partial order used to gate column type changes. Composite
//! types are fixed-order concatenations of independently typed components.

mod composite;
mod value_type;

pub use composite::{CompositeType, KeyValidator};
pub use value_type::{is_compatible, ValueType};
