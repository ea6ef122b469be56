//! Value type descriptors and the compatibility lattice.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable descriptor of how a byte string decodes to a typed value.
///
/// Collection variants carry their element (and value) types; a collection
/// column lives in the table's collection overlay, not in a key component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// US-ASCII string
    Ascii,
    /// UTF-8 string
    Text,
    /// Raw bytes, accepts any encoding
    Blob,
    /// Boolean
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// Arbitrary-precision integer
    VarInt,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Arbitrary-precision decimal
    Decimal,
    /// Microseconds since epoch
    Timestamp,
    /// Random UUID
    Uuid,
    /// Time-based (v1) UUID
    TimeUuid,
    /// Distributed counter; sealed off from the rest of the lattice
    Counter,
    /// Unordered collection of elements
    Set(Box<ValueType>),
    /// Ordered collection of elements
    List(Box<ValueType>),
    /// Key-value collection
    Map(Box<ValueType>, Box<ValueType>),
}

impl ValueType {
    /// True for set/list/map types.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ValueType::Set(_) | ValueType::List(_) | ValueType::Map(_, _)
        )
    }

    /// True for the counter type.
    pub fn is_counter(&self) -> bool {
        matches!(self, ValueType::Counter)
    }

    /// CQL-style display name, e.g. `bigint` or `set<text>`.
    pub fn cql_name(&self) -> String {
        match self {
            ValueType::Ascii => "ascii".to_string(),
            ValueType::Text => "text".to_string(),
            ValueType::Blob => "blob".to_string(),
            ValueType::Boolean => "boolean".to_string(),
            ValueType::Int => "int".to_string(),
            ValueType::BigInt => "bigint".to_string(),
            ValueType::VarInt => "varint".to_string(),
            ValueType::Float => "float".to_string(),
            ValueType::Double => "double".to_string(),
            ValueType::Decimal => "decimal".to_string(),
            ValueType::Timestamp => "timestamp".to_string(),
            ValueType::Uuid => "uuid".to_string(),
            ValueType::TimeUuid => "timeuuid".to_string(),
            ValueType::Counter => "counter".to_string(),
            ValueType::Set(e) => format!("set<{}>", e.cql_name()),
            ValueType::List(e) => format!("list<{}>", e.cql_name()),
            ValueType::Map(k, v) => format!("map<{}, {}>", k.cql_name(), v.cql_name()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cql_name())
    }
}

/// Compatibility check over the value-type lattice.
///
/// Returns true iff every byte string produced by encoding under `old`
/// decodes under `new` to the same logical value. The relation is a partial
/// order, not equality: widening is allowed, narrowing is not, and nothing
/// crosses unrelated type families. Counters are only compatible with
/// themselves.
pub fn is_compatible(old: &ValueType, new: &ValueType) -> bool {
    if old == new {
        return true;
    }
    match (old, new) {
        // Counters never widen to or from anything.
        (ValueType::Counter, _) | (_, ValueType::Counter) => false,
        // Blob accepts any encoding.
        (_, ValueType::Blob) => true,
        // Every ascii string is valid utf-8.
        (ValueType::Ascii, ValueType::Text) => true,
        // Integer widening only.
        (ValueType::Int, ValueType::BigInt)
        | (ValueType::Int, ValueType::VarInt)
        | (ValueType::BigInt, ValueType::VarInt) => true,
        (ValueType::Float, ValueType::Double) => true,
        // Both are 8-byte epoch-relative encodings.
        (ValueType::BigInt, ValueType::Timestamp) | (ValueType::Timestamp, ValueType::BigInt) => {
            true
        }
        (ValueType::TimeUuid, ValueType::Uuid) => true,
        (ValueType::Set(a), ValueType::Set(b)) | (ValueType::List(a), ValueType::List(b)) => {
            is_compatible(a, b)
        }
        (ValueType::Map(ka, va), ValueType::Map(kb, vb)) => {
            is_compatible(ka, kb) && is_compatible(va, vb)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_compatible() {
        for ty in [
            ValueType::Text,
            ValueType::Counter,
            ValueType::Set(Box::new(ValueType::Int)),
        ] {
            assert!(is_compatible(&ty, &ty));
        }
    }

    #[test]
    fn test_integer_widening() {
        assert!(is_compatible(&ValueType::Int, &ValueType::BigInt));
        assert!(is_compatible(&ValueType::Int, &ValueType::VarInt));
        assert!(is_compatible(&ValueType::BigInt, &ValueType::VarInt));
        // Narrowing is rejected.
        assert!(!is_compatible(&ValueType::BigInt, &ValueType::Int));
        assert!(!is_compatible(&ValueType::VarInt, &ValueType::BigInt));
    }

    #[test]
    fn test_unrelated_families_are_incompatible() {
        assert!(!is_compatible(&ValueType::Text, &ValueType::Int));
        assert!(!is_compatible(&ValueType::Boolean, &ValueType::Int));
        assert!(!is_compatible(&ValueType::Double, &ValueType::Float));
    }

    #[test]
    fn test_blob_accepts_everything_but_counter() {
        assert!(is_compatible(&ValueType::Text, &ValueType::Blob));
        assert!(is_compatible(&ValueType::Uuid, &ValueType::Blob));
        assert!(!is_compatible(&ValueType::Counter, &ValueType::Blob));
        assert!(!is_compatible(&ValueType::Blob, &ValueType::Text));
    }

    #[test]
    fn test_text_and_uuid_families() {
        assert!(is_compatible(&ValueType::Ascii, &ValueType::Text));
        assert!(!is_compatible(&ValueType::Text, &ValueType::Ascii));
        assert!(is_compatible(&ValueType::TimeUuid, &ValueType::Uuid));
        assert!(!is_compatible(&ValueType::Uuid, &ValueType::TimeUuid));
    }

    #[test]
    fn test_collections_widen_by_element() {
        let set_ascii = ValueType::Set(Box::new(ValueType::Ascii));
        let set_text = ValueType::Set(Box::new(ValueType::Text));
        let set_int = ValueType::Set(Box::new(ValueType::Int));
        assert!(is_compatible(&set_ascii, &set_text));
        assert!(!is_compatible(&set_text, &set_int));
        // Kind must match.
        let list_text = ValueType::List(Box::new(ValueType::Text));
        assert!(!is_compatible(&set_text, &list_text));

        let map_old = ValueType::Map(Box::new(ValueType::Int), Box::new(ValueType::Ascii));
        let map_new = ValueType::Map(Box::new(ValueType::BigInt), Box::new(ValueType::Text));
        assert!(is_compatible(&map_old, &map_new));
        assert!(!is_compatible(&map_new, &map_old));
    }

    #[test]
    fn test_cql_names() {
        assert_eq!(ValueType::BigInt.to_string(), "bigint");
        assert_eq!(
            ValueType::Map(Box::new(ValueType::Text), Box::new(ValueType::Int)).to_string(),
            "map<text, int>"
        );
        assert_eq!(
            ValueType::Set(Box::new(ValueType::Text)).cql_name(),
            "set<text>"
        );
    }
}
