//! Entity trait for typed tables.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use txscope_store::ItemKey;

/// Trait for types that can be written through a [`super::Table`].
///
/// Implementors provide the item key; the attributes are produced from
/// the `Serialize` implementation.
///
/// # Example
///
/// ```rust
/// use serde::Serialize;
/// use txscope_core::Entity;
/// use txscope_store::ItemKey;
///
/// #[derive(Serialize)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// impl Entity for User {
///     fn key(&self) -> ItemKey {
///         ItemKey::partition(self.id.clone())
///     }
/// }
/// ```
pub trait Entity: Serialize {
    /// Returns the primary key of this entity.
    ///
    /// The key must not change over the entity's lifetime.
    fn key(&self) -> ItemKey;

    /// Encodes the entity's attributes to CBOR bytes.
    ///
    /// The encoding is deterministic: identical entities produce identical
    /// bytes.
    fn encode(&self) -> CoreResult<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes).map_err(|e| CoreError::codec(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::Value;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct TestEntity {
        partition_key: String,
        value: String,
    }

    impl Entity for TestEntity {
        fn key(&self) -> ItemKey {
            ItemKey::partition(self.partition_key.clone())
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let entity = TestEntity {
            partition_key: "key1".into(),
            value: "val1".into(),
        };
        assert_eq!(entity.encode().unwrap(), entity.clone().encode().unwrap());
    }

    #[test]
    fn encode_produces_cbor_map() {
        let entity = TestEntity {
            partition_key: "key1".into(),
            value: "val1".into(),
        };

        let bytes = entity.encode().unwrap();
        let value: Value = ciborium::from_reader(bytes.as_slice()).unwrap();
        let map = value.as_map().expect("expected map");

        let value_field = map
            .iter()
            .find(|(k, _)| k.as_text() == Some("value"))
            .and_then(|(_, v)| v.as_text());
        assert_eq!(value_field, Some("val1"));
    }
}
