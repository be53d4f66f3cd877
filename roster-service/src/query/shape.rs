//! Field-level response shaping
//!
//! Projects records onto the subset of fields a client asked for. The field
//! string is a comma-separated list of names, matched case-insensitively
//! against the entity's registry. Output always follows registry order, and
//! the identifier is included whenever an explicit subset is selected. An
//! empty string, or one that names nothing known, selects every field.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::fields::{FieldDef, FieldRegistry, FieldValue, Fields};

/// An ordered mapping of field name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedEntity {
    fields: Vec<(&'static str, FieldValue)>,
}

impl ShapedEntity {
    /// Look up a value by field name, ignoring case
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Field names, in output order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    /// Name/value pairs, in output order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether no fields are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ShapedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A resolved set of fields to project
///
/// Resolve once per request, then shape any number of records with it.
pub struct FieldSelection<'a, T> {
    fields: Vec<&'a FieldDef<T>>,
    full: bool,
}

impl<T: Fields> FieldSelection<'static, T> {
    /// Resolve a field string against `T`'s registry
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::resolve(T::registry(), raw)
    }
}

impl<'a, T> FieldSelection<'a, T> {
    /// Resolve a field string against an explicit registry
    pub fn resolve(registry: &'a FieldRegistry<T>, raw: &str) -> Self {
        let mut requested = HashSet::new();
        for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            match registry.position(name) {
                Some(index) => {
                    requested.insert(index);
                }
                None => tracing::debug!(
                    entity = registry.entity(),
                    field = name,
                    "Ignoring unknown field in selection"
                ),
            }
        }

        if requested.is_empty() {
            return Self {
                fields: registry.fields().iter().collect(),
                full: true,
            };
        }

        requested.insert(registry.identifier_index());
        let fields = registry
            .fields()
            .iter()
            .enumerate()
            .filter(|(index, _)| requested.contains(index))
            .map(|(_, field)| field)
            .collect();

        Self {
            fields,
            full: false,
        }
    }

    /// Whether every registered field is selected
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.full
    }

    /// Selected field names, in output order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name())
    }

    /// Project one record
    pub fn shape(&self, record: &T) -> ShapedEntity {
        ShapedEntity {
            fields: self
                .fields
                .iter()
                .map(|field| (field.name(), field.value(record)))
                .collect(),
        }
    }

    /// Project many records, preserving their order
    pub fn shape_all(&self, records: &[T]) -> Vec<ShapedEntity> {
        records.iter().map(|record| self.shape(record)).collect()
    }
}

/// Shape a sequence of records by a field string
pub fn shape<T: Fields>(records: &[T], fields: &str) -> Vec<ShapedEntity> {
    FieldSelection::parse(fields).shape_all(records)
}

/// Shape a single record by a field string
pub fn shape_one<T: Fields>(record: &T, fields: &str) -> ShapedEntity {
    FieldSelection::parse(fields).shape(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fields::tests::Person;

    fn ada() -> Person {
        Person::new(7, "Ada", 36)
    }

    fn keys(entity: &ShapedEntity) -> Vec<&'static str> {
        entity.keys().collect()
    }

    #[test]
    fn test_subset_includes_identifier() {
        let shaped = shape_one(&ada(), "name");
        assert_eq!(keys(&shaped), vec!["id", "name"]);
        assert_eq!(shaped.get("name"), Some(&FieldValue::from("Ada")));
        assert_eq!(shaped.get("ID"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn test_empty_selects_everything() {
        assert_eq!(keys(&shape_one(&ada(), "")), vec!["id", "name", "age"]);
        assert_eq!(keys(&shape_one(&ada(), " , ,")), vec!["id", "name", "age"]);
    }

    #[test]
    fn test_unknown_only_selects_everything() {
        let selection = FieldSelection::<Person>::parse("bogus");
        assert!(selection.is_full());
        assert_eq!(keys(&selection.shape(&ada())), vec!["id", "name", "age"]);
    }

    #[test]
    fn test_output_follows_registry_order() {
        let shaped = shape_one(&ada(), "age, NAME");
        assert_eq!(keys(&shaped), vec!["id", "name", "age"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let selection = FieldSelection::<Person>::parse("age,Age, age ");
        assert!(!selection.is_full());
        assert_eq!(selection.names().collect::<Vec<_>>(), vec!["id", "age"]);
    }

    #[test]
    fn test_unknown_names_are_dropped_from_subset() {
        let shaped = shape_one(&ada(), "age,salary");
        assert_eq!(keys(&shaped), vec!["id", "age"]);
    }

    #[test]
    fn test_shape_many_uses_same_selection() {
        let people = vec![Person::new(1, "A", 20), Person::new(2, "B", 30)];
        let shaped = shape(&people, "age");
        assert_eq!(shaped.len(), 2);
        assert!(shaped.iter().all(|entity| entity.len() == 2));
        assert_eq!(shaped[1].get("age"), Some(&FieldValue::Int(30)));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let json = serde_json::to_string(&shape_one(&ada(), "age")).unwrap();
        assert_eq!(json, r#"{"id":7,"age":36}"#);
    }
}
