//! Dynamic ordering from client sort strings
//!
//! A sort string is a comma-separated list of clauses, each a field name
//! optionally followed by a direction: `"name desc, age"`. Field names are
//! matched against the entity's [`FieldRegistry`] ignoring case; clauses
//! naming unknown fields are dropped. When nothing valid remains the entity's
//! default sort field is used, ascending.
//!
//! # Example
//!
//! ```rust,ignore
//! let spec = SortSpec::<Employee>::parse("name desc,age");
//! let sorted = spec.sort(employees);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::{FieldDef, FieldRegistry, FieldValue, Fields};

/// Direction of one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison result
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// One resolved sort key
pub struct SortKey<T> {
    field: FieldDef<T>,
    direction: SortDirection,
}

impl<T> SortKey<T> {
    /// Registered name of the sorted field
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.field.name()
    }

    /// Direction of this key
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two records on this key alone
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.direction
            .apply(self.field.value(a).total_cmp(&self.field.value(b)))
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("field", &self.name())
            .field("direction", &self.direction)
            .finish()
    }
}

/// A validated, composite ordering over `T`
pub struct SortSpec<T> {
    keys: Vec<SortKey<T>>,
    fallback: bool,
}

impl<T: Fields> SortSpec<T> {
    /// Parse a client sort string against `T`'s registry
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(T::registry(), raw)
    }

    /// The default ordering of `T`
    #[must_use]
    pub fn by_default() -> Self {
        Self::default_for(T::registry())
    }
}

impl<T> SortSpec<T> {
    /// Parse a client sort string against an explicit registry
    pub fn parse_with(registry: &FieldRegistry<T>, raw: &str) -> Self {
        let mut keys = Vec::new();

        for clause in raw.split(',') {
            let mut tokens = clause.split_whitespace();
            let Some(name) = tokens.next() else {
                continue;
            };

            let Some(field) = registry.find(name) else {
                tracing::debug!(
                    entity = registry.entity(),
                    field = name,
                    "Ignoring sort clause for unknown field"
                );
                continue;
            };

            let direction = match tokens.last() {
                Some(token) if token.eq_ignore_ascii_case("desc") => SortDirection::Descending,
                _ => SortDirection::Ascending,
            };

            keys.push(SortKey {
                field: field.clone(),
                direction,
            });
        }

        if keys.is_empty() {
            return Self::default_for(registry);
        }

        Self {
            keys,
            fallback: false,
        }
    }

    /// Ascending by the registry's default sort field
    pub fn default_for(registry: &FieldRegistry<T>) -> Self {
        Self {
            keys: vec![SortKey {
                field: registry.default_sort().clone(),
                direction: SortDirection::Ascending,
            }],
            fallback: true,
        }
    }

    /// Resolved keys, primary first
    #[must_use]
    pub fn keys(&self) -> &[SortKey<T>] {
        &self.keys
    }

    /// Whether this is the fallback ordering
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.fallback
    }

    /// Compare two records on all keys in order
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sort records, keeping the relative order of equal records
    ///
    /// Key values are read once per record rather than once per comparison.
    #[must_use]
    pub fn sort(&self, records: Vec<T>) -> Vec<T> {
        let mut decorated: Vec<(Vec<FieldValue>, T)> = records
            .into_iter()
            .map(|record| {
                let values = self.keys.iter().map(|key| key.field.value(&record)).collect();
                (values, record)
            })
            .collect();

        decorated.sort_by(|(a, _), (b, _)| self.compare_values(a, b));
        decorated.into_iter().map(|(_, record)| record).collect()
    }

    fn compare_values(&self, a: &[FieldValue], b: &[FieldValue]) -> Ordering {
        self.keys
            .iter()
            .zip(a.iter().zip(b))
            .map(|(key, (a, b))| key.direction.apply(a.total_cmp(b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<T> Clone for SortSpec<T> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            fallback: self.fallback,
        }
    }
}

impl<T> fmt::Debug for SortSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortSpec")
            .field("keys", &self.keys)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Renders as `name desc, age asc`
impl<T> fmt::Display for SortSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", key.name(), key.direction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fields::tests::Person;

    fn people() -> Vec<Person> {
        vec![
            Person::new(1, "Carol", 41),
            Person::new(2, "alice", 30),
            Person::new(3, "Bob", 25),
            Person::new(4, "Carol", 29),
            Person::new(5, "Bob", 52),
        ]
    }

    fn ids(records: &[Person]) -> Vec<i64> {
        records.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_sort_direction_display() {
        assert_eq!(format!("{}", SortDirection::Ascending), "asc");
        assert_eq!(format!("{}", SortDirection::Descending), "desc");
    }

    #[test]
    fn test_sort_direction_default() {
        assert_eq!(SortDirection::default(), SortDirection::Ascending);
    }

    #[test]
    fn test_empty_string_uses_default() {
        let spec = SortSpec::<Person>::parse("");
        assert!(spec.is_default());
        assert_eq!(spec.to_string(), "name asc");
    }

    #[test]
    fn test_unknown_field_falls_back_to_default_order() {
        let bogus = SortSpec::<Person>::parse("bogus");
        let empty = SortSpec::<Person>::parse("");
        assert!(bogus.is_default());
        assert_eq!(ids(&bogus.sort(people())), ids(&empty.sort(people())));
    }

    #[test]
    fn test_unknown_clause_only_drops_that_clause() {
        let spec = SortSpec::<Person>::parse("salary desc, age desc");
        assert!(!spec.is_default());
        assert_eq!(spec.keys().len(), 1);
        assert_eq!(spec.keys()[0].name(), "age");
        assert_eq!(spec.keys()[0].direction(), SortDirection::Descending);
    }

    #[test]
    fn test_case_insensitive_names_and_direction() {
        let spec = SortSpec::<Person>::parse("AGE   DESC");
        assert_eq!(spec.keys()[0].name(), "age");
        assert_eq!(spec.keys()[0].direction(), SortDirection::Descending);
    }

    #[test]
    fn test_extra_whitespace_and_empty_clauses() {
        let spec = SortSpec::<Person>::parse(" ,  name   desc ,, age ,");
        assert_eq!(spec.to_string(), "name desc, age asc");
    }

    #[test]
    fn test_unrecognised_direction_is_ascending() {
        let spec = SortSpec::<Person>::parse("age sideways");
        assert_eq!(spec.keys()[0].direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_multi_key_matches_straightforward_sort() {
        let spec = SortSpec::<Person>::parse("name desc,age");
        let sorted = spec.sort(people());

        let mut expected = people();
        expected.sort_by(|a, b| {
            b.name
                .to_lowercase()
                .cmp(&a.name.to_lowercase())
                .then(a.age.cmp(&b.age))
        });

        assert_eq!(ids(&sorted), ids(&expected));
        assert_eq!(ids(&sorted), vec![4, 1, 3, 5, 2]);
    }

    #[test]
    fn test_sort_is_stable() {
        let spec = SortSpec::<Person>::parse("name");
        let sorted = spec.sort(people());
        // Both Bobs and both Carols keep their input order
        assert_eq!(ids(&sorted), vec![2, 3, 5, 1, 4]);
    }

    #[test]
    fn test_compare_matches_sort() {
        let spec = SortSpec::<Person>::parse("age desc");
        let mut by_compare = people();
        by_compare.sort_by(|a, b| spec.compare(a, b));
        assert_eq!(ids(&by_compare), ids(&spec.sort(people())));
    }

    #[test]
    fn test_by_default() {
        let spec = SortSpec::<Person>::by_default();
        assert!(spec.is_default());
        assert_eq!(spec.keys()[0].name(), "name");
    }
}
