//! Field registry and dynamic field values
//!
//! Every entity that takes part in sorting, filtering or shaping registers its
//! readable fields once, as a name → accessor table. Lookups are
//! case-insensitive and unknown names simply resolve to `None`, so callers can
//! decide to ignore them.
//!
//! # Example
//!
//! ```rust
//! use once_cell::sync::Lazy;
//! use roster_service::query::{FieldRegistry, FieldValue, Fields};
//!
//! struct Book {
//!     id: i64,
//!     title: String,
//! }
//!
//! static BOOK_FIELDS: Lazy<FieldRegistry<Book>> = Lazy::new(|| {
//!     FieldRegistry::<Book>::builder("Book")
//!         .field("id", |b| b.id.into())
//!         .field("title", |b| b.title.as_str().into())
//!         .identifier("id")
//!         .default_sort("title")
//!         .build()
//! });
//!
//! impl Fields for Book {
//!     fn registry() -> &'static FieldRegistry<Self> {
//!         &BOOK_FIELDS
//!     }
//! }
//!
//! let book = Book { id: 7, title: "Dune".to_string() };
//! let title = Book::registry().find("TITLE").unwrap();
//! assert_eq!(title.value(&book), FieldValue::Text("Dune".to_string()));
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// A single field value read from a record
///
/// The closed set of kinds a shaped response can carry. Values pass through
/// shaping unchanged and serialize as plain JSON values.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// UUID value
    Uuid(Uuid),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
            Self::Uuid(_) => 4,
            Self::Timestamp(_) => 5,
        }
    }

    /// Total ordering across all values
    ///
    /// Values of the same kind compare naturally (floats via `total_cmp`,
    /// integers and floats against each other numerically, text ignoring
    /// case). Values of different kinds order by kind, with `Null` first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::cmp::Ordering;
    /// use roster_service::query::FieldValue;
    ///
    /// assert_eq!(FieldValue::Int(2).total_cmp(&FieldValue::Int(10)), Ordering::Less);
    /// assert_eq!(FieldValue::Null.total_cmp(&FieldValue::Int(0)), Ordering::Less);
    /// ```
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => compare_text(a, b),
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Borrow the text content, if this is a text value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check whether this is the null value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

// Case-insensitive first; exact bytes break ties so the order stays total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Uuid(id) => write!(f, "{id}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Uuid(id) => id.serialize(serializer),
            Self::Timestamp(ts) => ts.serialize(serializer),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Uuid> for FieldValue {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl<V: Into<Self>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Reads one field of a record
pub type Accessor<T> = fn(&T) -> FieldValue;

/// A registered, readable field of `T`
pub struct FieldDef<T> {
    name: &'static str,
    key: String,
    accessor: Accessor<T>,
}

impl<T> FieldDef<T> {
    /// The field name as it appears in responses
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Lower-cased lookup key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read this field from a record
    pub fn value(&self, record: &T) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<T> Clone for FieldDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            key: self.key.clone(),
            accessor: self.accessor,
        }
    }
}

impl<T> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef").field("name", &self.name).finish()
    }
}

/// The readable fields of one entity type
///
/// Fields keep their declaration order; shaping and "full shape" output
/// follow it.
pub struct FieldRegistry<T> {
    entity: &'static str,
    fields: Vec<FieldDef<T>>,
    identifier: usize,
    default_sort: usize,
}

impl<T> FieldRegistry<T> {
    /// Start building a registry for the named entity
    #[must_use]
    pub fn builder(entity: &'static str) -> FieldRegistryBuilder<T> {
        FieldRegistryBuilder {
            entity,
            fields: Vec::new(),
            identifier: None,
            default_sort: None,
        }
    }

    /// Entity name, for logs and errors
    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    /// All fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldDef<T>] {
        &self.fields
    }

    /// Find a field by name, ignoring case
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FieldDef<T>> {
        self.position(name).map(|index| &self.fields[index])
    }

    /// Index of a field by name, ignoring case
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        let key = name.trim().to_lowercase();
        self.fields.iter().position(|field| field.key == key)
    }

    /// The field that identifies a record
    #[must_use]
    pub fn identifier(&self) -> &FieldDef<T> {
        &self.fields[self.identifier]
    }

    /// Index of the identifier field
    #[must_use]
    pub const fn identifier_index(&self) -> usize {
        self.identifier
    }

    /// The field used when no valid sort is requested
    #[must_use]
    pub fn default_sort(&self) -> &FieldDef<T> {
        &self.fields[self.default_sort]
    }

    /// Number of registered fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether no fields are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("entity", &self.entity)
            .field("fields", &self.fields)
            .field("identifier", &self.identifier().name())
            .field("default_sort", &self.default_sort().name())
            .finish()
    }
}

/// Builder for [`FieldRegistry`]
pub struct FieldRegistryBuilder<T> {
    entity: &'static str,
    fields: Vec<FieldDef<T>>,
    identifier: Option<&'static str>,
    default_sort: Option<&'static str>,
}

impl<T> FieldRegistryBuilder<T> {
    /// Register a readable field
    #[must_use]
    pub fn field(mut self, name: &'static str, accessor: Accessor<T>) -> Self {
        self.fields.push(FieldDef {
            name,
            key: name.to_lowercase(),
            accessor,
        });
        self
    }

    /// Name the identifier field (defaults to the first field)
    #[must_use]
    pub const fn identifier(mut self, name: &'static str) -> Self {
        self.identifier = Some(name);
        self
    }

    /// Name the default sort field (defaults to the identifier)
    #[must_use]
    pub const fn default_sort(mut self, name: &'static str) -> Self {
        self.default_sort = Some(name);
        self
    }

    /// Finish the registry
    ///
    /// # Panics
    ///
    /// Panics if no fields were registered.
    #[must_use]
    pub fn build(self) -> FieldRegistry<T> {
        assert!(
            !self.fields.is_empty(),
            "field registry for {} has no fields",
            self.entity
        );

        let index_of = |name: Option<&'static str>| {
            name.and_then(|name| {
                let key = name.to_lowercase();
                let index = self.fields.iter().position(|field| field.key == key);
                debug_assert!(index.is_some(), "{} has no field {name}", self.entity);
                index
            })
        };

        let identifier = index_of(self.identifier).unwrap_or(0);
        let default_sort = index_of(self.default_sort).unwrap_or(identifier);

        FieldRegistry {
            entity: self.entity,
            fields: self.fields,
            identifier,
            default_sort,
        }
    }
}

/// Types with a static field registry
pub trait Fields: Sized + 'static {
    /// The registry describing this type's readable fields
    fn registry() -> &'static FieldRegistry<Self>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Person {
        pub id: i64,
        pub name: String,
        pub age: u32,
    }

    impl Person {
        pub(crate) fn new(id: i64, name: &str, age: u32) -> Self {
            Self {
                id,
                name: name.to_string(),
                age,
            }
        }
    }

    static PERSON_FIELDS: Lazy<FieldRegistry<Person>> = Lazy::new(|| {
        FieldRegistry::<Person>::builder("Person")
            .field("id", |p| p.id.into())
            .field("name", |p| p.name.as_str().into())
            .field("age", |p| p.age.into())
            .identifier("id")
            .default_sort("name")
            .build()
    });

    impl Fields for Person {
        fn registry() -> &'static FieldRegistry<Self> {
            &PERSON_FIELDS
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let registry = Person::registry();
        assert_eq!(registry.find("NAME").map(FieldDef::name), Some("name"));
        assert_eq!(registry.find(" Age ").map(FieldDef::name), Some("age"));
        assert!(registry.find("salary").is_none());
    }

    #[test]
    fn test_identifier_and_default_sort() {
        let registry = Person::registry();
        assert_eq!(registry.identifier().name(), "id");
        assert_eq!(registry.identifier_index(), 0);
        assert_eq!(registry.default_sort().name(), "name");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_builder_defaults_to_first_field() {
        let registry: FieldRegistry<Person> = FieldRegistry::<Person>::builder("Person")
            .field("name", |p| p.name.as_str().into())
            .field("age", |p| p.age.into())
            .build();
        assert_eq!(registry.identifier().name(), "name");
        assert_eq!(registry.default_sort().name(), "name");
    }

    #[test]
    fn test_accessor_reads_value() {
        let person = Person::new(1, "Ada", 36);
        let age = Person::registry().find("age").unwrap();
        assert_eq!(age.value(&person), FieldValue::Int(36));
    }

    #[test]
    fn test_total_cmp_same_kind() {
        assert_eq!(
            FieldValue::from("alpha").total_cmp(&FieldValue::from("beta")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Float(1.5).total_cmp(&FieldValue::Int(1)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Bool(true).total_cmp(&FieldValue::Bool(true)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_text_ignores_case_with_exact_tiebreak() {
        let alice = FieldValue::from("alice");
        let carol = FieldValue::from("Carol");
        assert_eq!(alice.total_cmp(&carol), Ordering::Less);
        assert_eq!(carol.total_cmp(&alice), Ordering::Greater);

        let upper = FieldValue::from("Bob");
        let lower = FieldValue::from("bob");
        assert_eq!(upper.total_cmp(&lower), Ordering::Less);
        assert_eq!(lower.total_cmp(&upper), Ordering::Greater);
        assert_eq!(lower.total_cmp(&lower.clone()), Ordering::Equal);
    }

    #[test]
    fn test_total_cmp_mixed_kinds_orders_null_first() {
        assert_eq!(
            FieldValue::Null.total_cmp(&FieldValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("a").total_cmp(&FieldValue::Int(5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(3_i64)), FieldValue::Int(3));
    }

    #[test]
    fn test_serialize_as_plain_json() {
        let id = Uuid::from_u128(1);
        assert_eq!(serde_json::to_value(FieldValue::Int(4)).unwrap(), 4);
        assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(FieldValue::Uuid(id)).unwrap(),
            serde_json::Value::String(id.to_string())
        );
    }
}
