//! Filter conditions and compiled predicates
//!
//! Filters are described as data ([`FilterCondition`]) and compiled against
//! an entity's field registry into a [`FilterSet`], which is the predicate
//! handed to record sources. All conditions in a set must hold.
//!
//! # Example
//!
//! ```rust,ignore
//! let conditions = vec![
//!     FilterCondition::gte("age", 26_u32),
//!     FilterCondition::lte("age", 40_u32),
//!     FilterCondition::contains("name", "ra"),
//! ];
//! let filter = FilterSet::<Employee>::compile(&conditions);
//! let adults: Vec<_> = employees.iter().filter(|e| filter.matches(e)).collect();
//! ```

use std::cmp::Ordering;
use std::fmt;

use super::fields::{FieldDef, FieldRegistry, FieldValue, Fields};

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Case-insensitive substring match
    Contains,
    /// Value is in a list
    In,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Contains => write!(f, "CONTAINS"),
            Self::In => write!(f, "IN"),
        }
    }
}

/// The right-hand side of a filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A single value
    Single(FieldValue),
    /// A list of values (for IN)
    List(Vec<FieldValue>),
}

impl<V: Into<FieldValue>> From<V> for FilterValue {
    fn from(value: V) -> Self {
        Self::Single(value.into())
    }
}

/// A single filter condition on a named field
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, FilterOperator::Equal, FilterValue::Single(value.into()))
    }

    /// Lower bound, inclusive (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(
            field,
            FilterOperator::GreaterThanOrEqual,
            FilterValue::Single(value.into()),
        )
    }

    /// Upper bound, inclusive (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(
            field,
            FilterOperator::LessThanOrEqual,
            FilterValue::Single(value.into()),
        )
    }

    /// Case-insensitive substring filter
    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::Contains,
            FilterValue::Single(FieldValue::Text(term.into())),
        )
    }

    /// Membership filter (field IN values)
    pub fn in_list<V, I>(field: impl Into<String>, values: I) -> Self
    where
        V: Into<FieldValue>,
        I: IntoIterator<Item = V>,
    {
        Self::new(
            field,
            FilterOperator::In,
            FilterValue::List(values.into_iter().map(Into::into).collect()),
        )
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FilterValue::Single(value) => write!(f, "{} {} {}", self.field, self.operator, value),
            FilterValue::List(values) => write!(
                f,
                "{} {} ({} values)",
                self.field,
                self.operator,
                values.len()
            ),
        }
    }
}

struct CompiledCondition<T> {
    field: FieldDef<T>,
    operator: FilterOperator,
    value: FilterValue,
    // lower-cased search term for Contains
    needle: Option<String>,
}

impl<T> CompiledCondition<T> {
    fn matches(&self, record: &T) -> bool {
        let actual = self.field.value(record);

        match (self.operator, &self.value) {
            (FilterOperator::Equal, FilterValue::Single(expected)) => {
                actual.total_cmp(expected) == Ordering::Equal
            }
            (FilterOperator::GreaterThanOrEqual, FilterValue::Single(bound)) => {
                !actual.is_null() && actual.total_cmp(bound) != Ordering::Less
            }
            (FilterOperator::LessThanOrEqual, FilterValue::Single(bound)) => {
                !actual.is_null() && actual.total_cmp(bound) != Ordering::Greater
            }
            (FilterOperator::Contains, FilterValue::Single(_)) => {
                match (actual.as_text(), self.needle.as_deref()) {
                    (Some(text), Some(needle)) => text.to_lowercase().contains(needle),
                    _ => false,
                }
            }
            (FilterOperator::In, FilterValue::List(values)) => values
                .iter()
                .any(|candidate| actual.total_cmp(candidate) == Ordering::Equal),
            _ => false,
        }
    }
}

impl<T> Clone for CompiledCondition<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            operator: self.operator,
            value: self.value.clone(),
            needle: self.needle.clone(),
        }
    }
}

/// A conjunction of compiled conditions over `T`
///
/// An empty set matches every record. Matching is a pure function of the
/// record, so applying the same set twice keeps the same records.
pub struct FilterSet<T> {
    conditions: Vec<CompiledCondition<T>>,
}

impl<T: Fields> FilterSet<T> {
    /// Compile conditions against `T`'s registry
    #[must_use]
    pub fn compile(conditions: &[FilterCondition]) -> Self {
        Self::compile_with(T::registry(), conditions)
    }
}

impl<T> FilterSet<T> {
    /// A set with no conditions
    #[must_use]
    pub const fn all() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Compile conditions against an explicit registry
    ///
    /// Conditions on fields the registry does not know are dropped.
    pub fn compile_with(registry: &FieldRegistry<T>, conditions: &[FilterCondition]) -> Self {
        let conditions = conditions
            .iter()
            .filter_map(|condition| {
                let Some(field) = registry.find(&condition.field) else {
                    tracing::warn!(
                        entity = registry.entity(),
                        condition = %condition,
                        "Dropping filter condition on unknown field"
                    );
                    return None;
                };

                let needle = match (&condition.operator, &condition.value) {
                    (FilterOperator::Contains, FilterValue::Single(term)) => {
                        term.as_text().map(|text| text.trim().to_lowercase())
                    }
                    _ => None,
                };

                Some(CompiledCondition {
                    field: field.clone(),
                    operator: condition.operator,
                    value: condition.value.clone(),
                    needle,
                })
            })
            .collect();

        Self { conditions }
    }

    /// Check whether a record satisfies every condition
    pub fn matches(&self, record: &T) -> bool {
        self.conditions.iter().all(|condition| condition.matches(record))
    }

    /// Combine with another set; both must hold
    #[must_use]
    pub fn and(mut self, other: Self) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    /// Number of active conditions
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Check whether this set matches everything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<T> Default for FilterSet<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> Clone for FilterSet<T> {
    fn clone(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.conditions.iter().map(|c| {
                format!("{} {} {:?}", c.field.name(), c.operator, c.value)
            }))
            .finish()
    }
}
