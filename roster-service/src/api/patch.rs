//! JSON Patch documents for flat request bodies
//!
//! Supports the six RFC 6902 operations against top-level members only.
//! Member names match case-insensitively, and only members the target
//! already serializes can be addressed.
//!
//! # Example
//!
//! ```rust
//! use roster_service::api::JsonPatch;
//! use roster_service::domain::EmployeeForManipulation;
//!
//! let patch: JsonPatch = serde_json::from_str(
//!     r#"[{ "op": "replace", "path": "/age", "value": 31 }]"#,
//! )
//! .unwrap();
//!
//! let before = EmployeeForManipulation {
//!     name: "Jana McLeary".to_string(),
//!     age: 30,
//!     position: "Software developer".to_string(),
//! };
//! assert_eq!(patch.apply(&before).unwrap().age, 31);
//! ```

use std::collections::BTreeSet;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a patch could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The path names no member of the target
    #[error("The target location specified by path segment '{0}' was not found.")]
    PathNotFound(String),

    /// The path is nested or not a JSON pointer
    #[error("The path '{0}' is not supported; only top-level members can be patched.")]
    UnsupportedPath(String),

    /// A `test` operation did not match
    #[error("The current value at '{0}' is not equal to the test value.")]
    TestFailed(String),

    /// The patched document no longer fits the target type
    #[error("The patched document is invalid: {0}")]
    Invalid(String),
}

/// One patch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Set a member
    Add {
        /// Target member
        path: String,
        /// New value
        value: Value,
    },
    /// Drop a member
    Remove {
        /// Target member
        path: String,
    },
    /// Overwrite an existing member
    Replace {
        /// Target member
        path: String,
        /// New value
        value: Value,
    },
    /// Move a value between members
    Move {
        /// Source member
        from: String,
        /// Target member
        path: String,
    },
    /// Copy a value between members
    Copy {
        /// Source member
        from: String,
        /// Target member
        path: String,
    },
    /// Require a member to hold a value
    Test {
        /// Target member
        path: String,
        /// Expected value
        value: Value,
    },
}

/// An ordered list of patch operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPatch(pub Vec<PatchOperation>);

impl JsonPatch {
    /// Apply every operation in order to a copy of `target`
    ///
    /// Nothing is returned unless all operations succeed and the result
    /// deserializes back into `T`.
    pub fn apply<T>(&self, target: &T) -> Result<T, PatchError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut document =
            serde_json::to_value(target).map_err(|err| PatchError::Invalid(err.to_string()))?;

        {
            let members = document
                .as_object_mut()
                .ok_or_else(|| PatchError::UnsupportedPath(String::new()))?;
            let known: BTreeSet<String> = members.keys().cloned().collect();

            for operation in &self.0 {
                operation.apply(members, &known)?;
            }
        }

        serde_json::from_value(document).map_err(|err| PatchError::Invalid(err.to_string()))
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the patch has no operations
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PatchOperation {
    fn apply(
        &self,
        members: &mut Map<String, Value>,
        known: &BTreeSet<String>,
    ) -> Result<(), PatchError> {
        match self {
            Self::Add { path, value } | Self::Replace { path, value } => {
                let key = resolve(known, path)?;
                if matches!(self, Self::Replace { .. }) && !members.contains_key(&key) {
                    return Err(PatchError::PathNotFound(path.clone()));
                }
                members.insert(key, value.clone());
            }
            Self::Remove { path } => {
                let key = resolve(known, path)?;
                members
                    .remove(&key)
                    .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            }
            Self::Move { from, path } => {
                let source = resolve(known, from)?;
                let target = resolve(known, path)?;
                let value = members
                    .remove(&source)
                    .ok_or_else(|| PatchError::PathNotFound(from.clone()))?;
                members.insert(target, value);
            }
            Self::Copy { from, path } => {
                let source = resolve(known, from)?;
                let target = resolve(known, path)?;
                let value = members
                    .get(&source)
                    .cloned()
                    .ok_or_else(|| PatchError::PathNotFound(from.clone()))?;
                members.insert(target, value);
            }
            Self::Test { path, value } => {
                let key = resolve(known, path)?;
                if members.get(&key) != Some(value) {
                    return Err(PatchError::TestFailed(path.clone()));
                }
            }
        }
        Ok(())
    }
}

// Map a one-segment JSON pointer onto a member name of the target.
fn resolve(known: &BTreeSet<String>, path: &str) -> Result<String, PatchError> {
    let segment = path
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .ok_or_else(|| PatchError::UnsupportedPath(path.to_string()))?;
    let name = segment.replace("~1", "/").replace("~0", "~");

    known
        .iter()
        .find(|key| key.eq_ignore_ascii_case(&name))
        .cloned()
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Badge {
        display_name: String,
        title: String,
        level: u32,
    }

    fn badge() -> Badge {
        Badge {
            display_name: "Ada".to_string(),
            title: "Engineer".to_string(),
            level: 3,
        }
    }

    fn patch(ops: Value) -> JsonPatch {
        serde_json::from_value(ops).unwrap()
    }

    #[test]
    fn test_replace_and_add() {
        let patched = patch(serde_json::json!([
            { "op": "replace", "path": "/level", "value": 4 },
            { "op": "add", "path": "/DISPLAYNAME", "value": "Ada L." }
        ]))
        .apply(&badge())
        .unwrap();

        assert_eq!(patched.level, 4);
        assert_eq!(patched.display_name, "Ada L.");
        assert_eq!(patched.title, "Engineer");
    }

    #[test]
    fn test_copy_and_test() {
        let patched = patch(serde_json::json!([
            { "op": "test", "path": "/level", "value": 3 },
            { "op": "copy", "from": "/title", "path": "/displayName" }
        ]))
        .apply(&badge())
        .unwrap();
        assert_eq!(patched.display_name, "Engineer");

        let err = patch(serde_json::json!([{ "op": "test", "path": "/level", "value": 9 }]))
            .apply(&badge())
            .unwrap_err();
        assert_eq!(err, PatchError::TestFailed("/level".to_string()));
    }

    #[test]
    fn test_remove_required_member_is_invalid() {
        let err = patch(serde_json::json!([{ "op": "remove", "path": "/title" }]))
            .apply(&badge())
            .unwrap_err();
        assert!(matches!(err, PatchError::Invalid(_)));
    }

    #[test]
    fn test_move_then_add_back() {
        let patched = patch(serde_json::json!([
            { "op": "move", "from": "/title", "path": "/displayName" },
            { "op": "add", "path": "/title", "value": "Lead" }
        ]))
        .apply(&badge())
        .unwrap();
        assert_eq!(patched.display_name, "Engineer");
        assert_eq!(patched.title, "Lead");
    }

    #[test]
    fn test_unknown_and_nested_paths() {
        let unknown = patch(serde_json::json!([{ "op": "add", "path": "/salary", "value": 1 }]))
            .apply(&badge())
            .unwrap_err();
        assert_eq!(unknown, PatchError::PathNotFound("/salary".to_string()));

        let nested = patch(serde_json::json!([{ "op": "replace", "path": "/title/0", "value": "x" }]))
            .apply(&badge())
            .unwrap_err();
        assert!(matches!(nested, PatchError::UnsupportedPath(_)));
    }

    #[test]
    fn test_wrong_value_type_is_invalid() {
        let err = patch(serde_json::json!([{ "op": "replace", "path": "/level", "value": "high" }]))
            .apply(&badge())
            .unwrap_err();
        assert!(matches!(err, PatchError::Invalid(_)));
    }

    #[test]
    fn test_unknown_op_does_not_parse() {
        let parsed = serde_json::from_value::<JsonPatch>(serde_json::json!([
            { "op": "frobnicate", "path": "/level" }
        ]));
        assert!(parsed.is_err());
    }
}
