//! Read-only accessors over a loosely typed JSON payload.
//!
//! Paths are dotted (`data.base.reviewId`). Required accessors turn absence
//! into `NormalizeError::MalformedPayload` carrying the full path.

use serde_json::Value;

use crate::errors::NormalizeError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Payload<'a> {
    root: &'a Value,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Value at `path`, treating JSON `null` as absent.
    pub(crate) fn get(&self, path: &str) -> Option<&'a Value> {
        path.split('.')
            .try_fold(self.root, |node, key| node.get(key))
            .filter(|v| !v.is_null())
    }

    pub(crate) fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub(crate) fn str(&self, path: &str) -> Result<&'a str, NormalizeError> {
        self.opt_str(path)
            .ok_or_else(|| NormalizeError::malformed(path))
    }

    pub(crate) fn opt_str(&self, path: &str) -> Option<&'a str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Identifier that providers send either as a string or as a number.
    pub(crate) fn id(&self, path: &str) -> Result<String, NormalizeError> {
        self.opt_id(path)
            .ok_or_else(|| NormalizeError::malformed(path))
    }

    pub(crate) fn opt_id(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Optional integer. Present but non-integer values are malformed.
    pub(crate) fn opt_i64(&self, path: &str) -> Result<Option<i64>, NormalizeError> {
        match self.get(path) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| NormalizeError::malformed(path)),
        }
    }

    /// Joins `key` of every object in the array at `path` with `", "`.
    /// Missing array or missing names produce an empty string.
    pub(crate) fn joined_names(&self, path: &str, key: &str) -> String {
        self.get(path)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get(key).and_then(Value::as_str))
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }
}
