//! Field mapping layer.
//!
//! Each record field is declared as a `Field`: an output name plus the key
//! path it is read from. Typed accessors apply the conversion. JSON `null`
//! and a missing key are treated the same.

use serde_json::Value;

use crate::error_handling::ExtractError;

/// A named key path into a payload.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub path: &'static [&'static str],
}

impl Field {
    pub const fn new(name: &'static str, path: &'static [&'static str]) -> Self {
        Self { name, path }
    }

    /// The value at this field's path, if present and not `null`.
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        lookup(value, self.path)
    }

    pub fn is_present(&self, value: &Value) -> bool {
        self.get(value).is_some()
    }

    /// String value; numeric ids are rendered as strings.
    pub fn str(&self, value: &Value) -> Option<String> {
        match self.get(value)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Integer value. A float is accepted only when it is integral and in
    /// range (`1.7e9`), never truncated.
    pub fn i64(&self, value: &Value) -> Option<i64> {
        let v = self.get(value)?;
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn bool(&self, value: &Value) -> Option<bool> {
        self.get(value)?.as_bool()
    }

    /// The raw value, cloned, for opaque annotations.
    pub fn raw(&self, value: &Value) -> Option<Value> {
        self.get(value).cloned()
    }

    /// # Errors
    ///
    /// `ExtractError::MissingField` if absent, `null`, or not a string/number.
    pub fn required_str(&self, value: &Value) -> Result<String, ExtractError> {
        self.str(value).ok_or(ExtractError::MissingField(self.name))
    }

    /// # Errors
    ///
    /// `ExtractError::MissingField` if absent, `null`, or not a number.
    pub fn required_i64(&self, value: &Value) -> Result<i64, ExtractError> {
        self.i64(value).ok_or(ExtractError::MissingField(self.name))
    }

    /// The `node` of every element of the `edges` array at this path.
    ///
    /// A missing or non-array `edges` yields nothing.
    pub fn edge_nodes<'a>(&self, value: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
        self.get(value)
            .and_then(|edges| edges.get("edges"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|edge| edge.get("node"))
    }

    /// Strings found at `inner` inside every edge node, in edge order.
    pub fn edge_strings(&self, value: &Value, inner: &[&str]) -> Vec<String> {
        self.edge_nodes(value)
            .filter_map(|node| lookup(node, inner))
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// Walks `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let found = path.iter().try_fold(value, |current, key| current.get(*key))?;
    if found.is_null() {
        None
    } else {
        Some(found)
    }
}

/// Fails unless `value` is a JSON object.
pub fn expect_object(value: &Value, what: &'static str) -> Result<(), ExtractError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ExtractError::NotAnObject(what))
    }
}
