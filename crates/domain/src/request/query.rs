//! Query parameter types

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Boolean flag, rendered as `true` / `false`.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A query parameter whose value may be absent.
///
/// Absent values are kept so callers can pass optional filters straight
/// through; they are dropped when the URL is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value, `None` when the caller supplied null
    #[serde(default)]
    pub value: Option<QueryValue>,
}

impl QueryParam {
    /// Creates a query parameter with a value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a query parameter with no value.
    #[must_use]
    pub fn absent(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

/// An insertion-ordered map of query parameters.
///
/// Keys are unique. Setting a key that is already present replaces its value
/// and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<QueryParam>", into = "Vec<QueryParam>")]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a query parameter, replacing the value of an existing key.
    pub fn add(&mut self, param: QueryParam) {
        match self.items.iter_mut().find(|p| p.key == param.key) {
            Some(existing) => existing.value = param.value,
            None => self.items.push(param),
        }
    }

    /// Sets a parameter (builder pattern). `None` values are kept but never sent.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Option<impl Into<QueryValue>>) -> Self {
        self.add(QueryParam {
            key: key.into(),
            value: value.map(Into::into),
        });
        self
    }

    /// Returns the value set for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.items
            .iter()
            .find(|p| p.key == key)
            .and_then(|p| p.value.as_ref())
    }

    /// Returns `(key, rendered value)` pairs for every parameter that has a
    /// value, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, String)> {
        self.items
            .iter()
            .filter_map(|p| p.value.as_ref().map(|v| (p.key.as_str(), v.to_string())))
    }

    /// Returns all parameters, including absent ones.
    #[must_use]
    pub fn all(&self) -> &[QueryParam] {
        &self.items
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        let mut params = Self::new();
        for param in iter {
            params.add(param);
        }
        params
    }
}

impl From<Vec<QueryParam>> for QueryParams {
    fn from(items: Vec<QueryParam>) -> Self {
        items.into_iter().collect()
    }
}

impl From<QueryParams> for Vec<QueryParam> {
    fn from(params: QueryParams) -> Self {
        params.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_present_skips_absent_values() {
        let params = QueryParams::new()
            .with("limit", Some(20))
            .with("cursor", None::<String>)
            .with("sort", Some("name"));

        let present: Vec<_> = params.present().collect();
        assert_eq!(
            present,
            vec![("limit", "20".to_string()), ("sort", "name".to_string())]
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_query_value_display() {
        assert_eq!(QueryValue::from(true).to_string(), "true");
        assert_eq!(QueryValue::from(2.5).to_string(), "2.5");
        assert_eq!(QueryValue::from(-7_i64).to_string(), "-7");
    }

    #[test]
    fn test_deserialize_null_as_absent() {
        let params: QueryParams =
            serde_json::from_str(r#"[{"key": "age", "value": 25}, {"key": "q", "value": null}]"#)
                .expect("valid params");
        assert_eq!(params.all()[0], QueryParam::new("age", 25_i64));
        assert_eq!(params.all()[1], QueryParam::absent("q"));
    }

    #[test]
    fn test_repeated_key_replaces_in_place() {
        let params = QueryParams::new()
            .with("age", Some(25))
            .with("name", Some("ash"))
            .with("age", Some(30));

        let present: Vec<_> = params.present().collect();
        assert_eq!(
            present,
            vec![("age", "30".to_string()), ("name", "ash".to_string())]
        );
        assert_eq!(params.get("age"), Some(&QueryValue::Integer(30)));
    }

    #[test]
    fn test_repeated_key_set_to_null_is_dropped() {
        let params = QueryParams::new()
            .with("q", Some("grimer"))
            .with("q", None::<String>);

        assert_eq!(params.len(), 1);
        assert_eq!(params.present().count(), 0);
    }

    #[test]
    fn test_deserialize_deduplicates_keys() {
        let params: QueryParams = serde_json::from_str(
            r#"[{"key": "limit", "value": 10}, {"key": "offset", "value": 0}, {"key": "limit", "value": 20}]"#,
        )
        .expect("valid params");

        assert_eq!(
            params.all(),
            &[QueryParam::new("limit", 20_i64), QueryParam::new("offset", 0_i64)]
        );
        let round_trip = serde_json::to_value(&params).expect("serializes");
        assert_eq!(round_trip.as_array().map(Vec::len), Some(2));
    }
}
