//! JSON (de)serialization helpers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value as pretty JSON with 2-space indentation and a
/// trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_output_shape() {
        let json = to_json_pretty(&json!({"suite": "pokemon"})).expect("serialization should work");
        assert!(json.ends_with('\n'));
        assert!(json.contains("  \"suite\""));
    }

    #[test]
    fn test_key_order_preserved() {
        let value: serde_json::Value =
            from_json(r#"{"zebra": 1, "apple": 2}"#).expect("deserialization should work");
        let json = to_json_pretty(&value).expect("serialization should work");
        let zebra = json.find("zebra").expect("zebra present");
        let apple = json.find("apple").expect("apple present");
        assert!(zebra < apple);
    }

    #[test]
    fn test_from_json_bytes_rejects_garbage() {
        let result: Result<serde_json::Value, _> = from_json_bytes(b"{\"invalid\": }");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
