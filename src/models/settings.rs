//! Platform-wide configuration records.
//!
//! Settings are persisted as text plus a declared type tag. The raw text is
//! decoded exactly once, at read time, into a strongly typed [`SettingValue`];
//! a value that does not parse under its declared type is an error, never a
//! silent fallback.

use serde::{Deserialize, Serialize};

/// Declared type tag of a platform setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingDataType {
    String,
    Integer,
    Float,
    Boolean,
    Json,
}

/// A decoded, strongly typed setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Json(serde_json::Value),
}

/// Raw text that failed to decode under its declared type.
#[derive(Debug, thiserror::Error)]
#[error("setting '{key}' is not a valid {expected:?}: {raw:?}")]
pub struct SettingDecodeError {
    pub key: String,
    pub expected: SettingDataType,
    pub raw: String,
}

impl SettingValue {
    /// Decode raw text under the declared type tag.
    pub fn decode(
        key: &str,
        data_type: SettingDataType,
        raw: &str,
    ) -> Result<Self, SettingDecodeError> {
        let fail = || SettingDecodeError {
            key: key.to_string(),
            expected: data_type,
            raw: raw.to_string(),
        };
        match data_type {
            SettingDataType::String => Ok(SettingValue::Text(raw.to_string())),
            SettingDataType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(SettingValue::Integer)
                .map_err(|_| fail()),
            SettingDataType::Float => raw
                .trim()
                .parse::<f64>()
                .map(SettingValue::Float)
                .map_err(|_| fail()),
            SettingDataType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(SettingValue::Boolean(true)),
                "false" | "0" | "no" | "off" => Ok(SettingValue::Boolean(false)),
                _ => Err(fail()),
            },
            SettingDataType::Json => serde_json::from_str(raw)
                .map(SettingValue::Json)
                .map_err(|_| fail()),
        }
    }

    /// The integer payload, if this value holds one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean payload, if this value holds one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

/// A platform setting as persisted: raw text plus its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSetting {
    pub key: String,
    pub raw_value: String,
    pub data_type: SettingDataType,
    pub description: String,
    pub active: bool,
}

impl PlatformSetting {
    pub fn new(
        key: impl Into<String>,
        data_type: SettingDataType,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            raw_value: raw_value.into(),
            data_type,
            description: String::new(),
            active: true,
        }
    }

    /// Decode this setting into its typed value.
    pub fn value(&self) -> Result<SettingValue, SettingDecodeError> {
        SettingValue::decode(&self.key, self.data_type, &self.raw_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer() {
        let setting = PlatformSetting::new("slot_step_minutes", SettingDataType::Integer, "15");
        assert_eq!(setting.value().unwrap(), SettingValue::Integer(15));
    }

    #[test]
    fn test_decode_boolean_spellings() {
        for raw in ["true", "1", "yes", "on", "TRUE"] {
            let v = SettingValue::decode("flag", SettingDataType::Boolean, raw).unwrap();
            assert_eq!(v, SettingValue::Boolean(true), "raw={raw}");
        }
        for raw in ["false", "0", "no", "off"] {
            let v = SettingValue::decode("flag", SettingDataType::Boolean, raw).unwrap();
            assert_eq!(v, SettingValue::Boolean(false), "raw={raw}");
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(SettingValue::decode("n", SettingDataType::Integer, "abc").is_err());
        assert!(SettingValue::decode("f", SettingDataType::Boolean, "maybe").is_err());
        assert!(SettingValue::decode("j", SettingDataType::Json, "{broken").is_err());
    }

    #[test]
    fn test_decode_json() {
        let v = SettingValue::decode("j", SettingDataType::Json, r#"{"max": 5}"#).unwrap();
        assert_eq!(v, SettingValue::Json(serde_json::json!({"max": 5})));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(SettingValue::Integer(30).as_integer(), Some(30));
        assert_eq!(SettingValue::Text("30".into()).as_integer(), None);
        assert_eq!(SettingValue::Boolean(true).as_boolean(), Some(true));
    }
}
