use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Leave-type correlation key.
///
/// Historical rows carry this id either as a number or as a string, so two
/// ids compare equal when their normalized text matches (`"07"` == `7`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeaveTypeId(String);

impl LeaveTypeId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty ids are treated as absent by the ingestion layer.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

impl From<u64> for LeaveTypeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for LeaveTypeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LeaveTypeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for LeaveTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LeaveTypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LeaveTypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => LeaveTypeId::from(n),
            Raw::Text(s) => LeaveTypeId::new(s),
        })
    }
}
