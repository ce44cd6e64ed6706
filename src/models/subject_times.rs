//! Adapter for the per-subject time breakdown of exam results.
//!
//! The exam ranking endpoint stores this field as text and does not
//! guarantee JSON: it may be a real object, `null`, the literal `"None"`,
//! or a repr with single quotes (`{'Português': 30}`). Quotes are
//! normalized before parsing. Anything still unparseable is logged and
//! treated as no breakdown. Subjects keep the order the server sent.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Minutes spent per subject, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectTimes(Vec<(String, f64)>);

impl SubjectTimes {
    pub fn new(times: Vec<(String, f64)>) -> Self {
        Self(times)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Parse the loosely encoded text form.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "None" || raw == "null" {
            return None;
        }
        let normalized = raw.replace('\'', "\"");
        match serde_json::from_str::<Value>(&normalized) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                log::error!("Could not parse subject times {raw:?}: {e}");
                None
            }
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            log::error!("Subject times is not an object: {value}");
            return None;
        };
        let times = map
            .into_iter()
            .filter_map(|(subject, minutes)| {
                let minutes = match minutes {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                }?;
                Some((subject, minutes))
            })
            .collect();
        Some(Self(times))
    }
}

impl Serialize for SubjectTimes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (subject, minutes) in &self.0 {
            map.serialize_entry(subject, minutes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SubjectTimes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(raw) => Self::parse_loose(&raw),
            other => Self::from_value(other),
        };
        Ok(parsed.unwrap_or_default())
    }
}
