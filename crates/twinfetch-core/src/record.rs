//! Lookup payload as seen by the client
//!
//! The client trusts the response shape but never rejects a body because a
//! field is missing: absent or `null` fields decode to the empty string.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One side of a lookup result (either the source or its twin)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub owner: String,

    /// The service emits numeric ids; both numbers and strings are accepted.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub hyperlink: String,
}

impl Record {
    /// Human readable listing label shown as the hyperlink text
    pub fn listing_label(&self) -> String {
        format!("Opensea.io/.../{}", self.id)
    }
}

/// Whole response body: `{"Source": {...}, "Twin": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TwinResponse {
    #[serde(rename = "Source", default)]
    pub source: Option<Record>,

    #[serde(rename = "Twin", default)]
    pub twin: Option<Record>,
}

impl TwinResponse {
    /// Decodes a body that must be a JSON object. `Source` and `Twin` are
    /// only taken when they are objects themselves.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let mut fields: Map<String, JsonValue> = serde_json::from_str(body)?;
        Ok(Self {
            source: take_record(&mut fields, "Source")?,
            twin: take_record(&mut fields, "Twin")?,
        })
    }
}

fn take_record(
    fields: &mut Map<String, JsonValue>,
    key: &str,
) -> Result<Option<Record>, serde_json::Error> {
    match fields.remove(key) {
        Some(record @ JsonValue::Object(_)) => serde_json::from_value(record).map(Some),
        _ => Ok(None),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}
