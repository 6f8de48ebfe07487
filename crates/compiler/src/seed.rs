//! Partial compiler input.
//!
//! A seed is whatever is known about a recipe before it is a document: the
//! output of the freeform parser, a half-filled form, a record read back from
//! storage. Reading a seed from JSON never fails; fields with the wrong type
//! are treated as absent.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// How the seed content was produced, recorded as document provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseMeta {
    /// Producer of the content; the configured default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub confidence: f64,
    pub mode: String,
}

impl ParseMeta {
    pub fn new(confidence: f64, mode: impl Into<String>) -> Self {
        Self {
            source: None,
            confidence,
            mode: mode.into(),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            source: fields
                .get("source")
                .and_then(Value::as_str)
                .map(str::to_string),
            confidence: fields
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            mode: fields
                .get("mode")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Partial recipe. List fields stay raw JSON until compile time so that the
/// normalizer sees exactly what was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiteSeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Value,
    pub instructions: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prose: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ParseMeta>,
}

impl LiteSeed {
    /// Reads a seed out of any JSON value. Non-objects give an empty seed.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: text("name"),
            description: text("description"),
            ingredients: fields.get("ingredients").cloned().unwrap_or(Value::Null),
            instructions: fields.get("instructions").cloned().unwrap_or(Value::Null),
            prose: match fields.get("prose") {
                Some(Value::Array(lines)) => lines
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            },
            meta: match fields.get("meta") {
                Some(Value::Object(meta)) => Some(ParseMeta::from_fields(meta)),
                _ => None,
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Plain-text ingredient lines.
    pub fn with_ingredient_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = text_array(lines);
        self
    }

    /// Plain-text instruction lines.
    pub fn with_instruction_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = text_array(lines);
        self
    }

    pub fn with_meta(mut self, meta: ParseMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

fn text_array<I, S>(lines: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(lines.into_iter().map(|line| Value::String(line.into())).collect())
}

impl<'de> Deserialize<'de> for LiteSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wrong_types_read_as_absent() {
        let seed = LiteSeed::from_value(&json!({
            "name": 42,
            "description": ["no"],
            "ingredients": "2 eggs",
            "prose": "single line",
            "meta": 0.9
        }));
        assert_eq!(seed.name, None);
        assert_eq!(seed.description, None);
        assert_eq!(seed.ingredients, json!("2 eggs"));
        assert_eq!(seed.instructions, Value::Null);
        assert!(seed.prose.is_empty());
        assert_eq!(seed.meta, None);
    }

    #[test]
    fn meta_fields_default_individually() {
        let seed = LiteSeed::from_value(&json!({ "meta": { "mode": "headers" } }));
        assert_eq!(seed.meta, Some(ParseMeta::new(0.0, "headers")));
    }

    #[test]
    fn non_object_is_empty_seed() {
        for value in [json!(null), json!([1, 2]), json!("recipe")] {
            assert_eq!(LiteSeed::from_value(&value), LiteSeed::default());
        }
    }

    #[test]
    fn deserialize_never_fails_on_shape() {
        let seed: LiteSeed = serde_json::from_str(r#"{"name": "Soup", "prose": ["warm", 3]}"#)
            .expect("any JSON is a seed");
        assert_eq!(seed.name.as_deref(), Some("Soup"));
        assert_eq!(seed.prose, vec!["warm"]);
    }
}
