use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const UNNAMED_STEP: &str = "Unnamed Step";
pub const DEFAULT_STEP: &str = "Default Step";

const NAME_KEY: &str = "name";
const NEW_PAGE_KEY: &str = "newPage";

/// Decoded marker payload. Values keep their JSON shape (string, bool,
/// number, array, nested object).
pub type Attributes = BTreeMap<String, Value>;

/// Metadata seeded into a step by its `@step` marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetadata {
    name: String,
    new_page: bool,
    attributes: Attributes,
}

impl StepMetadata {
    pub fn new(name: impl Into<String>, new_page: bool, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            new_page,
            attributes,
        }
    }

    /// Metadata for the single step synthesized when a document has no markers.
    pub fn default_step() -> Self {
        Self::new(DEFAULT_STEP, false, Attributes::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new_page(&self) -> bool {
        self.new_page
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute, or `None` when absent or not a string.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }
}

/// Decode a marker payload into step metadata.
///
/// Never fails: a malformed payload is logged and treated as empty so the
/// step is still created with default name and `newPage`.
pub fn decode(payload: &str) -> StepMetadata {
    let attributes = decode_attributes(payload);
    let name = attributes
        .get(NAME_KEY)
        .and_then(value_text)
        .unwrap_or_else(|| UNNAMED_STEP.to_string());
    let new_page = attributes
        .get(NEW_PAGE_KEY)
        .and_then(value_text)
        .map(|text| text.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    StepMetadata::new(name, new_page, attributes)
}

fn decode_attributes(payload: &str) -> Attributes {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        Ok(other) => {
            tracing::warn!(
                payload,
                kind = value_kind(&other),
                "step metadata is not an object"
            );
            Attributes::new()
        }
        Err(err) => {
            tracing::warn!(payload, error = %err, "error parsing step metadata");
            Attributes::new()
        }
    }
}

/// Textual form used for `name`/`newPage` coercion. `null` counts as absent.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
