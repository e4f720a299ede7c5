use serde::de::DeserializeOwned;
use serde_json::{json, Map, Number, Value};
use tracing::debug;

use super::coerce::{coerce, NumberRule};

/// Kind of a declared field and how its raw value is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Decimal,
    /// Whole number no larger than `max`, the range of the model field
    Integer { max: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    const fn text(name: &'static str, required: bool) -> Self {
        Self { name, kind: FieldKind::Text, required, description: None }
    }

    const fn decimal(name: &'static str, required: bool) -> Self {
        Self { name, kind: FieldKind::Decimal, required, description: None }
    }

    const fn integer(name: &'static str, max: u64, required: bool) -> Self {
        Self { name, kind: FieldKind::Integer { max }, required, description: None }
    }

    const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Shape of the records requested from the extraction service.
///
/// The service fills an array of records under `root`; each record is checked
/// against `fields` and normalized before it is deserialized.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionSchema {
    pub root: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const LISTING_SCHEMA: ExtractionSchema = ExtractionSchema {
    root: "listings",
    description: "Объявления недвижимости на Avito",
    fields: &[
        FieldSpec::text("title", true),
        FieldSpec::decimal("price", true).describe("Listing price in rubles"),
        FieldSpec::text("location", true),
        FieldSpec::decimal("area", false).describe("Total area in square meters"),
        FieldSpec::integer("rooms", u32::MAX as u64, false),
        FieldSpec::text("floor", false),
        FieldSpec::text("description", false),
        FieldSpec::decimal("seller_rating", false),
        FieldSpec::integer("views", u64::MAX, false),
    ],
};

pub const PAGINATION_SCHEMA: ExtractionSchema = ExtractionSchema {
    root: "page_links",
    description: "Pagination links in the bottom of the page.",
    fields: &[FieldSpec::text("link", true)],
};

impl ExtractionSchema {
    /// JSON Schema handed to the extraction service
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields {
            let mut prop = match field.kind {
                FieldKind::Text => json!({ "type": "string" }),
                FieldKind::Decimal | FieldKind::Integer { .. } => json!({ "type": ["number", "string"] }),
            };
            if let Some(description) = field.description {
                prop["description"] = json!(description);
            }
            properties.insert(field.name.to_string(), prop);

            if field.required {
                required.push(field.name);
            }
        }

        json!({
            "type": "object",
            "properties": {
                self.root: {
                    "type": "array",
                    "description": self.description,
                    "items": {
                        "type": "object",
                        "properties": properties,
                        "required": required,
                    }
                }
            },
            "required": [self.root],
        })
    }

    /// Check one raw record and return it with every declared field normalized.
    ///
    /// Returns `None` when a required field is missing or cannot be coerced.
    /// Absent optional fields are left out; undeclared keys are dropped.
    pub fn normalize(&self, raw: &Map<String, Value>) -> Option<Map<String, Value>> {
        let mut out = Map::new();

        for field in self.fields {
            let value = raw.get(field.name).and_then(|v| normalize_value(v, field.kind));
            match value {
                Some(v) => {
                    out.insert(field.name.to_string(), v);
                }
                None if field.required => {
                    debug!(field = field.name, "Dropping record without required field");
                    return None;
                }
                None => {}
            }
        }

        Some(out)
    }

    /// Pull every valid record out of an extraction payload.
    ///
    /// A payload without the root array yields nothing. Records that fail
    /// validation are skipped without failing the rest.
    pub fn records<T: DeserializeOwned>(&self, payload: &Value) -> Vec<T> {
        let Some(items) = payload.get(self.root).and_then(Value::as_array) else {
            debug!(root = self.root, "Payload has no record array");
            return Vec::new();
        };

        items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|raw| self.normalize(raw))
            .filter_map(|record| match serde_json::from_value(Value::Object(record)) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!(error = %e, "Dropping record that does not fit the model");
                    None
                }
            })
            .collect()
    }
}

fn normalize_value(value: &Value, kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Text => match value {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
            }
            Value::Number(n) => Some(Value::String(n.to_string())),
            _ => None,
        },
        FieldKind::Integer { max } => {
            let n = coerce(value, NumberRule::Integer)?;
            (n >= 0.0 && n.fract() == 0.0 && n <= max as f64).then(|| Value::from(n as u64))
        }
        FieldKind::Decimal => {
            coerce(value, NumberRule::Decimal).and_then(Number::from_f64).map(Value::Number)
        }
    }
}
