//! Schema Contracts
//!
//! Declarative description of the JSON shapes the remote model must produce.
//! A contract is a table of [`Rule`]s interpreted by one recursive validator, and
//! the same table is rendered into the response schema sent with each request,
//! so the constraint the model sees and the constraint enforced here are one value.

use crate::error::ValidationError;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

mod contracts;

pub use contracts::MAX_BLUEPRINT_PARTS;

/// Extra lexical constraints on string fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
    HexColor,
}

/// Validation rule for one JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    String {
        one_of: Option<Vec<&'static str>>,
        format: Option<StringFormat>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Array {
        items: Box<Rule>,
        min_items: usize,
        max_items: Option<usize>,
        /// Object key whose values must be distinct across items
        unique_by: Option<&'static str>,
    },
    Object {
        fields: Vec<Field>,
    },
}

impl Rule {
    pub fn string() -> Self {
        Rule::String {
            one_of: None,
            format: None,
        }
    }

    /// String restricted to a case-sensitive set of literals
    pub fn one_of(literals: &[&'static str]) -> Self {
        Rule::String {
            one_of: Some(literals.to_vec()),
            format: None,
        }
    }

    pub fn hex_color() -> Self {
        Rule::String {
            one_of: None,
            format: Some(StringFormat::HexColor),
        }
    }

    pub fn number() -> Self {
        Rule::Number {
            min: None,
            max: None,
        }
    }

    /// Number within `[min, max]`, inclusive
    pub fn number_between(min: f64, max: f64) -> Self {
        Rule::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn array(items: Rule) -> Self {
        Rule::Array {
            items: Box::new(items),
            min_items: 0,
            max_items: None,
            unique_by: None,
        }
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Rule::Object { fields }
    }

    pub fn min_items(mut self, n: usize) -> Self {
        if let Rule::Array { min_items, .. } = &mut self {
            *min_items = n;
        }
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        if let Rule::Array { max_items, .. } = &mut self {
            *max_items = Some(n);
        }
        self
    }

    pub fn exact_items(self, n: usize) -> Self {
        self.min_items(n).max_items(n)
    }

    pub fn unique_by(mut self, key: &'static str) -> Self {
        if let Rule::Array { unique_by, .. } = &mut self {
            *unique_by = Some(key);
        }
        self
    }
}

/// Named member of an object rule
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl Field {
    pub fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: false,
            description: None,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// A named output shape
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaContract {
    name: &'static str,
    root: Rule,
}

impl SchemaContract {
    pub fn new(name: &'static str, root: Rule) -> Self {
        Self { name, root }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn root(&self) -> &Rule {
        &self.root
    }

    /// Check a decoded response against the contract.
    ///
    /// Reports the first violation found, walking fields in declaration order.
    pub fn validate(&self, raw: &Value) -> Result<(), ValidationError> {
        check(&self.root, raw, "$")
    }

    /// Render the contract as the provider's declarative response schema.
    pub fn response_schema(&self) -> Value {
        render(&self.root)
    }
}

fn check(rule: &Rule, value: &Value, path: &str) -> Result<(), ValidationError> {
    match rule {
        Rule::String { one_of, format } => {
            let s = value
                .as_str()
                .ok_or_else(|| kind_mismatch(path, "string", value))?;
            if let Some(literals) = one_of {
                if !literals.contains(&s) {
                    return Err(ValidationError::new(
                        path,
                        format!("`{}` is not one of [{}]", s, literals.join(", ")),
                    ));
                }
            }
            if let Some(StringFormat::HexColor) = format {
                if !is_hex_color(s) {
                    return Err(ValidationError::new(
                        path,
                        format!("`{}` is not a hex colour", s),
                    ));
                }
            }
            Ok(())
        }
        Rule::Number { min, max } => {
            let n = value
                .as_f64()
                .ok_or_else(|| kind_mismatch(path, "number", value))?;
            if let Some(min) = min {
                if n < *min {
                    return Err(ValidationError::new(
                        path,
                        format!("{} is below the minimum of {}", n, min),
                    ));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(ValidationError::new(
                        path,
                        format!("{} is above the maximum of {}", n, max),
                    ));
                }
            }
            Ok(())
        }
        Rule::Array {
            items,
            min_items,
            max_items,
            unique_by,
        } => {
            let elements = value
                .as_array()
                .ok_or_else(|| kind_mismatch(path, "array", value))?;
            if elements.len() < *min_items {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "expected at least {} item(s), got {}",
                        min_items,
                        elements.len()
                    ),
                ));
            }
            if let Some(max) = max_items {
                if elements.len() > *max {
                    return Err(ValidationError::new(
                        path,
                        format!("expected at most {} item(s), got {}", max, elements.len()),
                    ));
                }
            }
            for (i, element) in elements.iter().enumerate() {
                check(items, element, &index_path(path, i))?;
            }
            if let Some(key) = unique_by {
                let mut seen = HashSet::new();
                for (i, element) in elements.iter().enumerate() {
                    let id = element.get(*key).map(Value::to_string).unwrap_or_default();
                    if !seen.insert(id.clone()) {
                        return Err(ValidationError::new(
                            child_path(&index_path(path, i), key),
                            format!("duplicate value {}", id),
                        ));
                    }
                }
            }
            Ok(())
        }
        Rule::Object { fields } => {
            let object = value
                .as_object()
                .ok_or_else(|| kind_mismatch(path, "object", value))?;
            for field in fields {
                let field_path = child_path(path, field.name);
                match object.get(field.name) {
                    None => {
                        if field.required {
                            return Err(ValidationError::new(
                                field_path,
                                "required field is missing",
                            ));
                        }
                    }
                    Some(Value::Null) if !field.required => {}
                    Some(child) => check(&field.rule, child, &field_path)?,
                }
            }
            Ok(())
        }
    }
}

fn render(rule: &Rule) -> Value {
    match rule {
        Rule::String { one_of, .. } => {
            let mut schema = json!({ "type": "STRING" });
            if let Some(literals) = one_of {
                schema["enum"] = json!(literals);
            }
            schema
        }
        Rule::Number { min, max } => {
            let mut schema = json!({ "type": "NUMBER" });
            if let Some(min) = min {
                schema["minimum"] = json!(min);
            }
            if let Some(max) = max {
                schema["maximum"] = json!(max);
            }
            schema
        }
        Rule::Array {
            items,
            min_items,
            max_items,
            ..
        } => {
            let mut schema = json!({ "type": "ARRAY", "items": render(items) });
            if *min_items > 0 {
                schema["minItems"] = json!(min_items);
            }
            if let Some(max) = max_items {
                schema["maxItems"] = json!(max);
            }
            schema
        }
        Rule::Object { fields } => {
            let mut properties = Map::new();
            for field in fields {
                let mut property = render(&field.rule);
                if let Some(description) = field.description {
                    property["description"] = json!(description);
                }
                properties.insert(field.name.to_string(), property);
            }
            let ordering: Vec<&str> = fields.iter().map(|f| f.name).collect();
            let required: Vec<&str> = fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect();
            json!({
                "type": "OBJECT",
                "properties": properties,
                "propertyOrdering": ordering,
                "required": required,
            })
        }
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "$" {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    if parent == "$" {
        format!("[{}]", index)
    } else {
        format!("{}[{}]", parent, index)
    }
}

fn kind_mismatch(path: &str, expected: &str, actual: &Value) -> ValidationError {
    ValidationError::new(
        path,
        format!("expected {}, got {}", expected, value_kind(actual)),
    )
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
