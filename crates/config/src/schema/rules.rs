//! Data-driven schema interpreter.
//!
//! A schema is plain data: an object of named fields, each with a kind,
//! constraints, a required flag and an optional default. Unknown keys in the
//! candidate are passed through untouched.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{SchemaValidator, ValidationOutcome};

/// Extra format checks for string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Absolute URL with a scheme.
    Url,
}

#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub one_of: Vec<String>,
    pub format: Option<StringFormat>,
}

#[derive(Debug, Clone, Default)]
pub struct NumberRules {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    String(StringRules),
    Number(NumberRules),
    Boolean,
    Array(Box<Field>),
    Object(ObjectSchema),
    Any,
}

/// A single schema field.
#[derive(Debug, Clone)]
pub struct Field {
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
}

impl Field {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String(StringRules::default()))
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number(NumberRules::default()))
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn array(item: Field) -> Self {
        Self::of(FieldKind::Array(Box::new(item)))
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::of(FieldKind::Object(schema))
    }

    pub fn any() -> Self {
        Self::of(FieldKind::Any)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min_len(mut self, len: usize) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.min_len = Some(len);
        }
        self
    }

    pub fn max_len(mut self, len: usize) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.max_len = Some(len);
        }
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.one_of = values.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn url(mut self) -> Self {
        if let FieldKind::String(rules) = &mut self.kind {
            rules.format = Some(StringFormat::Url);
        }
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.min = Some(min);
        }
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.max = Some(max);
        }
        self
    }

    pub fn integer(mut self) -> Self {
        if let FieldKind::Number(rules) = &mut self.kind {
            rules.integer = true;
        }
        self
    }

    /// Validate `value` (absent when `None`) at `path`, returning the
    /// normalized value to store, if any.
    fn check(&self, value: Option<&Value>, path: &str, errors: &mut Vec<String>) -> Option<Value> {
        let value = value.filter(|v| !v.is_null());

        let Some(value) = value else {
            if let Some(default) = &self.default {
                return Some(default.clone());
            }
            return match &self.kind {
                // Required objects report their missing leaves rather than themselves.
                FieldKind::Object(schema) if self.required => {
                    Some(schema.check(&Map::new(), path, errors))
                }
                FieldKind::Object(schema) => schema.defaults_only(),
                _ if self.required => {
                    errors.push(format!("{}: Required", display_path(path)));
                    None
                }
                _ => None,
            };
        };

        match &self.kind {
            FieldKind::String(rules) => check_string(rules, value, path, errors),
            FieldKind::Number(rules) => check_number(rules, value, path, errors),
            FieldKind::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                other => {
                    errors.push(type_error(path, "boolean", other));
                    None
                }
            },
            FieldKind::Array(item) => match value {
                Value::Array(items) => Some(Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .filter_map(|(idx, entry)| {
                            item.check(Some(entry), &join(path, &idx.to_string()), errors)
                        })
                        .collect(),
                )),
                other => {
                    errors.push(type_error(path, "array", other));
                    None
                }
            },
            FieldKind::Object(schema) => match value {
                Value::Object(map) => Some(schema.check(map, path, errors)),
                other => {
                    errors.push(type_error(path, "object", other));
                    None
                }
            },
            FieldKind::Any => Some(value.clone()),
        }
    }
}

fn check_string(rules: &StringRules, value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let Value::String(text) = value else {
        errors.push(type_error(path, "string", value));
        return None;
    };
    let before = errors.len();
    let len = text.chars().count();

    if let Some(min) = rules.min_len
        && len < min
    {
        errors.push(format!(
            "{}: String must contain at least {min} character(s)",
            display_path(path)
        ));
    }
    if let Some(max) = rules.max_len
        && len > max
    {
        errors.push(format!(
            "{}: String must contain at most {max} character(s)",
            display_path(path)
        ));
    }
    if !rules.one_of.is_empty() && !rules.one_of.iter().any(|allowed| allowed == text) {
        let expected = rules
            .one_of
            .iter()
            .map(|allowed| format!("'{allowed}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        errors.push(format!(
            "{}: Invalid enum value. Expected {expected}, received '{text}'",
            display_path(path)
        ));
    }
    if rules.format == Some(StringFormat::Url) && url::Url::parse(text).is_err() {
        errors.push(format!("{}: Invalid url", display_path(path)));
    }

    (errors.len() == before).then(|| value.clone())
}

fn check_number(rules: &NumberRules, value: &Value, path: &str, errors: &mut Vec<String>) -> Option<Value> {
    let Some(number) = value.as_f64() else {
        errors.push(type_error(path, "number", value));
        return None;
    };
    let before = errors.len();

    if rules.integer && number.fract() != 0.0 {
        errors.push(format!(
            "{}: Expected integer, received float",
            display_path(path)
        ));
    }
    if let Some(min) = rules.min
        && number < min
    {
        errors.push(format!(
            "{}: Number must be greater than or equal to {min}",
            display_path(path)
        ));
    }
    if let Some(max) = rules.max
        && number > max
    {
        errors.push(format!(
            "{}: Number must be less than or equal to {max}",
            display_path(path)
        ));
    }

    (errors.len() == before).then(|| value.clone())
}

/// An object with named fields.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, Field>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn check(&self, map: &Map<String, Value>, path: &str, errors: &mut Vec<String>) -> Value {
        let mut normalized = map.clone();
        for (name, field) in &self.fields {
            let field_path = join(path, name);
            match field.check(map.get(name), &field_path, errors) {
                Some(value) => {
                    normalized.insert(name.clone(), value);
                }
                None => {
                    normalized.remove(name);
                }
            }
        }
        Value::Object(normalized)
    }

    /// Tree made only of declared defaults, `None` when there are none.
    fn defaults_only(&self) -> Option<Value> {
        let mut out = Map::new();
        for (name, field) in &self.fields {
            let value = match (&field.default, &field.kind) {
                (Some(default), _) => Some(default.clone()),
                (None, FieldKind::Object(schema)) => schema.defaults_only(),
                _ => None,
            };
            if let Some(value) = value {
                out.insert(name.clone(), value);
            }
        }
        (!out.is_empty()).then_some(Value::Object(out))
    }
}

/// A root schema over a whole configuration tree.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    root: ObjectSchema,
}

impl Schema {
    pub fn new(root: ObjectSchema) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ObjectSchema {
        &self.root
    }
}

impl SchemaValidator for Schema {
    fn validate(&self, candidate: &Value) -> ValidationOutcome {
        let mut errors = Vec::new();
        let normalized = match candidate {
            Value::Object(map) => self.root.check(map, "", &mut errors),
            other => {
                errors.push(type_error("", "object", other));
                Value::Null
            }
        };

        if errors.is_empty() {
            ValidationOutcome::success(normalized)
        } else {
            ValidationOutcome::failure(errors)
        }
    }

    fn validate_section(&self, section: &str, value: &Value) -> Option<ValidationOutcome> {
        let field = self.root.get(section)?;
        let mut errors = Vec::new();
        let normalized = field.check(Some(value), section, &mut errors);

        Some(if errors.is_empty() {
            ValidationOutcome::success(normalized.unwrap_or(Value::Null))
        } else {
            ValidationOutcome::failure(errors)
        })
    }
}

fn type_error(path: &str, expected: &str, received: &Value) -> String {
    format!(
        "{}: Expected {expected}, received {}",
        display_path(path),
        type_name(received)
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "(root)" } else { path }
}
