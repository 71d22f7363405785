//! Keyword checks for generated JSON schemas.
//!
//! Deserialization settles the overall shape of a value. What it cannot see
//! are the constraints `schemars` writes from `#[validate(..)]` and
//! `#[schemars(..)]` attributes: numeric bounds, lengths, patterns, enums.
//! [`check`] enforces those against the same schema that was declared to the
//! provider.

use regex::Regex;
use serde_json::{Map, Value};

/// Returns the first violated keyword as `"<json pointer>: <reason>"`.
pub(crate) fn check(schema: &Value, value: &Value) -> Result<(), String> {
    Checker { root: schema }.check(schema, value, "")
}

struct Checker<'a> {
    root: &'a Value,
}

impl<'a> Checker<'a> {
    fn check(&self, schema: &'a Value, value: &Value, path: &str) -> Result<(), String> {
        let schema = match schema {
            Value::Object(schema) => schema,
            Value::Bool(false) => return Err(violation(path, "no value is allowed here")),
            _ => return Ok(()),
        };

        if let Some(Value::String(reference)) = schema.get("$ref") {
            let target = self.resolve(reference).ok_or_else(|| {
                violation(path, &format!("unresolvable schema reference '{reference}'"))
            })?;
            self.check(target, value, path)?;
        }

        if let Some(Value::Array(all)) = schema.get("allOf") {
            for sub in all {
                self.check(sub, value, path)?;
            }
        }
        for keyword in ["anyOf", "oneOf"] {
            if let Some(Value::Array(alternatives)) = schema.get(keyword) {
                self.check_alternatives(keyword, alternatives, value, path)?;
            }
        }

        check_type(schema, value, path)?;
        check_enum(schema, value, path)?;

        match value {
            Value::Number(_) => check_number(schema, value, path),
            Value::String(text) => check_string(schema, text, path),
            Value::Array(items) => self.check_array(schema, items, path),
            Value::Object(fields) => self.check_object(schema, fields, path),
            Value::Bool(_) | Value::Null => Ok(()),
        }
    }

    fn resolve(&self, reference: &str) -> Option<&'a Value> {
        let pointer = reference.strip_prefix('#')?;
        self.root.pointer(pointer)
    }

    fn check_alternatives(
        &self,
        keyword: &str,
        alternatives: &'a [Value],
        value: &Value,
        path: &str,
    ) -> Result<(), String> {
        let mut first_failure = None;
        for alternative in alternatives {
            match self.check(alternative, value, path) {
                Ok(()) => return Ok(()),
                Err(reason) => {
                    first_failure.get_or_insert(reason);
                }
            }
        }
        match first_failure {
            Some(reason) if alternatives.len() == 1 => Err(reason),
            Some(reason) => Err(violation(
                path,
                &format!("matches none of the {keyword} alternatives (first: {reason})"),
            )),
            None => Ok(()),
        }
    }

    fn check_array(
        &self,
        schema: &'a Map<String, Value>,
        items: &[Value],
        path: &str,
    ) -> Result<(), String> {
        if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                return Err(violation(
                    path,
                    &format!("{} items is fewer than minItems {min}", items.len()),
                ));
            }
        }
        if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > max {
                return Err(violation(
                    path,
                    &format!("{} items is more than maxItems {max}", items.len()),
                ));
            }
        }
        if schema.get("uniqueItems") == Some(&Value::Bool(true)) {
            for (index, item) in items.iter().enumerate() {
                if items[..index].contains(item) {
                    return Err(violation(
                        &child(path, &index.to_string()),
                        "duplicate item violates uniqueItems",
                    ));
                }
            }
        }

        match schema.get("items") {
            Some(Value::Array(positional)) => {
                for (index, (item, sub)) in items.iter().zip(positional).enumerate() {
                    self.check(sub, item, &child(path, &index.to_string()))?;
                }
            }
            Some(sub) => {
                for (index, item) in items.iter().enumerate() {
                    self.check(sub, item, &child(path, &index.to_string()))?;
                }
            }
            None => {}
        }
        Ok(())
    }

    fn check_object(
        &self,
        schema: &'a Map<String, Value>,
        fields: &Map<String, Value>,
        path: &str,
    ) -> Result<(), String> {
        if let Some(Value::Array(required)) = schema.get("required") {
            for name in required.iter().filter_map(Value::as_str) {
                if !fields.contains_key(name) {
                    return Err(violation(path, &format!("missing required property `{name}`")));
                }
            }
        }

        let properties = schema.get("properties").and_then(Value::as_object);
        for (name, field) in fields {
            let field_path = child(path, name);
            match properties.and_then(|properties| properties.get(name)) {
                Some(sub) => self.check(sub, field, &field_path)?,
                None => {
                    if let Some(extra) = schema.get("additionalProperties") {
                        self.check(extra, field, &field_path)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_type(schema: &Map<String, Value>, value: &Value, path: &str) -> Result<(), String> {
    let allowed: Vec<&str> = match schema.get("type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => return Ok(()),
    };
    if allowed.iter().any(|name| has_type(value, name)) {
        return Ok(());
    }
    Err(violation(
        path,
        &format!("{value} is not of type {}", allowed.join(" or ")),
    ))
}

fn has_type(value: &Value, name: &str) -> bool {
    match name {
        "null" => value.is_null(),
        "boolean" => value.is_boolean(),
        "string" => value.is_string(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|number| number.fract() == 0.0)
        }
        _ => true,
    }
}

fn check_enum(schema: &Map<String, Value>, value: &Value, path: &str) -> Result<(), String> {
    if let Some(Value::Array(options)) = schema.get("enum") {
        if !options.contains(value) {
            return Err(violation(
                path,
                &format!("{value} is not one of {}", Value::Array(options.clone())),
            ));
        }
    }
    if let Some(expected) = schema.get("const") {
        if expected != value {
            return Err(violation(path, &format!("{value} is not the constant {expected}")));
        }
    }
    Ok(())
}

fn check_number(schema: &Map<String, Value>, value: &Value, path: &str) -> Result<(), String> {
    let Some(number) = value.as_f64() else {
        return Ok(());
    };
    let bound = |keyword: &str| schema.get(keyword).and_then(Value::as_f64);

    if let Some(min) = bound("minimum") {
        if number < min {
            return Err(violation(path, &format!("{value} is less than minimum {min}")));
        }
    }
    if let Some(max) = bound("maximum") {
        if number > max {
            return Err(violation(path, &format!("{value} is greater than maximum {max}")));
        }
    }
    if let Some(min) = bound("exclusiveMinimum") {
        if number <= min {
            return Err(violation(
                path,
                &format!("{value} is not greater than exclusiveMinimum {min}"),
            ));
        }
    }
    if let Some(max) = bound("exclusiveMaximum") {
        if number >= max {
            return Err(violation(
                path,
                &format!("{value} is not less than exclusiveMaximum {max}"),
            ));
        }
    }
    Ok(())
}

fn check_string(schema: &Map<String, Value>, text: &str, path: &str) -> Result<(), String> {
    let length = text.chars().count() as u64;

    if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
        if length < min {
            return Err(violation(
                path,
                &format!("length {length} is shorter than minLength {min}"),
            ));
        }
    }
    if let Some(max) = schema.get("maxLength").and_then(Value::as_u64) {
        if length > max {
            return Err(violation(
                path,
                &format!("length {length} is longer than maxLength {max}"),
            ));
        }
    }
    if let Some(Value::String(pattern)) = schema.get("pattern") {
        let regex = Regex::new(pattern)
            .map_err(|err| violation(path, &format!("invalid pattern '{pattern}': {err}")))?;
        if !regex.is_match(text) {
            return Err(violation(
                path,
                &format!("{text:?} does not match pattern '{pattern}'"),
            ));
        }
    }
    Ok(())
}

fn child(path: &str, segment: &str) -> String {
    format!("{path}/{}", segment.replace('~', "~0").replace('/', "~1"))
}

fn violation(path: &str, reason: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    format!("{path}: {reason}")
}
