//! Key-case transcoding between the wire format and the in-memory format
//!
//! The backend speaks snake_case JSON; everything above the API client sees
//! camelCase keys. These functions are the only place the two meet.

use serde_json::{Map, Value};

/// Converts a single snake_case key to camelCase
///
/// Every `_` followed by an ASCII lowercase letter is replaced by that letter
/// uppercased. Underscores before anything else are kept as-is.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

/// Converts a single camelCase key to snake_case
///
/// Every ASCII uppercase letter becomes `_` plus its lowercase form.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);

    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Recursively rewrites every mapping key to camelCase
pub fn camelize(value: &Value) -> Value {
    transform(value, &to_camel_case)
}

/// Recursively rewrites every mapping key to snake_case
pub fn decamelize(value: &Value) -> Value {
    transform(value, &to_snake_case)
}

/// Owned variant of [`camelize`], avoids cloning scalars
pub fn camelize_owned(value: Value) -> Value {
    transform_owned(value, &to_camel_case)
}

/// Owned variant of [`decamelize`], avoids cloning scalars
pub fn decamelize_owned(value: Value) -> Value {
    transform_owned(value, &to_snake_case)
}

fn transform(value: &Value, key_fn: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| transform(v, key_fn)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (key_fn(k), transform(v, key_fn)))
                .collect::<Map<String, Value>>(),
        ),
        scalar => scalar.clone(),
    }
}

fn transform_owned(value: Value, key_fn: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| transform_owned(v, key_fn))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (key_fn(&k), transform_owned(v, key_fn)))
                .collect::<Map<String, Value>>(),
        ),
        scalar => scalar,
    }
}
