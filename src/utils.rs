// This file is part of the terraform-provider-fmgdevice project
//
// Copyright (C) the terraform-provider-fmgdevice authors, 2024-2026. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

pub(crate) type JsonObject = serde_json::Map<String, JsonValue>;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

#[async_trait]
pub(crate) trait WithValidate {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

pub(crate) trait WithNormalize {
    fn normalize(&mut self, diags: &mut Diagnostics);
}

/// Serialize the configured attributes into an API payload.
///
/// Attribute names are underscore separated on the Terraform side and
/// hyphen separated on the API side. Null and unknown values are left
/// out of the payload so the device keeps its own defaults.
pub(crate) trait WithExpand {
    fn expand(&self) -> JsonValue;
}

/// Refresh the state in place from an API object.
pub(crate) trait WithFlatten {
    fn flatten(&mut self, obj: &JsonValue);
}

pub(crate) fn get_str<'a>(obj: &JsonValue, key: &str) -> ValueString<'a> {
    match obj.get(key) {
        Some(JsonValue::String(s)) => Value::Value(Cow::Owned(s.clone())),
        // enum values come back as bare numbers on some firmware builds
        Some(JsonValue::Number(n)) => Value::Value(Cow::Owned(n.to_string())),
        _ => Value::Null,
    }
}

pub(crate) fn get_i64(obj: &JsonValue, key: &str) -> ValueNumber {
    match obj.get(key) {
        Some(JsonValue::Number(n)) => n.as_i64().map_or(Value::Null, Value::Value),
        Some(JsonValue::String(s)) => s.parse().map_or(Value::Null, Value::Value),
        _ => Value::Null,
    }
}

/// Password fields are reported as `ENC ...` blobs or rows of `*`.
/// Those placeholders must never replace the configured value, or every
/// refresh would produce a spurious diff.
pub(crate) fn is_masked(value: &str) -> bool {
    value.starts_with("ENC ") || (!value.is_empty() && value.bytes().all(|b| b == b'*'))
}

pub(crate) fn get_secret<'a>(obj: &JsonValue, key: &str, prior: ValueString<'a>) -> ValueString<'a> {
    match obj.get(key) {
        Some(JsonValue::String(s)) if !is_masked(s) => Value::Value(Cow::Owned(s.clone())),
        _ => prior,
    }
}

/// Member lists are returned either as arrays or as a single
/// space-joined scalar depending on the firmware version.
pub(crate) fn get_str_list<'a>(obj: &JsonValue, key: &str) -> ValueList<ValueString<'a>> {
    match obj.get(key) {
        Some(JsonValue::Array(items)) => Value::Value(
            items
                .iter()
                .filter_map(|item| match item {
                    JsonValue::String(s) => Some(Value::Value(Cow::Owned(s.clone()))),
                    JsonValue::Number(n) => Some(Value::Value(Cow::Owned(n.to_string()))),
                    _ => None,
                })
                .collect(),
        ),
        Some(JsonValue::String(s)) if !s.is_empty() => Value::Value(
            s.split_whitespace()
                .map(|part| Value::Value(Cow::Owned(part.to_string())))
                .collect(),
        ),
        _ => Value::Null,
    }
}

pub(crate) fn get_i64_list(obj: &JsonValue, key: &str) -> ValueList<ValueNumber> {
    match obj.get(key) {
        Some(JsonValue::Array(items)) => Value::Value(
            items
                .iter()
                .filter_map(JsonValue::as_i64)
                .map(Value::Value)
                .collect(),
        ),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(n) => Value::Value(vec![Value::Value(n)]),
            None => Value::Null,
        },
        Some(JsonValue::String(s)) if !s.is_empty() => Value::Value(
            s.split_whitespace()
                .filter_map(|part| part.parse().ok())
                .map(Value::Value)
                .collect(),
        ),
        _ => Value::Null,
    }
}

/// Collapse a list-or-scalar answer into the space-joined string form
/// used by flag attributes such as `options` or `link-cost-factor`.
pub(crate) fn get_joined<'a>(obj: &JsonValue, key: &str) -> ValueString<'a> {
    match obj.get(key) {
        Some(JsonValue::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    JsonValue::String(s) => Some(s.clone()),
                    JsonValue::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                Value::Null
            } else {
                Value::Value(Cow::Owned(parts.join(" ")))
            }
        }
        Some(JsonValue::String(s)) => Value::Value(Cow::Owned(s.clone())),
        Some(JsonValue::Number(n)) => Value::Value(Cow::Owned(n.to_string())),
        _ => Value::Null,
    }
}

pub(crate) fn get_table<T>(
    obj: &JsonValue,
    key: &str,
    flatten_row: impl Fn(&JsonValue) -> T,
) -> ValueList<Value<T>> {
    match obj.get(key) {
        Some(JsonValue::Array(items)) => Value::Value(
            items
                .iter()
                .map(|item| Value::Value(flatten_row(item)))
                .collect(),
        ),
        _ => Value::Null,
    }
}

pub(crate) fn set_str(obj: &mut JsonObject, key: &str, value: &ValueString<'_>) {
    if let Some(value) = value.as_deref_option() {
        obj.insert(key.into(), json!(value));
    }
}

pub(crate) fn set_i64(obj: &mut JsonObject, key: &str, value: &ValueNumber) {
    if let Value::Value(value) = value {
        obj.insert(key.into(), json!(value));
    }
}

pub(crate) fn set_str_list(obj: &mut JsonObject, key: &str, value: &ValueList<ValueString<'_>>) {
    if value.is_null() || value.is_unknown() {
        return;
    }
    let items: Vec<JsonValue> = value
        .iter()
        .flatten()
        .filter_map(|item| item.as_deref_option())
        .map(|item| json!(item))
        .collect();
    obj.insert(key.into(), JsonValue::Array(items));
}

pub(crate) fn set_i64_list(obj: &mut JsonObject, key: &str, value: &ValueList<ValueNumber>) {
    if value.is_null() || value.is_unknown() {
        return;
    }
    let items: Vec<JsonValue> = value
        .iter()
        .flatten()
        .filter_map(|item| item.as_ref_option())
        .map(|item| json!(item))
        .collect();
    obj.insert(key.into(), JsonValue::Array(items));
}

pub(crate) fn set_table<T>(
    obj: &mut JsonObject,
    key: &str,
    rows: &ValueList<Value<T>>,
    expand_row: impl Fn(&T) -> JsonValue,
) {
    if rows.is_null() || rows.is_unknown() {
        return;
    }
    let items: Vec<JsonValue> = rows
        .iter()
        .flatten()
        .filter_map(|row| row.as_ref_option())
        .map(expand_row)
        .collect();
    obj.insert(key.into(), JsonValue::Array(items));
}

pub(crate) fn validate_choice(
    diags: &mut Diagnostics,
    attr_path: AttributePath,
    attr: &'static str,
    value: &ValueString<'_>,
    choices: &[&str],
) {
    if let Some(value) = value.as_deref_option() {
        if !choices.contains(&value) {
            diags.error(
                format!("Invalid value for `{attr}`"),
                format!("`{value}` is not one of: {}.", choices.join(", ")),
                attr_path.attribute(attr),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_fields_tolerate_numeric_answers() {
        let obj = json!({"interval": 500, "protocol": "ping"});
        assert_eq!(get_str(&obj, "protocol"), Value::Value(Cow::from("ping")));
        assert_eq!(get_str(&obj, "interval"), Value::Value(Cow::from("500")));
        assert_eq!(get_str(&obj, "missing"), ValueString::Null);
    }

    #[test]
    fn numeric_fields_tolerate_string_answers() {
        let obj = json!({"port": "8080", "failtime": 5});
        assert_eq!(get_i64(&obj, "port"), Value::Value(8080));
        assert_eq!(get_i64(&obj, "failtime"), Value::Value(5));
        assert_eq!(get_i64(&obj, "missing"), ValueNumber::Null);
    }

    #[test]
    fn string_lists_accept_joined_scalars() {
        let obj = json!({"as_list": ["a", "b"], "as_scalar": "a b"});
        let expected: ValueList<ValueString> = Value::Value(vec![
            Value::Value(Cow::from("a")),
            Value::Value(Cow::from("b")),
        ]);
        assert_eq!(get_str_list(&obj, "as_list"), expected);
        assert_eq!(get_str_list(&obj, "as_scalar"), expected);
    }

    #[test]
    fn integer_lists_accept_scalars() {
        let obj = json!({"members": [1, 2], "single": 3});
        assert_eq!(
            get_i64_list(&obj, "members"),
            Value::Value(vec![Value::Value(1), Value::Value(2)]),
        );
        assert_eq!(
            get_i64_list(&obj, "single"),
            Value::Value(vec![Value::Value(3)]),
        );
    }

    #[test]
    fn joined_fields_collapse_arrays() {
        let obj = json!({"options": ["include-table-of-content", "view-chart-as-heading"]});
        assert_eq!(
            get_joined(&obj, "options"),
            Value::Value(Cow::from(
                "include-table-of-content view-chart-as-heading"
            )),
        );
    }

    #[test]
    fn masked_secrets_keep_prior_state() {
        let obj = json!({"passwd": "ENC XXYYZZ", "stars": "********"});
        let prior: ValueString = Value::Value(Cow::from("hunter2"));
        assert_eq!(get_secret(&obj, "passwd", prior.clone()), prior);
        assert_eq!(get_secret(&obj, "stars", prior.clone()), prior);
        assert_eq!(get_secret(&obj, "absent", prior.clone()), prior);

        let rotated = json!({"passwd": "cleartext"});
        assert_eq!(
            get_secret(&rotated, "passwd", prior),
            Value::Value(Cow::from("cleartext")),
        );
    }

    #[test]
    fn expand_skips_unset_attributes() {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "status", &Value::Value(Cow::from("enable")));
        set_str(&mut obj, "unset", &ValueString::Null);
        set_str(&mut obj, "unknown", &ValueString::Unknown);
        set_i64(&mut obj, "port", &Value::Value(443));
        set_i64(&mut obj, "no-port", &ValueNumber::Null);
        assert_eq!(
            JsonValue::Object(obj),
            json!({"status": "enable", "port": 443}),
        );
    }

    #[test]
    fn tables_round_trip_through_helpers() {
        let rows: ValueList<Value<(ValueNumber, ValueString)>> = Value::Value(vec![Value::Value((
            Value::Value(1),
            Value::Value(Cow::from("49.0001.1921.6800.1001.00")),
        ))]);
        let mut obj = JsonObject::new();
        set_table(&mut obj, "net", &rows, |(id, net)| {
            let mut row = JsonObject::new();
            set_i64(&mut row, "id", id);
            set_str(&mut row, "net", net);
            JsonValue::Object(row)
        });
        let obj = JsonValue::Object(obj);
        assert_eq!(
            obj,
            json!({"net": [{"id": 1, "net": "49.0001.1921.6800.1001.00"}]}),
        );

        let parsed = get_table(&obj, "net", |row| (get_i64(row, "id"), get_str(row, "net")));
        assert_eq!(parsed, rows);
    }
}
