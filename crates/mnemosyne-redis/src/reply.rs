//! Raw reply decoding helpers
//!
//! Map-shaped replies (HGETALL, TS.INFO) arrive either as a RESP3 map or a
//! RESP2 flat array of alternating field/value entries; these helpers
//! normalize both shapes.

use redis::Value;

/// Field/value pairs from a map-shaped reply. Non-string field names are
/// dropped.
pub(crate) fn pairs(value: Value) -> Vec<(String, Value)> {
    match value {
        Value::Map(entries) => entries
            .into_iter()
            .filter_map(|(field, value)| text(field).map(|field| (field, value)))
            .collect(),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len() / 2);
            let mut it = items.into_iter();
            while let (Some(field), Some(value)) = (it.next(), it.next()) {
                if let Some(field) = text(field) {
                    out.push((field, value));
                }
            }
            out
        }
        _ => Vec::new(),
    }
}

/// Field/value pairs with string values, e.g. an HGETALL reply
pub(crate) fn string_pairs(value: Value) -> Vec<(String, String)> {
    pairs(value)
        .into_iter()
        .filter_map(|(field, value)| text(value).map(|value| (field, value)))
        .collect()
}

/// String content of a reply element, if it has one
pub(crate) fn text(value: Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes).ok(),
        Value::SimpleString(s) => Some(s),
        Value::VerbatimString { text, .. } => Some(text),
        _ => None,
    }
}
