//! Decoding helpers for the broker's response envelopes.
//!
//! Tradier wraps collections in a double envelope whose inner value may
//! be a single object or an array (`{"quotes":{"quote": {...}}}` vs
//! `{"quotes":{"quote": [...]}}`), and renders empty collections as
//! `"null"`. Decoders here tolerate all three shapes, and treat JSON
//! nulls like absent fields so a partial response still decodes;
//! required-field enforcement belongs to the response validator.

use crate::Error;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Either one `T` or many, as the broker pleases.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// Field-level deserializer for spots where the broker emits either one
/// object or an array. Missing and null both read as empty.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(value.map(OneOrMany::into_vec).unwrap_or_default())
}

/// Decode a `T`, treating nulls as absent so `#[serde(default)]` fields
/// fall back to zero/empty instead of failing the decode.
pub(crate) fn decode<T: DeserializeOwned>(mut value: Value) -> Result<T, Error> {
    strip_nulls(&mut value);
    Ok(serde_json::from_value(value)?)
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                strip_nulls(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_nulls(item);
            }
        }
        _ => {}
    }
}

/// Walk `outer` then `inner` in the double envelope and decode whatever
/// collection shape shows up. Missing, null, and `"null"` all decode to
/// an empty vec.
pub(crate) fn collection<T: DeserializeOwned>(
    value: &Value,
    outer: &str,
    inner: &str,
) -> Result<Vec<T>, Error> {
    let nested = match value.get(outer) {
        Some(Value::Object(map)) => match map.get(inner) {
            Some(nested) => nested,
            None => return Ok(Vec::new()),
        },
        // `{"positions":"null"}` and friends.
        Some(Value::Null) | Some(Value::String(_)) | None => return Ok(Vec::new()),
        Some(other) => other,
    };

    if nested.is_null() {
        return Ok(Vec::new());
    }

    let one_or_many: OneOrMany<Value> = serde_json::from_value(nested.clone())?;
    one_or_many.into_vec().into_iter().map(decode).collect()
}

/// Walk a key path into the envelope and decode a single object.
pub(crate) fn single<T: DeserializeOwned>(value: &Value, path: &[&str]) -> Result<T, Error> {
    let mut current = value;
    for key in path {
        current = current.get(key).unwrap_or(&Value::Null);
    }
    decode(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Item {
        symbol: String,
        last: f64,
    }

    #[test]
    fn single_object_and_array_shapes_both_decode() {
        let as_object = json!({"quotes": {"quote": {"symbol": "AAPL", "last": 150.35}}});
        let as_array = json!({"quotes": {"quote": [
            {"symbol": "AAPL", "last": 150.35},
            {"symbol": "MSFT", "last": 410.10}
        ]}});

        let one: Vec<Item> = collection(&as_object, "quotes", "quote").unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].symbol, "AAPL");

        let two: Vec<Item> = collection(&as_array, "quotes", "quote").unwrap();
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn empty_shapes_decode_to_empty() {
        for value in [
            json!({"positions": "null"}),
            json!({"positions": null}),
            json!({}),
            json!({"positions": {}}),
        ] {
            let items: Vec<Item> = collection(&value, "positions", "position").unwrap();
            assert!(items.is_empty(), "failed for {value}");
        }
    }

    #[test]
    fn nulls_read_as_absent() {
        let value = json!({"symbol": "AAPL", "last": null});
        let item: Item = decode(value).unwrap();
        assert_eq!(item.symbol, "AAPL");
        assert_eq!(item.last, 0.0);
    }

    #[test]
    fn single_walks_a_path() {
        let value = json!({"stream": {"sessionid": "abc", "url": "wss://x"}});
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Ticket {
            sessionid: String,
        }
        let ticket: Ticket = single(&value, &["stream"]).unwrap();
        assert_eq!(ticket.sessionid, "abc");
    }
}
