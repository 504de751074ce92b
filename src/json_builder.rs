//! Append-only compact JSON writer.
//!
//! Inbound decoding in this crate goes through serde; this writer exists
//! for the outbound paths where byte-for-byte deterministic output
//! matters: streaming control frames and monetary fields, which must
//! serialize with fixed precision so the server sees the same price text
//! on every submission. `serde_json`'s serializer offers no per-field
//! precision control, hence the hand-held builder.
//!
//! The builder tracks a first-child flag per nesting level and inserts
//! commas automatically. It never validates nested payloads written with
//! [`JsonBuilder::field_raw`]; callers must only pass well-formed text.

/// Append-only writer producing compact JSON.
#[derive(Debug, Default)]
pub struct JsonBuilder {
    buf: String,
    // One flag per open object/array: true until the first child lands.
    first_child: Vec<bool>,
    precision: Option<usize>,
}

impl JsonBuilder {
    /// Start with an empty buffer and shortest-round-trip numeric output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit all subsequent numbers with exactly `decimals` decimal places.
    pub fn with_fixed_precision(mut self, decimals: usize) -> Self {
        self.precision = Some(decimals);
        self
    }

    /// Revert to shortest round-trip numeric output.
    pub fn clear_precision(&mut self) {
        self.precision = None;
    }

    /// Open an object as the next value.
    pub fn begin_object(&mut self) -> &mut Self {
        self.begin_value();
        self.buf.push('{');
        self.first_child.push(true);
        self
    }

    /// Close the innermost object.
    pub fn end_object(&mut self) -> &mut Self {
        self.first_child.pop();
        self.buf.push('}');
        self
    }

    /// Open an array as the next value.
    pub fn begin_array(&mut self) -> &mut Self {
        self.begin_value();
        self.buf.push('[');
        self.first_child.push(true);
        self
    }

    /// Close the innermost array.
    pub fn end_array(&mut self) -> &mut Self {
        self.first_child.pop();
        self.buf.push(']');
        self
    }

    /// Write `"key":` then a string value.
    pub fn field_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.key(key);
        self.write_string(value);
        self
    }

    /// Write `"key":` then a numeric value.
    pub fn field_f64(&mut self, key: &str, value: f64) -> &mut Self {
        self.key(key);
        self.write_number(value);
        self
    }

    /// Write `"key":` then an integer value.
    pub fn field_i64(&mut self, key: &str, value: i64) -> &mut Self {
        self.key(key);
        self.buf.push_str(&value.to_string());
        self
    }

    /// Write `"key":` then a boolean value.
    pub fn field_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.key(key);
        self.buf.push_str(if value { "true" } else { "false" });
        self
    }

    /// Write `"key":` then pre-serialized JSON verbatim.
    ///
    /// No well-formedness check is performed on `raw`.
    pub fn field_raw(&mut self, key: &str, raw: &str) -> &mut Self {
        self.key(key);
        self.buf.push_str(raw);
        self
    }

    /// Write `"key":` and open a nested object.
    pub fn field_object(&mut self, key: &str) -> &mut Self {
        self.key(key);
        self.buf.push('{');
        self.first_child.push(true);
        self
    }

    /// Write `"key":` and open a nested array.
    pub fn field_array(&mut self, key: &str) -> &mut Self {
        self.key(key);
        self.buf.push('[');
        self.first_child.push(true);
        self
    }

    /// Append a string element to the open array.
    pub fn element_str(&mut self, value: &str) -> &mut Self {
        self.begin_value();
        self.write_string(value);
        self
    }

    /// Append a numeric element to the open array.
    pub fn element_f64(&mut self, value: f64) -> &mut Self {
        self.begin_value();
        self.write_number(value);
        self
    }

    /// Consume the builder and return the JSON text.
    pub fn finish(self) -> String {
        self.buf
    }

    /// Escape and quote a standalone JSON string.
    pub fn encode_string(value: &str) -> String {
        let mut builder = JsonBuilder::new();
        builder.write_string(value);
        builder.buf
    }

    fn key(&mut self, key: &str) {
        self.begin_value();
        self.write_string(key);
        self.buf.push(':');
    }

    // Inserts the separating comma unless this is the level's first child.
    fn begin_value(&mut self) {
        if let Some(first) = self.first_child.last_mut() {
            if *first {
                *first = false;
            } else {
                self.buf.push(',');
            }
        }
    }

    fn write_number(&mut self, value: f64) {
        match self.precision {
            Some(decimals) => self.buf.push_str(&format!("{value:.decimals$}")),
            None => self.buf.push_str(shortest(value).as_str()),
        }
    }

    fn write_string(&mut self, value: &str) {
        self.buf.push('"');
        for ch in value.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\u{08}' => self.buf.push_str("\\b"),
                '\u{0C}' => self.buf.push_str("\\f"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    self.buf.push_str(&format!("\\u{:04X}", c as u32));
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

// Shortest representation that parses back to the same f64. Rust's
// `Display` for f64 already guarantees round-trip shortest output; this
// only normalizes integral values to omit the trailing ".0".
fn shortest(value: f64) -> String {
    let text = value.to_string();
    match text.strip_suffix(".0") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_with_automatic_commas() {
        let mut b = JsonBuilder::new();
        b.begin_object()
            .field_str("sessionid", "abc123")
            .field_array("symbols")
            .element_str("AAPL")
            .element_str("MSFT")
            .end_array()
            .end_object();
        assert_eq!(
            b.finish(),
            r#"{"sessionid":"abc123","symbols":["AAPL","MSFT"]}"#
        );
    }

    #[test]
    fn nested_objects_track_their_own_first_child() {
        let mut b = JsonBuilder::new();
        b.begin_object()
            .field_str("a", "1")
            .field_object("inner")
            .field_str("b", "2")
            .field_str("c", "3")
            .end_object()
            .field_str("d", "4")
            .end_object();
        assert_eq!(b.finish(), r#"{"a":"1","inner":{"b":"2","c":"3"},"d":"4"}"#);
    }

    #[test]
    fn fixed_precision_money() {
        let mut b = JsonBuilder::new().with_fixed_precision(2);
        b.begin_object().field_f64("price", 150.35).field_f64("stop", 140.0);
        b.end_object();
        assert_eq!(b.finish(), r#"{"price":150.35,"stop":140.00}"#);
    }

    #[test]
    fn shortest_round_trip_by_default() {
        let mut b = JsonBuilder::new();
        b.begin_object().field_f64("x", 1.0).field_f64("y", 0.1).end_object();
        assert_eq!(b.finish(), r#"{"x":1,"y":0.1}"#);
    }

    #[test]
    fn escape_invariance() {
        let inputs = [
            "plain",
            "quote\"backslash\\",
            "tab\tnewline\ncarriage\r",
            "control\u{01}\u{1F}",
            "bell\u{08}feed\u{0C}",
            "ünïcødé ✓",
        ];
        for input in inputs {
            let encoded = JsonBuilder::encode_string(input);
            let decoded: String = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, input, "round trip failed for {input:?}");
        }
    }

    #[test]
    fn control_bytes_use_unicode_escapes() {
        assert_eq!(JsonBuilder::encode_string("\u{01}"), "\"\\u0001\"");
        assert_eq!(JsonBuilder::encode_string("\u{1F}"), "\"\\u001F\"");
    }
}
