//! Canonical form for decomposed-column cell values.
//!
//! A decomposed column stores a 2-part value (e.g. specification + unit).
//! The canonical write form is a 2-element JSON array, but three legacy
//! encodings must still be accepted on read: the array itself, a delimited
//! string (`"24|bit"`), and an object keyed by part names
//! (`{"spec": "24", "unit": "bit"}`). All three funnel through
//! `PairValue::parse`, which never fails; unrecognized input yields empty
//! parts.

use serde_json::Value;

/// Render a host-supplied JSON value as cell text.
///
/// `null` and non-scalar values render empty; numbers and bools render in
/// their plain form.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// A normalized 2-part cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairValue {
    pub parts: [String; 2],
}

impl PairValue {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            parts: [first.into(), second.into()],
        }
    }

    /// Normalize any of the accepted encodings into a `PairValue`.
    ///
    /// Tries the array form, then a delimited string, then an object keyed
    /// by `part_names`. Anything else yields empty parts.
    pub fn parse(raw: &Value, part_names: [&str; 2], delimiter: &str) -> Self {
        match raw {
            Value::Array(items) => {
                let first = items.first().map(value_text).unwrap_or_default();
                let second = items.get(1).map(value_text).unwrap_or_default();
                Self::new(first, second)
            }
            Value::String(s) => match s.split_once(delimiter) {
                Some((first, second)) => Self::new(first, second),
                None => Self::new(s.clone(), ""),
            },
            Value::Object(map) => {
                let first = map.get(part_names[0]).map(value_text).unwrap_or_default();
                let second = map.get(part_names[1]).map(value_text).unwrap_or_default();
                Self::new(first, second)
            }
            // Bare scalar on a decomposed column: keep it as the first part.
            Value::Number(_) | Value::Bool(_) => Self::new(value_text(raw), ""),
            Value::Null => Self::default(),
        }
    }

    /// Canonical write form: a 2-element JSON array.
    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::String(self.parts[0].clone()),
            Value::String(self.parts[1].clone()),
        ])
    }

    /// Replace one part, preserving the sibling.
    pub fn with_part(mut self, index: usize, text: impl Into<String>) -> Self {
        if index < 2 {
            self.parts[index] = text.into();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts[0].is_empty() && self.parts[1].is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const PARTS: [&str; 2] = ["spec", "unit"];

    #[test]
    fn test_parse_array() {
        let pair = PairValue::parse(&json!(["24", "bit"]), PARTS, "|");
        assert_eq!(pair, PairValue::new("24", "bit"));
    }

    #[test]
    fn test_parse_delimited_string() {
        let pair = PairValue::parse(&json!("24|bit"), PARTS, "|");
        assert_eq!(pair, PairValue::new("24", "bit"));
    }

    #[test]
    fn test_parse_keyed_object() {
        let pair = PairValue::parse(&json!({"spec": "24", "unit": "bit"}), PARTS, "|");
        assert_eq!(pair, PairValue::new("24", "bit"));
    }

    #[test]
    fn test_parse_plain_string_fills_first_part() {
        let pair = PairValue::parse(&json!("24"), PARTS, "|");
        assert_eq!(pair, PairValue::new("24", ""));
    }

    #[test]
    fn test_parse_numbers_in_array() {
        let pair = PairValue::parse(&json!([24, "bit"]), PARTS, "|");
        assert_eq!(pair, PairValue::new("24", "bit"));
    }

    #[test]
    fn test_parse_unrecognized_defaults_empty() {
        assert!(PairValue::parse(&Value::Null, PARTS, "|").is_empty());
        assert!(PairValue::parse(&json!({"other": 1}), PARTS, "|").is_empty());
        assert!(PairValue::parse(&json!([]), PARTS, "|").is_empty());
    }

    #[test]
    fn test_with_part_preserves_sibling() {
        let pair = PairValue::new("24", "bit").with_part(0, "32");
        assert_eq!(pair, PairValue::new("32", "bit"));
        // Out-of-range index is ignored.
        let pair = pair.with_part(5, "x");
        assert_eq!(pair, PairValue::new("32", "bit"));
    }

    proptest! {
        /// All three legacy encodings of the same pair normalize identically.
        #[test]
        fn prop_encodings_agree(
            a in "[^|]{0,12}",
            b in "[^|]{0,12}",
        ) {
            let expected = PairValue::new(a.clone(), b.clone());
            let from_array = PairValue::parse(&json!([a.clone(), b.clone()]), PARTS, "|");
            let from_string = PairValue::parse(&json!(format!("{a}|{b}")), PARTS, "|");
            let from_object =
                PairValue::parse(&json!({"spec": a.clone(), "unit": b.clone()}), PARTS, "|");

            prop_assert_eq!(&from_array, &expected);
            prop_assert_eq!(&from_string, &expected);
            prop_assert_eq!(&from_object, &expected);
        }

        /// Parsing never panics and always yields exactly two parts.
        #[test]
        fn prop_parse_total(s in any::<String>()) {
            let pair = PairValue::parse(&json!(s), PARTS, "|");
            prop_assert_eq!(pair.parts.len(), 2);
        }

        /// Canonical form round-trips through parse.
        #[test]
        fn prop_canonical_roundtrip(a in ".{0,12}", b in ".{0,12}") {
            let pair = PairValue::new(a, b);
            let back = PairValue::parse(&pair.to_value(), PARTS, "|");
            prop_assert_eq!(back, pair);
        }
    }
}
