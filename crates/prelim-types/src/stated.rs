//! Field sentinels and money literals

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialized form of a field that is absent from the source
pub const NOT_STATED: &str = "NOT_STATED";

/// Serialized form of a field that is present but could not be read confidently
pub const UNCLEAR: &str = "UNCLEAR";

/// A value read from source text, or one of the two display sentinels.
///
/// `NotStated` and `Unclear` are deliberately separate: the first means the
/// label never appeared, the second means it appeared with a value we refuse
/// to guess at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stated<T> {
    Value(T),
    NotStated,
    Unclear,
}

/// A monetary field: a `$1,234.56` literal copied from source, or a sentinel
pub type Money = Stated<String>;

impl<T> Default for Stated<T> {
    fn default() -> Self {
        Stated::NotStated
    }
}

impl<T> Stated<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Stated::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Stated::Value(_))
    }

    pub fn is_not_stated(&self) -> bool {
        matches!(self, Stated::NotStated)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Stated<U> {
        match self {
            Stated::Value(v) => Stated::Value(f(v)),
            Stated::NotStated => Stated::NotStated,
            Stated::Unclear => Stated::Unclear,
        }
    }

    /// Replace a `NotStated` field with `other`. Values and `Unclear` are kept.
    pub fn fill_from(&mut self, other: Stated<T>) {
        if self.is_not_stated() {
            *self = other;
        }
    }
}

impl<T> From<Option<T>> for Stated<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Stated::Value(v),
            None => Stated::NotStated,
        }
    }
}

impl<T: Serialize> Serialize for Stated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stated::Value(v) => v.serialize(serializer),
            Stated::NotStated => serializer.serialize_str(NOT_STATED),
            Stated::Unclear => serializer.serialize_str(UNCLEAR),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Stated<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw.as_str() {
            Some(NOT_STATED) => Ok(Stated::NotStated),
            Some(UNCLEAR) => Ok(Stated::Unclear),
            _ => serde_json::from_value(raw)
                .map(Stated::Value)
                .map_err(D::Error::custom),
        }
    }
}

/// True for `$<digits-with-commas>.<2 digits>`, e.g. `$2,129.89`
pub fn is_money_literal(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('$') else {
        return false;
    };
    let Some((whole, cents)) = rest.rsplit_once('.') else {
        return false;
    };
    !whole.is_empty()
        && whole.starts_with(|c: char| c.is_ascii_digit())
        && whole.chars().all(|c| c.is_ascii_digit() || c == ',')
        && cents.len() == 2
        && cents.chars().all(|c| c.is_ascii_digit())
}

/// Parse a money literal into whole cents without going through floats
pub fn parse_cents(s: &str) -> Option<u64> {
    if !is_money_literal(s) {
        return None;
    }
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Format whole cents as a money literal with thousands separators
pub fn format_cents(cents: u64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}.{:02}", grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sentinels_serialize_as_strings() {
        let absent: Stated<String> = Stated::NotStated;
        let unclear: Stated<String> = Stated::Unclear;
        assert_eq!(serde_json::to_string(&absent).unwrap(), "\"NOT_STATED\"");
        assert_eq!(serde_json::to_string(&unclear).unwrap(), "\"UNCLEAR\"");
    }

    #[test]
    fn test_value_serializes_bare() {
        let v = Stated::Value("$2,129.89".to_string());
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"$2,129.89\"");
    }

    #[test]
    fn test_sentinels_deserialize_distinctly() {
        let absent: Stated<String> = serde_json::from_str("\"NOT_STATED\"").unwrap();
        let unclear: Stated<String> = serde_json::from_str("\"UNCLEAR\"").unwrap();
        let value: Stated<u32> = serde_json::from_str("12").unwrap();
        assert_eq!(absent, Stated::NotStated);
        assert_eq!(unclear, Stated::Unclear);
        assert_eq!(value, Stated::Value(12));
    }

    #[test]
    fn test_fill_from_only_replaces_not_stated() {
        let mut absent: Stated<&str> = Stated::NotStated;
        absent.fill_from(Stated::Value("x"));
        assert_eq!(absent, Stated::Value("x"));

        let mut unclear: Stated<&str> = Stated::Unclear;
        unclear.fill_from(Stated::Value("x"));
        assert_eq!(unclear, Stated::Unclear);
    }

    #[test]
    fn test_money_literal_shape() {
        assert!(is_money_literal("$2,129.89"));
        assert!(is_money_literal("$0.00"));
        assert!(!is_money_literal("$2,129.8"));
        assert!(!is_money_literal("2,129.89"));
        assert!(!is_money_literal("$,100.00"));
        assert!(!is_money_literal("$100"));
    }

    #[test]
    fn test_cents_round_trip_keeps_grouping() {
        assert_eq!(parse_cents("$1,250.00"), Some(125_000));
        assert_eq!(format_cents(125_000), "$1,250.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(123_456_789), "$1,234,567.89");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Formatted cents always satisfy the money literal shape
        #[test]
        fn formatted_cents_are_money_literals(cents in 0u64..10_000_000_000) {
            let formatted = format_cents(cents);
            prop_assert!(is_money_literal(&formatted));
            prop_assert_eq!(parse_cents(&formatted), Some(cents));
        }
    }
}
