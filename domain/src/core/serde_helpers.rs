//! Lenient field decoders.
//!
//! The portal is not consistent about scalar types: identifiers and codes
//! show up as JSON strings on some endpoints and as numbers on others.
//! It also sends `null` for fields it has no value for, which these decoders
//! read as the type's zero value.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

/// Deserialize a field that may be `null`, falling back to `T::default()`.
///
/// `#[serde(default)]` only covers absent fields; pair it with this for
/// fields that are present but null.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize a string field that may arrive as a JSON number or `null`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => String::new(),
        Some(StringOrNumber::String(s)) => s,
        Some(StringOrNumber::Integer(n)) => n.to_string(),
        Some(StringOrNumber::Float(n)) => n.to_string(),
    })
}

/// Deserialize an integer field that may arrive as a numeric string or `null`.
pub fn number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(StringOrNumber::Integer(n)) => Ok(n),
        Some(StringOrNumber::Float(n)) if n.fract() == 0.0 => Ok(n as i64),
        Some(StringOrNumber::Float(n)) => Err(serde::de::Error::custom(format!(
            "expected an integer, found {}",
            n
        ))),
        Some(StringOrNumber::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, found {:?}", s))),
    }
}
