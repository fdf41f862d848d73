//! Ordered request parameters and their URL-encoded serialization.
//!
//! Serialization follows the conventions of Node's `querystring.stringify`:
//! pairs keep insertion order, lists repeat the key, and null or non-finite
//! values serialize as empty strings.

use crate::error::RestError;
use std::str::FromStr;

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// Serialized as one `key=item` pair per element
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Text form of a scalar value. Lists nested inside lists have no
    /// scalar form and render empty.
    fn scalar_text(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Float(f) if f.is_finite() => format_float(*f),
            ParamValue::Float(_) => String::new(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Null | ParamValue::List(_) => String::new(),
        }
    }
}

/// Shortest round-trip form, switching to exponent notation below 1e-6 and
/// from 1e21 up, with `+` on positive exponents. `-0.0` prints as `0`.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", f);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else {
        f.to_string()
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    ParamValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(ParamValue::Integer)
            .unwrap_or_else(|_| ParamValue::Text(value.to_string()))
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::from(value as u64)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(f64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered, string-keyed request parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pairs: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and gets the new
    /// value; the previous value is returned.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<ParamValue>
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// URL-encode all pairs as `k1=v1&k2=v2`
    pub fn encode(&self) -> String {
        let mut parts = Vec::with_capacity(self.pairs.len());
        for (key, value) in &self.pairs {
            let key = urlencoding::encode(key);
            match value {
                ParamValue::List(items) => {
                    for item in items {
                        parts.push(format!("{}={}", key, urlencoding::encode(&item.scalar_text())));
                    }
                }
                scalar => {
                    parts.push(format!("{}={}", key, urlencoding::encode(&scalar.scalar_text())));
                }
            }
        }
        parts.join("&")
    }

    /// Query string form, prefixed with `?`
    pub fn to_endpoint(&self) -> String {
        format!("?{}", self.encode())
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A `KEY=VALUE` argument as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPair {
    pub key: String,
    pub value: String,
}

impl FromStr for ParamPair {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once('=').ok_or_else(|| {
            RestError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", s))
        })?;
        if key.is_empty() {
            return Err(RestError::InvalidArgument(format!(
                "parameter key cannot be empty in '{}'",
                s
            )));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl FromIterator<ParamPair> for Params {
    fn from_iter<I: IntoIterator<Item = ParamPair>>(iter: I) -> Self {
        iter.into_iter().map(|p| (p.key, p.value)).collect()
    }
}
