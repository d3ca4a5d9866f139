//! Query string multi-map.

use std::collections::BTreeMap;

use url::form_urlencoded;

use super::param::ParamValue;
use crate::{Error, Result};

/// Query parameters: each key maps to an ordered list of values.
///
/// Keys are kept sorted, so [`Values::encode`] always writes them in
/// lexicographic order while every key keeps its values in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<String, Vec<String>>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values already stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0
            .entry(key.into())
            .or_default()
            .push(value.into().into_string());
    }

    /// Replaces every value stored under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), vec![value.into().into_string()]);
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.first().map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Form-encodes the pairs, keys sorted.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Reads an already-encoded query string.
    ///
    /// Pairs are split on `&` only. A `;` separator or a `%` that does not
    /// start a valid escape is rejected instead of being decoded leniently.
    pub fn parse(query: &str) -> Result<Self> {
        let mut values = Values::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            if pair.contains(';') {
                return Err(Error::Query(format!(
                    "invalid semicolon separator in query: {pair:?}"
                )));
            }
            check_escapes(pair)?;
            for (k, v) in form_urlencoded::parse(pair.as_bytes()) {
                values.add(k.into_owned(), v.into_owned());
            }
        }
        Ok(values)
    }
}

fn check_escapes(s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                let end = (i + 3).min(s.len());
                return Err(Error::Query(format!(
                    "invalid URL escape {:?}",
                    String::from_utf8_lossy(&bytes[i..end])
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

impl<K, I, V> FromIterator<(K, I)> for Values
where
    K: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut values = Values::new();
        for (key, vs) in iter {
            let key = key.into();
            for v in vs {
                values.add(key.clone(), v);
            }
        }
        values
    }
}
