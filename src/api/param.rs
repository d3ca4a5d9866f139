//! Path parameter substitution.
//!
//! A path template names its substitution points with a colon sigil:
//! `/users/:id/courses/:course_name`. Each placeholder ends at the first
//! character that cannot be part of an identifier, so a value for `id` never
//! touches `:id_string`.

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;

use crate::{Error, Result};

static VALID_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Bytes that would change the meaning of a path if a value carried them
/// literally: separators, escapes, query and fragment markers.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Returns `true` when `key` can name a placeholder.
pub fn is_valid_key(key: &str) -> bool {
    VALID_KEY.is_match(key)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// String form of a path parameter or query value.
///
/// Integers render without decoration, floats in their shortest form with an
/// exponent only for very large or very small magnitudes (`12.34`, `1e+21`,
/// `1e-05`), strings as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue(String);

impl ParamValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! param_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(value: $t) -> Self {
                ParamValue(value.to_string())
            }
        })*
    };
}

param_from_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, &str, String,
    &String
);

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue(float_text(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue(float_text(value))
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue(stringify(&value))
    }
}

impl From<&Value> for ParamValue {
    fn from(value: &Value) -> Self {
        ParamValue(stringify(value))
    }
}

/// Shortest float text, switching to `1e+21` style when the decimal exponent
/// is below -4 or at least 21.
fn float_text<F: fmt::Display + fmt::LowerExp>(value: F) -> String {
    let sci = format!("{value:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return match sci.as_str() {
            "inf" => "+Inf".to_owned(),
            "-inf" => "-Inf".to_owned(),
            other => other.to_owned(),
        };
    };
    match exp.parse::<i32>() {
        Ok(exp) if !(-4..21).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        _ => value.to_string(),
    }
}

/// Replaces every `:key` in `path` with `value`.
///
/// `path` is the encoded path of a URL, so the value is percent-encoded as a
/// single segment before it goes in: `100%` becomes `100%25`, `a/b` becomes
/// `a%2Fb`. Placeholders for other keys are left as they are, and a key that
/// does not appear in the path leaves the path unchanged.
///
/// ```
/// use jat::api::param::substitute;
///
/// let path = substitute("/users/:id/:id_string", "id", 1).unwrap();
/// assert_eq!(path, "/users/1/:id_string");
/// ```
pub fn substitute(path: &str, key: &str, value: impl Into<ParamValue>) -> Result<String> {
    if !is_valid_key(key) {
        return Err(Error::ParamKey(key.to_owned()));
    }

    let value = value.into().into_string();
    // URL parsing folds `.` and `..` segments (even escaped) into the path.
    if value == "." || value == ".." {
        return Err(Error::ParamValue {
            key: key.to_owned(),
            value,
        });
    }
    let encoded = utf8_percent_encode(&value, SEGMENT).to_string();
    let needle = format!(":{key}");

    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(pos) = rest.find(&needle) {
        let end = pos + needle.len();
        let bounded = rest[end..].chars().next().is_none_or(|c| !is_ident_char(c));

        out.push_str(&rest[..pos]);
        if bounded {
            out.push_str(&encoded);
        } else {
            out.push_str(&needle);
        }
        rest = &rest[end..];
    }
    out.push_str(rest);

    tracing::trace!(key = %key, value = %value, path = %out, "substituted path param");
    Ok(out)
}

/// Applies every `(key, value)` pair to `path`.
pub fn substitute_all<I, K, V>(path: &str, params: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<ParamValue>,
{
    params
        .into_iter()
        .try_fold(path.to_owned(), |path, (key, value)| {
            substitute(&path, key.as_ref(), value)
        })
}

/// Natural string form of a JSON value.
///
/// Strings are written without quotes, numbers follow [`ParamValue`],
/// composite values fall back to compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .map(float_text)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitute_cases() -> Result<()> {
        let cases: [(&str, Vec<(&str, Value)>, &str); 5] = [
            ("/users/:id", vec![("id", json!(1))], "/users/1"),
            (
                "/users/:id/courses/:course_name",
                vec![("id", json!(1)), ("course_name", json!("cs50"))],
                "/users/1/courses/cs50",
            ),
            (
                "/users/:id",
                vec![("id", json!(1)), ("course_name", json!("cs50"))],
                "/users/1",
            ),
            (
                "/users/:id/courses/:course_name",
                vec![("id", json!(1))],
                "/users/1/courses/:course_name",
            ),
            (
                "/users/:id/:id_string",
                vec![("id", json!(1)), ("id_string", json!("cs50"))],
                "/users/1/cs50",
            ),
        ];

        for (template, params, wanted) in cases {
            let forward = substitute_all(template, params.clone())?;
            assert_eq!(forward, wanted, "template {template}");

            let backward = substitute_all(template, params.into_iter().rev())?;
            assert_eq!(backward, wanted, "template {template} reversed");
        }
        Ok(())
    }

    #[test]
    fn test_repeated_placeholder() -> Result<()> {
        let path = substitute("/a/:x/b/:x", "x", "y")?;
        assert_eq!(path, "/a/y/b/y");
        Ok(())
    }

    #[test]
    fn test_placeholder_prefix_is_not_consumed() -> Result<()> {
        let path = substitute("/:idx/:id", "id", 7)?;
        assert_eq!(path, "/:idx/7");
        Ok(())
    }

    #[test]
    fn test_unrelated_param_is_noop() -> Result<()> {
        let path = substitute("/health", "id", 1)?;
        assert_eq!(path, "/health");
        Ok(())
    }

    #[test]
    fn test_invalid_key() {
        for key in ["", "1id", "id-x", "a b", "id*"] {
            let err = substitute("/users/:id", key, 1).unwrap_err();
            assert!(matches!(err, Error::ParamKey(k) if k == key));
        }
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!(1)), "1");
        assert_eq!(stringify(&json!(-5)), "-5");
        assert_eq!(stringify(&json!(12.34)), "12.34");
        assert_eq!(stringify(&json!(1.0)), "1");
        assert_eq!(stringify(&json!("cs50")), "cs50");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&Value::Null), "null");
        assert_eq!(stringify(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_value_is_encoded_as_segment() -> Result<()> {
        let cases = [
            ("100%", "/files/100%25/meta"),
            ("a%2Fb", "/files/a%252Fb/meta"),
            ("a\\b", "/files/a%5Cb/meta"),
            ("a/b", "/files/a%2Fb/meta"),
            ("q?x#y", "/files/q%3Fx%23y/meta"),
            ("...", "/files/.../meta"),
            ("v1:2", "/files/v1:2/meta"),
        ];
        for (value, wanted) in cases {
            assert_eq!(substitute("/files/:name/meta", "name", value)?, wanted);
        }
        Ok(())
    }

    #[test]
    fn test_dot_segment_value() {
        for value in [".", ".."] {
            let err = substitute("/files/:name/meta", "name", value).unwrap_err();
            assert!(matches!(err, Error::ParamValue { ref key, .. } if key == "name"));
        }
    }

    #[test]
    fn test_float_text() {
        assert_eq!(ParamValue::from(0.1f32).as_str(), "0.1");
        assert_eq!(ParamValue::from(12.34f32).as_str(), "12.34");
        assert_eq!(ParamValue::from(1e21).as_str(), "1e+21");
        assert_eq!(ParamValue::from(1e20).as_str(), "100000000000000000000");
        assert_eq!(ParamValue::from(0.0001).as_str(), "0.0001");
        assert_eq!(ParamValue::from(0.00001).as_str(), "1e-05");
        assert_eq!(ParamValue::from(-2.5e-7).as_str(), "-2.5e-07");
        assert_eq!(ParamValue::from(0.0).as_str(), "0");
        assert_eq!(ParamValue::from(f64::INFINITY).as_str(), "+Inf");
        assert_eq!(ParamValue::from(f64::NAN).as_str(), "NaN");
        assert_eq!(stringify(&json!(1e21)), "1e+21");
    }

    #[test]
    fn test_param_value_from_scalars() {
        assert_eq!(ParamValue::from(-5i64).as_str(), "-5");
        assert_eq!(ParamValue::from(7u8).as_str(), "7");
        assert_eq!(ParamValue::from("cs50").as_str(), "cs50");
        assert_eq!(ParamValue::from(false).as_str(), "false");
        assert_eq!(ParamValue::from(json!("cs50")).as_str(), "cs50");
    }
}
