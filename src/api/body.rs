//! Request body resolution.
//!
//! Bodies that already are bytes (or can be read as bytes) go into the
//! request as they are; anything else is serialized to JSON first.

use std::io::Read;

use bytes::Bytes;
use serde::Serialize;

use crate::Result;

/// Conversion into the raw bytes of a request body.
pub trait IntoBody {
    fn into_body(self) -> Result<Bytes>;
}

/// Serializes the wrapped value as JSON.
#[derive(Debug, Clone, Copy)]
pub struct Json<T>(pub T);

/// Reads the wrapped reader to the end and uses its bytes verbatim.
#[derive(Debug)]
pub struct Reader<R>(pub R);

impl<T: Serialize> IntoBody for Json<T> {
    fn into_body(self) -> Result<Bytes> {
        Ok(serde_json::to_vec(&self.0)?.into())
    }
}

impl<R: Read> IntoBody for Reader<R> {
    fn into_body(mut self) -> Result<Bytes> {
        let mut buf = Vec::new();
        self.0.read_to_end(&mut buf)?;
        Ok(buf.into())
    }
}

impl IntoBody for serde_json::Value {
    fn into_body(self) -> Result<Bytes> {
        Json(self).into_body()
    }
}

impl IntoBody for Bytes {
    fn into_body(self) -> Result<Bytes> {
        Ok(self)
    }
}

impl IntoBody for Vec<u8> {
    fn into_body(self) -> Result<Bytes> {
        Ok(self.into())
    }
}

impl IntoBody for &'static [u8] {
    fn into_body(self) -> Result<Bytes> {
        Ok(Bytes::from_static(self))
    }
}

/// No body at all.
impl IntoBody for () {
    fn into_body(self) -> Result<Bytes> {
        Ok(Bytes::new())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::Error;

    #[derive(Serialize)]
    struct Login {
        email: String,
    }

    fn json(bytes: &Bytes) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_json_bodies() -> Result<()> {
        let wanted = serde_json::json!({ "email": "foo@bar.com" });

        let from_map = Json(HashMap::from([("email", "foo@bar.com")])).into_body()?;
        assert_eq!(json(&from_map), wanted);

        let from_struct = Json(Login {
            email: "foo@bar.com".into(),
        })
        .into_body()?;
        assert_eq!(json(&from_struct), wanted);

        let from_value = wanted.clone().into_body()?;
        assert_eq!(json(&from_value), wanted);

        let from_array = Json(["hello", "world"]).into_body()?;
        assert_eq!(json(&from_array), serde_json::json!(["hello", "world"]));
        Ok(())
    }

    #[test]
    fn test_reader_is_verbatim() -> Result<()> {
        let raw = br#"{"email":   "foo@bar.com"}"#;
        let body = Reader(&raw[..]).into_body()?;
        assert_eq!(&body[..], &raw[..]);
        Ok(())
    }

    #[test]
    fn test_unit_is_empty() -> Result<()> {
        assert!(().into_body()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unserializable_json() {
        // JSON object keys must be strings.
        let map = BTreeMap::from([(vec![1u8], "x")]);
        let err = Json(map).into_body().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
