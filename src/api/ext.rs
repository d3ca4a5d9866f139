//! Read-back helpers for a finished [`reqwest::Request`].

use base64::prelude::*;
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, COOKIE};

use super::query::Values;

pub trait RequestExt {
    /// Path and query, the way the request line carries them.
    fn request_uri(&self) -> String;

    /// Decoded query parameters.
    fn query_values(&self) -> Values;

    /// In-memory body bytes, empty when the request has no body.
    fn body_bytes(&self) -> &[u8];

    fn content_length(&self) -> u64 {
        self.body_bytes().len() as u64
    }

    /// All values of header `name`, in insertion order.
    fn header_values(&self, name: &str) -> Vec<&str>;

    /// Username and password from a `Basic` Authorization header.
    fn basic_auth(&self) -> Option<(String, String)>;

    /// Value of the cookie called `name` from the Cookie headers, without
    /// surrounding quotes.
    fn cookie(&self, name: &str) -> Option<String>;
}

impl RequestExt for Request {
    fn request_uri(&self) -> String {
        let url = self.url();
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_owned(),
        }
    }

    fn query_values(&self) -> Values {
        self.url()
            .query_pairs()
            .fold(Values::new(), |mut values, (k, v)| {
                values.add(k.into_owned(), v.into_owned());
                values
            })
    }

    fn body_bytes(&self) -> &[u8] {
        self.body().and_then(|b| b.as_bytes()).unwrap_or_default()
    }

    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    fn basic_auth(&self) -> Option<(String, String)> {
        let value = self.headers().get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, pass) = decoded.split_once(':')?;
        Some((user.to_owned(), pass.to_owned()))
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| cookie::Cookie::split_parse(v))
            .filter_map(|c| c.ok())
            .find(|c| c.name() == name)
            .map(|c| c.value_trimmed().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use reqwest::header::HeaderValue;

    use super::*;
    use crate::Result;
    use crate::api::new_request;

    #[test]
    fn test_request_uri_and_query() -> Result<()> {
        let req = new_request(Method::GET, "/search?q=a+b&q=c&page=2", ())?;
        assert_eq!(req.request_uri(), "/search?q=a+b&q=c&page=2");

        let values = req.query_values();
        assert_eq!(values.get_all("q"), ["a b", "c"]);
        assert_eq!(values.get("page"), Some("2"));
        Ok(())
    }

    #[test]
    fn test_empty_body() -> Result<()> {
        let req = new_request(Method::GET, "/", ())?;
        assert!(req.body_bytes().is_empty());
        assert_eq!(req.content_length(), 0);
        Ok(())
    }

    #[test]
    fn test_basic_auth_needs_basic_scheme() -> Result<()> {
        let mut req = new_request(Method::GET, "/", ())?;
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer Zm9vOmJhcg=="));
        assert_eq!(req.basic_auth(), None);

        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("basic Zm9vOmJhcg=="));
        assert_eq!(req.basic_auth(), Some(("foo".into(), "bar".into())));
        Ok(())
    }

    #[test]
    fn test_cookie_across_headers() -> Result<()> {
        let mut req = new_request(Method::GET, "/", ())?;
        req.headers_mut()
            .append(COOKIE, HeaderValue::from_static("a=1; b=2"));
        req.headers_mut().append(COOKIE, HeaderValue::from_static("c=3"));
        assert_eq!(req.cookie("b").as_deref(), Some("2"));
        assert_eq!(req.cookie("c").as_deref(), Some("3"));
        Ok(())
    }
}
