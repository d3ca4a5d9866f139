//! Fluent construction of test requests.
//!
//! [`Rq`] owns a [`reqwest::Request`] while it is being configured. Every step
//! consumes the builder and hands it back, so a whole request reads as one
//! chain; steps that can be misused return [`Result`] and continue with `?`.
//!
//! ```
//! use jat::prelude::*;
//!
//! fn build() -> jat::Result<reqwest::Request> {
//!     let rq = Rq::get("/api/users/:id")?
//!         .set_param("id", 42)?
//!         .add_query("type", "code")
//!         .set_bearer_auth("6eTUFP4HNhvvIwz5nNiL")?
//!         .into_request();
//!     assert_eq!(rq.request_uri(), "/api/users/42?type=code");
//!     Ok(rq)
//! }
//! # build().unwrap();
//! ```

use base64::prelude::*;
use cookie::Cookie;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderName, HeaderValue};
use reqwest::{Body, Method, Request};
use url::Url;

use crate::{Error, Result};

pub mod body;
pub mod ext;
pub mod param;
pub mod query;

use body::IntoBody;
use ext::RequestExt;
use param::ParamValue;
use query::Values;

/// Host that relative targets such as `/users` are resolved against.
pub static DEFAULT_BASE: &str = "http://example.com";

fn parse_target(target: &str) -> Result<Url> {
    let parsed = match Url::parse(target) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(DEFAULT_BASE).and_then(|base| base.join(target))
        }
        other => other,
    };
    parsed.map_err(|source| Error::Target {
        target: target.to_owned(),
        source,
    })
}

fn set_body(req: &mut Request, body: impl IntoBody) -> Result<()> {
    let bytes = body.into_body()?;
    *req.body_mut() = (!bytes.is_empty()).then(|| Body::from(bytes));
    Ok(())
}

/// Builds a request for `method` and `target` with `body` resolved through
/// [`IntoBody`].
pub fn new_request(method: Method, target: &str, body: impl IntoBody) -> Result<Request> {
    let mut req = Request::new(method, parse_target(target)?);
    set_body(&mut req, body)?;
    Ok(req)
}

pub fn get(target: &str) -> Result<Request> {
    new_request(Method::GET, target, ())
}

pub fn post(target: &str, body: impl IntoBody) -> Result<Request> {
    new_request(Method::POST, target, body)
}

pub fn put(target: &str, body: impl IntoBody) -> Result<Request> {
    new_request(Method::PUT, target, body)
}

pub fn patch(target: &str, body: impl IntoBody) -> Result<Request> {
    new_request(Method::PATCH, target, body)
}

pub fn delete(target: &str, body: impl IntoBody) -> Result<Request> {
    new_request(Method::DELETE, target, body)
}

/// `name=value` for a Cookie header.
///
/// Line breaks in the name become `-`. Characters a cookie value cannot
/// carry (controls, quotes, semicolons, backslashes) are dropped, and a value
/// with a space or comma is sent quoted.
fn cookie_pair(cookie: &Cookie<'_>) -> String {
    let name = cookie.name().replace(['\n', '\r'], "-");
    let value: String = cookie
        .value()
        .chars()
        .filter(|&c| (' '..'\u{7f}').contains(&c) && !matches!(c, '"' | ';' | '\\'))
        .collect();
    if value.contains([' ', ',']) {
        format!("{name}=\"{value}\"")
    } else {
        format!("{name}={value}")
    }
}

/// Request builder with a fluent interface.
#[derive(Debug)]
pub struct Rq {
    inner: Request,
}

impl From<Request> for Rq {
    fn from(inner: Request) -> Self {
        Rq { inner }
    }
}

impl Rq {
    pub fn new(method: Method, target: &str, body: impl IntoBody) -> Result<Self> {
        new_request(method, target, body).map(Rq::from)
    }

    pub fn get(target: &str) -> Result<Self> {
        get(target).map(Rq::from)
    }

    pub fn post(target: &str, body: impl IntoBody) -> Result<Self> {
        post(target, body).map(Rq::from)
    }

    pub fn put(target: &str, body: impl IntoBody) -> Result<Self> {
        put(target, body).map(Rq::from)
    }

    pub fn patch(target: &str, body: impl IntoBody) -> Result<Self> {
        patch(target, body).map(Rq::from)
    }

    pub fn delete(target: &str, body: impl IntoBody) -> Result<Self> {
        delete(target, body).map(Rq::from)
    }

    /// The request as configured so far.
    pub fn request(&self) -> &Request {
        &self.inner
    }

    /// Finishes the chain and logs the final method and URL.
    pub fn into_request(self) -> Request {
        tracing::debug!("[{}] {}", self.inner.method(), self.inner.url());
        self.inner
    }

    /// Runs `fun` only when `val` is present.
    pub fn apply_if<T, F>(self, val: Option<T>, fun: F) -> Result<Self>
    where
        F: FnOnce(Self, T) -> Result<Self>,
    {
        match val {
            Some(val) => fun(self, val),
            None => Ok(self),
        }
    }

    // ===== body =====

    /// Replaces the body. The content length follows the new body.
    pub fn with_body(mut self, body: impl IntoBody) -> Result<Self> {
        set_body(&mut self.inner, body)?;
        Ok(self)
    }

    /// Marks the body as JSON through the Content-Type header.
    pub fn with_json(mut self) -> Self {
        self.inner
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    // ===== path params =====

    /// Fills every `:key` placeholder in the path with `value`.
    pub fn set_param(mut self, key: &str, value: impl Into<ParamValue>) -> Result<Self> {
        let path = param::substitute(self.inner.url().path(), key, value)?;
        self.inner.url_mut().set_path(&path);
        Ok(self)
    }

    pub fn with_param<I, K, V>(mut self, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        let path = param::substitute_all(self.inner.url().path(), params)?;
        self.inner.url_mut().set_path(&path);
        Ok(self)
    }

    // ===== query =====

    fn write_query(&mut self, values: &Values) {
        let encoded = values.encode();
        tracing::trace!(query = %encoded, "rewrote query");
        self.inner
            .url_mut()
            .set_query((!encoded.is_empty()).then_some(encoded.as_str()));
    }

    /// Appends `value` to any existing values of `key`.
    pub fn add_query(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        let mut values = self.inner.query_values();
        values.add(key, value);
        self.write_query(&values);
        self
    }

    /// Replaces any existing values of `key` with `value`.
    pub fn set_query(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        let mut values = self.inner.query_values();
        values.set(key, value);
        self.write_query(&values);
        self
    }

    /// Replaces the whole query with `query`.
    pub fn with_query<Q, K, I, V>(mut self, query: Q) -> Self
    where
        Q: IntoIterator<Item = (K, I)>,
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        let values: Values = query.into_iter().collect();
        self.write_query(&values);
        self
    }

    /// Replaces the whole query with the pairs parsed from `query`.
    pub fn with_query_string(mut self, query: &str) -> Result<Self> {
        let values = Values::parse(query)?;
        self.write_query(&values);
        Ok(self)
    }

    /// Replaces the whole query with `values`.
    pub fn with_query_values(mut self, values: &Values) -> Self {
        self.write_query(values);
        self
    }

    // ===== header =====

    /// Appends `value` to any existing values of header `key`.
    pub fn add_header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<[u8]>,
        V: AsRef<str>,
    {
        let name = HeaderName::from_bytes(key.as_ref())?;
        let value = HeaderValue::from_str(value.as_ref())?;
        self.inner.headers_mut().append(name, value);
        Ok(self)
    }

    /// Same as [`Rq::add_header`], but the value is marked sensitive and stays
    /// out of `Debug` output.
    pub fn add_secret_header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<[u8]>,
        V: AsRef<str>,
    {
        let name = HeaderName::from_bytes(key.as_ref())?;
        let mut value = HeaderValue::from_str(value.as_ref())?;
        value.set_sensitive(true);
        self.inner.headers_mut().append(name, value);
        Ok(self)
    }

    /// Replaces every value of header `key` with `value`.
    pub fn set_header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<[u8]>,
        V: AsRef<str>,
    {
        let name = HeaderName::from_bytes(key.as_ref())?;
        let value = HeaderValue::from_str(value.as_ref())?;
        self.inner.headers_mut().insert(name, value);
        Ok(self)
    }

    fn set_authorization(mut self, value: String) -> Result<Self> {
        let mut value = HeaderValue::from_str(&value)?;
        value.set_sensitive(true);
        self.inner.headers_mut().insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Authorization with HTTP Basic authentication.
    pub fn set_basic_auth(self, username: &str, password: &str) -> Result<Self> {
        let credentials = BASE64_STANDARD.encode(format!("{username}:{password}"));
        self.set_authorization(format!("Basic {credentials}"))
    }

    /// Authorization with a bearer token.
    pub fn set_bearer_auth(self, token: &str) -> Result<Self> {
        self.set_authorization(format!("Bearer {token}"))
    }

    /// Adds `cookie` to the Cookie header. Only its name and value are sent;
    /// several cookies share one header separated by `"; "`.
    pub fn add_cookie(mut self, cookie: &Cookie<'_>) -> Result<Self> {
        let pair = cookie_pair(cookie);
        let line = match self.inner.headers().get(COOKIE).map(HeaderValue::to_str) {
            Some(Ok(existing)) if !existing.is_empty() => format!("{existing}; {pair}"),
            _ => pair,
        };
        let value = HeaderValue::from_str(&line)?;
        self.inner.headers_mut().insert(COOKIE, value);
        Ok(self)
    }
}
