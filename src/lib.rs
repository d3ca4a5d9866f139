//! # JAT
//!
//! JAT (JSON API testing) builds in-memory HTTP requests for unit tests of JSON
//! APIs. Requests are plain [`reqwest::Request`] values, so they convert into
//! `http::Request` for dispatch into a handler under test; nothing here opens
//! a socket.
//!
//! It provides a fluent, chainable API to configure:
//! - Method and target, with relative targets resolved against `example.com`
//! - JSON bodies (or raw bytes and readers, used as they are)
//! - Path parameters such as `/users/:id`
//! - Query parameters, encoded with sorted keys
//! - Headers, cookies, basic and bearer authentication
//!
//! ```
//! use jat::prelude::*;
//! use serde_json::json;
//!
//! fn run() -> Result<()> {
//!     let rq = Rq::post("/api/users/:id/courses", json!({ "name": "cs50" }))?
//!         .set_param("id", 1)?
//!         .add_query("notify", true)
//!         .set_basic_auth("foo", "bar")?
//!         .into_request();
//!
//!     assert_eq!(rq.request_uri(), "/api/users/1/courses?notify=true");
//!     assert_json_eq(rq.body_bytes(), r#"{"name": "cs50"}"#);
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! ## Notes
//! - Every setup mistake (a body that cannot be serialized, a malformed query
//!   string, an invalid parameter name or header) is a [`Error`]; the chain
//!   stops at the first `?`.
//! - `into_request` logs `[METHOD] URL` at debug level; see [`logging::init`].

pub mod api;
pub mod assert;
pub mod error;
pub mod logging;
pub mod prelude;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
