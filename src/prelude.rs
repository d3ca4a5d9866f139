pub use crate::api::body::{IntoBody, Json, Reader};
pub use crate::api::ext::RequestExt;
pub use crate::api::param::ParamValue;
pub use crate::api::query::Values;
pub use crate::api::{self, Rq};
pub use crate::assert::{assert_json_body, assert_json_eq, assert_status};
pub use crate::{Error, Result};
