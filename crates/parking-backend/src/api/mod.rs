mod client;
mod error;
pub mod http;
mod query;

pub use client::{ApiClient, RequestOptions};
pub use error::{FetchError, FetchErrorKind, FetchResult};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, ReqwestClient, TransportError};
pub use query::{build_url, QueryParams, QueryValue};
