//! HTTP transport: pooled connections, bearer authentication and timeouts.

mod http;

pub use http::{HttpTransport, TransportError, REQUEST_ID_HEADER};
