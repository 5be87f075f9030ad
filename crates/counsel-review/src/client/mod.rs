//! HTTP plumbing for the dashboards: transports, the authenticated client, and its errors.

mod api;
mod error;
pub mod transport;

pub use api::ApiClient;
pub use error::FetchError;
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, RecordingTransport, RouterTransport,
    Transport, TransportError,
};
