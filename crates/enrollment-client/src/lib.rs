//! Client side of the student enrollment backend: transport, service and screen state.

pub mod config;
pub mod error;
pub mod http;
pub mod screens;
pub mod service;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, RetryPolicy};
pub use error::ClientError;
pub use http::HttpTransport;
pub use screens::{DeleteScreen, EditScreen, EnrollScreen, ListScreen, StudentSummary, ViewScreen};
pub use service::StudentService;
pub use transport::{ApiRequest, Endpoint, Method, Reply, RequestBody, Transport, UploadFile};
