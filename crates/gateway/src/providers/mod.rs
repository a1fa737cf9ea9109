//! Gateway provider implementations.

pub mod http;
pub mod mock;

pub use http::HttpGateway;
pub use mock::MockGateway;
