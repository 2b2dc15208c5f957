// cvista-api: Async Rust client for the CloudVision Portal (CVP) configlet API

pub mod error;
pub mod rest;
pub mod transport;

pub use error::{Error, ServiceFault};
pub use rest::CvpClient;
pub use transport::{TlsMode, TransportConfig};
