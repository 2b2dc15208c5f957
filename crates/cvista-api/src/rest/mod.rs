// REST API client modules
//
// Hand-written client for CVP's classic `.do` endpoints under the `/web`
// prefix. Every response either wraps its payload in an envelope or (for
// single-entity fetches) carries the embedded `errorCode`/`errorMessage`
// fields at top level; both shapes pass through the same classification
// after decode.

pub mod auth;
pub mod client;
pub mod configlet;
pub mod models;

pub use client::CvpClient;
